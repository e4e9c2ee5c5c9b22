//! sctr-picks: momentum and rebound stock picks, browsed from the terminal.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod browse;
pub mod cli;
