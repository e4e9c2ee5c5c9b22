//! Core domain types and logic.

pub mod row;
pub mod filter;
pub mod sort;
pub mod pagination;
pub mod view;
pub mod statistics;
pub mod portfolio;
pub mod export;
pub mod format;
pub mod dashboard;
pub mod config_validation;
pub mod error;
