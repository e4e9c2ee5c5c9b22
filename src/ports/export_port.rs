//! Export delivery port trait.

use crate::domain::error::PicksError;
use std::path::PathBuf;

/// Hands serialized export content to the user. Serialization happens
/// before this boundary; implementations only move bytes.
pub trait ExportPort {
    fn deliver(&self, filename: &str, contents: &[u8]) -> Result<PathBuf, PicksError>;
}
