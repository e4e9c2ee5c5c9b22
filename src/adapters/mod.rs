//! Concrete adapter implementations for ports.

#[cfg(feature = "http")]
pub mod http_adapter;
pub mod file_config_adapter;
pub mod file_export_adapter;
pub mod json_file_adapter;
pub mod payload;
pub mod text_table;
