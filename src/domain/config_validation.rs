//! Configuration validation.
//!
//! Checks every known key before any data is fetched.

use crate::domain::error::PicksError;
use crate::domain::portfolio::DEFAULT_NOTIONAL;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_DASHBOARD_PATH: &str = "/api/dashboard";
pub const DEFAULT_TIMEOUT_SECS: i64 = 30;
pub const DEFAULT_EXPORT_DIR: &str = ".";

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), PicksError> {
    validate_api_url(config)?;
    validate_dashboard_path(config)?;
    validate_timeout(config)?;
    validate_notional(config)?;
    validate_export_directory(config)?;
    Ok(())
}

/// Fails unless `[source]` names either an API URL or a payload file.
pub fn require_source(config: &dyn ConfigPort) -> Result<(), PicksError> {
    let has = |key: &str| {
        config
            .get_string("source", key)
            .is_some_and(|v| !v.trim().is_empty())
    };
    if has("api_url") || has("file") {
        Ok(())
    } else {
        Err(PicksError::ConfigMissing {
            section: "source".to_string(),
            key: "api_url".to_string(),
        })
    }
}

fn validate_api_url(config: &dyn ConfigPort) -> Result<(), PicksError> {
    let Some(url) = config.get_string("source", "api_url") else {
        return Ok(());
    };
    let url = url.trim();
    if url.is_empty() {
        return Ok(());
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(PicksError::ConfigInvalid {
            section: "source".to_string(),
            key: "api_url".to_string(),
            reason: "api_url must start with http:// or https://".to_string(),
        });
    }
    Ok(())
}

fn validate_dashboard_path(config: &dyn ConfigPort) -> Result<(), PicksError> {
    match config.get_string("source", "dashboard_path") {
        Some(p) if !p.trim().starts_with('/') => Err(PicksError::ConfigInvalid {
            section: "source".to_string(),
            key: "dashboard_path".to_string(),
            reason: "dashboard_path must start with '/'".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_timeout(config: &dyn ConfigPort) -> Result<(), PicksError> {
    let value = config.get_int("source", "timeout_secs", DEFAULT_TIMEOUT_SECS);
    if value <= 0 {
        return Err(PicksError::ConfigInvalid {
            section: "source".to_string(),
            key: "timeout_secs".to_string(),
            reason: "timeout_secs must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_notional(config: &dyn ConfigPort) -> Result<(), PicksError> {
    let value = config.get_double("portfolio", "notional", DEFAULT_NOTIONAL);
    if !value.is_finite() || value <= 0.0 {
        return Err(PicksError::ConfigInvalid {
            section: "portfolio".to_string(),
            key: "notional".to_string(),
            reason: "notional must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_export_directory(config: &dyn ConfigPort) -> Result<(), PicksError> {
    match config.get_string("export", "directory") {
        Some(d) if d.trim().is_empty() => Err(PicksError::ConfigInvalid {
            section: "export".to_string(),
            key: "directory".to_string(),
            reason: "directory must not be empty".to_string(),
        }),
        _ => Ok(()),
    }
}
