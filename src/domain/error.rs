//! Domain error types.

use crate::domain::row::DatasetKind;

/// Top-level error type for sctr-picks.
///
/// The core pipeline (filter, sort, paginate, aggregate) never produces one of
/// these; they come from the data source, configuration and export boundaries.
#[derive(Debug, thiserror::Error)]
pub enum PicksError {
    #[error("failed to load {dataset} data: {reason}")]
    Transport { dataset: DatasetKind, reason: String },

    #[error("failed to load {dataset} data: API error {status}{}", detail_suffix(.detail))]
    Status {
        dataset: DatasetKind,
        status: u16,
        detail: Option<String>,
    },

    #[error(
        "server returned HTML instead of JSON for {dataset} data; \
         is the API URL pointing at the API service rather than a web frontend?"
    )]
    HtmlPayload { dataset: DatasetKind },

    #[error("invalid {dataset} response: {reason}")]
    MalformedPayload { dataset: DatasetKind, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid {name}: {value:?}")]
    InvalidArgument { name: String, value: String },

    #[error("export failed: {reason}")]
    Export { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(" ({d})"),
        None => String::new(),
    }
}

impl PicksError {
    /// The dataset a source/payload error belongs to, if any.
    pub fn dataset(&self) -> Option<DatasetKind> {
        match self {
            PicksError::Transport { dataset, .. }
            | PicksError::Status { dataset, .. }
            | PicksError::HtmlPayload { dataset }
            | PicksError::MalformedPayload { dataset, .. } => Some(*dataset),
            _ => None,
        }
    }

    /// Payload errors mean the endpoint answered, but not with dashboard JSON.
    pub fn is_payload_error(&self) -> bool {
        matches!(
            self,
            PicksError::HtmlPayload { .. } | PicksError::MalformedPayload { .. }
        )
    }
}

impl From<csv::Error> for PicksError {
    fn from(err: csv::Error) -> Self {
        PicksError::Export {
            reason: err.to_string(),
        }
    }
}

impl From<&PicksError> for std::process::ExitCode {
    fn from(err: &PicksError) -> Self {
        let code: u8 = match err {
            PicksError::Io(_) => 1,
            PicksError::ConfigParse { .. }
            | PicksError::ConfigMissing { .. }
            | PicksError::ConfigInvalid { .. } => 2,
            PicksError::Transport { .. } | PicksError::Status { .. } => 3,
            PicksError::HtmlPayload { .. } | PicksError::MalformedPayload { .. } => 4,
            PicksError::InvalidArgument { .. } => 5,
            PicksError::Export { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_includes_detail() {
        let err = PicksError::Status {
            dataset: DatasetKind::Performance,
            status: 500,
            detail: Some("scrape timed out".into()),
        };
        assert_eq!(
            err.to_string(),
            "failed to load performance data: API error 500 (scrape timed out)"
        );
    }

    #[test]
    fn status_error_without_detail() {
        let err = PicksError::Status {
            dataset: DatasetKind::Rebound,
            status: 404,
            detail: None,
        };
        assert_eq!(err.to_string(), "failed to load rebound data: API error 404");
    }

    #[test]
    fn html_payload_message_differs_from_transport() {
        let html = PicksError::HtmlPayload {
            dataset: DatasetKind::Performance,
        };
        let transport = PicksError::Transport {
            dataset: DatasetKind::Performance,
            reason: "connection refused".into(),
        };
        assert!(html.to_string().contains("HTML"));
        assert_ne!(html.to_string(), transport.to_string());
        assert!(html.is_payload_error());
        assert!(!transport.is_payload_error());
    }

    #[test]
    fn dataset_is_reported_for_source_errors() {
        let err = PicksError::MalformedPayload {
            dataset: DatasetKind::Rebound,
            reason: "expected array".into(),
        };
        assert_eq!(err.dataset(), Some(DatasetKind::Rebound));

        let err = PicksError::ConfigMissing {
            section: "source".into(),
            key: "api_url".into(),
        };
        assert_eq!(err.dataset(), None);
    }
}
