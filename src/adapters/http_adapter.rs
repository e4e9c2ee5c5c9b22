//! Dashboard API adapter over a blocking HTTP client.

use crate::adapters::payload::{decode_performance, decode_rebound, error_detail};
use crate::domain::config_validation::{DEFAULT_DASHBOARD_PATH, DEFAULT_TIMEOUT_SECS};
use crate::domain::error::PicksError;
use crate::domain::row::{DatasetKind, PerformanceSnapshot, ReboundRow};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use std::time::Duration;

pub struct HttpAdapter {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpAdapter {
    pub fn new(api_url: &str, dashboard_path: &str, timeout: Duration) -> Result<Self, PicksError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PicksError::ConfigInvalid {
                section: "source".into(),
                key: "api_url".into(),
                reason: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint: join_url(api_url, dashboard_path),
        })
    }

    /// Reads `[source] api_url`, `dashboard_path` and `timeout_secs`.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, PicksError> {
        let api_url = config
            .get_string("source", "api_url")
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| PicksError::ConfigMissing {
                section: "source".into(),
                key: "api_url".into(),
            })?;
        let path = config
            .get_string("source", "dashboard_path")
            .unwrap_or_else(|| DEFAULT_DASHBOARD_PATH.to_string());
        let timeout = config
            .get_int("source", "timeout_secs", DEFAULT_TIMEOUT_SECS)
            .max(1) as u64;
        Self::new(&api_url, &path, Duration::from_secs(timeout))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One GET per call; the two datasets never share a response.
    fn fetch_body(&self, dataset: DatasetKind) -> Result<String, PicksError> {
        tracing::debug!(%dataset, endpoint = %self.endpoint, "fetching");
        let resp = self
            .client
            .get(&self.endpoint)
            .send()
            .map_err(|e| PicksError::Transport {
                dataset,
                reason: transport_reason(&e),
            })?;

        let status = resp.status();
        let body = resp.text().map_err(|e| PicksError::Transport {
            dataset,
            reason: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            tracing::warn!(%dataset, status = status.as_u16(), "API returned an error status");
            return Err(PicksError::Status {
                dataset,
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }
        tracing::debug!(%dataset, bytes = body.len(), "fetch finished");
        Ok(body)
    }
}

fn transport_reason(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("cannot reach the API: {e}")
    } else {
        e.to_string()
    }
}

fn join_url(api_url: &str, path: &str) -> String {
    let base = api_url.trim().trim_end_matches('/');
    let path = path.trim();
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

impl DataPort for HttpAdapter {
    fn fetch_performance(&self) -> Result<PerformanceSnapshot, PicksError> {
        let body = self.fetch_body(DatasetKind::Performance)?;
        decode_performance(&body)
    }

    fn fetch_rebound(&self) -> Result<Vec<ReboundRow>, PicksError> {
        let body = self.fetch_body(DatasetKind::Rebound)?;
        decode_rebound(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn joins_base_and_path() {
        assert_eq!(
            join_url("https://api.example.com/", "/api/dashboard"),
            "https://api.example.com/api/dashboard"
        );
        assert_eq!(
            join_url("http://localhost:8000", "api/dashboard"),
            "http://localhost:8000/api/dashboard"
        );
    }

    #[test]
    fn from_config_uses_default_path() {
        let config =
            FileConfigAdapter::from_string("[source]\napi_url = http://localhost:8000\n").unwrap();
        let adapter = HttpAdapter::from_config(&config).unwrap();
        assert_eq!(adapter.endpoint(), "http://localhost:8000/api/dashboard");
    }

    #[test]
    fn from_config_requires_api_url() {
        let config = FileConfigAdapter::from_string("[source]\nfile = x.json\n").unwrap();
        assert!(matches!(
            HttpAdapter::from_config(&config),
            Err(PicksError::ConfigMissing { .. })
        ));
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let adapter =
            HttpAdapter::new("http://127.0.0.1:9", "/api/dashboard", Duration::from_secs(2)).unwrap();
        let err = adapter.fetch_rebound().unwrap_err();
        assert!(matches!(
            err,
            PicksError::Transport { dataset: DatasetKind::Rebound, .. }
        ));
    }
}
