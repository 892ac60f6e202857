//! Client configuration.
//!
//! Defaults point at the production eVatR service. Override via environment
//! variables or explicit construction for tests and staging.

use std::collections::BTreeMap;
use std::time::Duration;

use url::Url;

use crate::core::EvatrError;

/// Production base URL of the eVatR REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.evatr.vies.bzst.de/app/v1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`EvatrClient`](super::EvatrClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL; endpoint paths are appended to it.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Extra headers sent with every request, on top of the JSON defaults.
    pub headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: DEFAULT_TIMEOUT,
            headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `EVATR_BASE_URL` (default: `https://api.evatr.vies.bzst.de/app/v1`)
    /// - `EVATR_TIMEOUT_SECS` (default: 30)
    ///
    /// # Errors
    ///
    /// [`EvatrError::Config`] if `EVATR_BASE_URL` is not a valid URL.
    pub fn from_env() -> Result<Self, EvatrError> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var("EVATR_BASE_URL") {
            config = config.with_base_url(&raw)?;
        }
        if let Some(secs) = std::env::var("EVATR_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Replace the base URL.
    ///
    /// # Errors
    ///
    /// [`EvatrError::Config`] if `raw` is not a valid URL.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, EvatrError> {
        self.base_url =
            Url::parse(raw).map_err(|e| EvatrError::Config(format!("invalid base URL {raw}: {e}")))?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a header sent with every request. Replaces an earlier value
    /// for the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Full URL of an endpoint path such as `/abfrage`.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.headers.is_empty());
    }

    #[test]
    fn endpoint_joins_paths() {
        let config = ClientConfig::default();
        assert_eq!(
            config.endpoint("/abfrage"),
            "https://api.evatr.vies.bzst.de/app/v1/abfrage"
        );

        let local = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9000")
            .unwrap();
        assert_eq!(
            local.endpoint("/info/statusmeldungen"),
            "http://127.0.0.1:9000/info/statusmeldungen"
        );
    }

    #[test]
    fn invalid_base_url_rejected() {
        let err = ClientConfig::default().with_base_url("not a url").unwrap_err();
        assert!(matches!(err, EvatrError::Config(_)));
    }

    #[test]
    fn builder_methods() {
        let config = ClientConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_header("X-Trace", "a")
            .with_header("X-Trace", "b");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.headers.get("X-Trace").map(String::as_str), Some("b"));
    }
}
