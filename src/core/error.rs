use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by VAT-ID validation and the eVatR client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvatrError {
    /// A required VAT-ID was empty. Raised before any network call.
    #[error("both vat_id_own and vat_id_foreign are required ({field} is empty)")]
    MissingField {
        /// Name of the empty field (`vat_id_own` or `vat_id_foreign`).
        field: &'static str,
    },

    /// A VAT-ID failed its country pattern after normalization,
    /// or its country is not supported.
    #[error("invalid format for {field}: {value}")]
    InvalidFormat {
        /// Name of the offending field.
        field: &'static str,
        /// The normalized value that was rejected.
        value: String,
    },

    /// Check-digit input was not exactly nine ASCII digits.
    #[error("German VAT-ID number must contain exactly 9 digits after letters DE, got '{value}'")]
    InvalidLength {
        /// The rejected input.
        value: String,
    },

    /// The API or the transport below it reported a failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A response body or a date inside it could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// An external status message snapshot could not be read or parsed.
    #[error("could not load status messages from {}: {reason}", .path.display())]
    RegistryLoad {
        /// The candidate file.
        path: PathBuf,
        /// Why loading failed.
        reason: String,
    },

    /// Invalid client configuration (base URL, header values, HTTP client setup).
    #[error("configuration error: {0}")]
    Config(String),
}

impl EvatrError {
    /// HTTP status of the failed request, if one was received.
    pub fn http(&self) -> Option<u16> {
        match self {
            Self::Api(e) => e.http,
            _ => None,
        }
    }

    /// eVatR status code reported with the failure (e.g. "evatr-0004").
    pub fn status(&self) -> Option<&str> {
        match self {
            Self::Api(e) => e.status.as_deref(),
            _ => None,
        }
    }

    /// Bare failure message, without the `ApiError:` prefix for API failures.
    pub fn message(&self) -> String {
        match self {
            Self::Api(e) => e.message.clone(),
            other => other.to_string(),
        }
    }

    /// Name of the offending input field, if known.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field } | Self::InvalidFormat { field, .. } => Some(*field),
            Self::Api(e) => e.field.as_deref(),
            _ => None,
        }
    }
}

/// Uniform shape of a transport or API failure.
///
/// Non-2xx responses carry a structured body `{message?, status?, field?}`
/// which is folded in here together with the HTTP status. Serialized
/// errors carry `"name": "ApiError"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename = "ApiError")]
pub struct ApiError {
    /// Human-readable description.
    pub message: String,
    /// HTTP status code, absent for network-level failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<u16>,
    /// eVatR status code from the error body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Offending field from the error body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    /// Error name reported to callers.
    pub const NAME: &'static str = "ApiError";

    /// Create an error carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            http: None,
            status: None,
            field: None,
        }
    }

    /// Attach the HTTP status.
    pub fn with_http(mut self, http: u16) -> Self {
        self.http = Some(http);
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", Self::NAME, self.message)?;
        if let Some(status) = &self.status {
            write!(f, " [{status}]")?;
        }
        if let Some(http) = self.http {
            write!(f, " (HTTP {http})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}
