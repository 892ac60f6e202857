//! Async client for the eVatR REST API.
//!
//! # Example
//!
//! ```ignore
//! use evatr::client::{ClientConfig, EvatrClient};
//! use evatr::core::SimpleRequest;
//!
//! let client = EvatrClient::new(ClientConfig::default())?;
//! let result = client
//!     .validate_simple(SimpleRequest::new("DE123456789", "ATU12345678"))
//!     .await?;
//! println!("{}: {}", result.status, client.is_success_status(&result.status));
//! ```
//!
//! Requests are checked locally before anything is sent: both VAT-IDs must
//! be present and syntactically valid. There is no retry and no response
//! caching.

mod config;

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;

use crate::core::wire::{
    WireErrorBody, WireMemberState, WireResponse, WireStatusMessage, from_wire_response,
    map_member_state, map_status_message, raw_envelope, to_wire_payload,
};
use crate::core::{
    ApiError, Availability, EvatrError, ExtendedResult, MemberState, QualifiedRequest,
    SimpleRequest, StatusMessage, StatusRegistry, ValidationRequest, ValidationResult, VatId,
};

pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

const VALIDATION_PATH: &str = "/abfrage";
const STATUS_MESSAGES_PATH: &str = "/info/statusmeldungen";
const MEMBER_STATES_PATH: &str = "/info/eu_mitgliedstaaten";

/// Client for confirmation requests and the metadata endpoints.
///
/// Cheap to clone; clones share the connection pool and the registry.
#[derive(Debug, Clone)]
pub struct EvatrClient {
    http: reqwest::Client,
    config: ClientConfig,
    registry: Arc<StatusRegistry>,
}

/// A decoded 2xx response.
struct Fetched {
    headers: BTreeMap<String, String>,
    body: serde_json::Value,
}

impl EvatrClient {
    /// Build a client. Status codes are resolved against the static table.
    ///
    /// # Errors
    ///
    /// [`EvatrError::Config`] if a configured header is not a valid HTTP
    /// header or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, EvatrError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| EvatrError::Config(format!("invalid header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| EvatrError::Config(format!("invalid value for header {name}: {e}")))?;
            headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| EvatrError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config,
            registry: Arc::new(StatusRegistry::new()),
        })
    }

    /// Resolve status codes against `registry` instead of the static table.
    pub fn with_registry(mut self, registry: Arc<StatusRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn registry(&self) -> &StatusRegistry {
        &self.registry
    }

    // --- confirmation requests ---

    /// Send a confirmation request.
    ///
    /// # Errors
    ///
    /// - [`EvatrError::MissingField`] if either VAT-ID is empty
    /// - [`EvatrError::InvalidFormat`] if either VAT-ID fails its syntax check
    /// - [`EvatrError::Api`] for transport failures and non-2xx responses
    /// - [`EvatrError::Decode`] if the response body is not the expected JSON
    pub async fn validate(
        &self,
        request: impl Into<ValidationRequest>,
    ) -> Result<ValidationResult, EvatrError> {
        let request = request.into();
        if request.vat_id_own.is_empty() {
            return Err(EvatrError::MissingField { field: "vat_id_own" });
        }
        if request.vat_id_foreign.is_empty() {
            return Err(EvatrError::MissingField {
                field: "vat_id_foreign",
            });
        }
        let own = VatId::parse_field(&request.vat_id_own, "vat_id_own")?;
        let foreign = VatId::parse_field(&request.vat_id_foreign, "vat_id_foreign")?;

        let normalized = ValidationRequest {
            vat_id_own: own.into_inner(),
            vat_id_foreign: foreign.into_inner(),
            ..request
        };
        let payload = to_wire_payload(&normalized);
        tracing::debug!(
            foreign = %normalized.vat_id_foreign,
            qualified = normalized.company.is_some(),
            "sending confirmation request"
        );

        let url = self.config.endpoint(VALIDATION_PATH);
        let fetched = self.send(self.http.post(&url).json(&payload)).await?;
        let wire: WireResponse = decode(&fetched.body, VALIDATION_PATH)?;

        let mut result = from_wire_response(wire, normalized.vat_id_own, normalized.vat_id_foreign);
        if normalized.include_raw {
            result.raw = Some(raw_envelope(&fetched.headers, &fetched.body));
        }
        tracing::debug!(status = %result.status, "confirmation request answered");
        Ok(result)
    }

    /// [`Self::validate`], projected through the registry.
    ///
    /// # Errors
    ///
    /// As [`Self::validate`], plus [`EvatrError::Decode`] for unparseable dates.
    pub async fn validate_extended(
        &self,
        request: impl Into<ValidationRequest>,
    ) -> Result<ExtendedResult, EvatrError> {
        self.validate(request).await?.into_extended(&self.registry)
    }

    pub async fn validate_simple(
        &self,
        request: SimpleRequest,
    ) -> Result<ValidationResult, EvatrError> {
        self.validate(request).await
    }

    pub async fn validate_simple_extended(
        &self,
        request: SimpleRequest,
    ) -> Result<ExtendedResult, EvatrError> {
        self.validate_extended(request).await
    }

    pub async fn validate_qualified(
        &self,
        request: QualifiedRequest,
    ) -> Result<ValidationResult, EvatrError> {
        self.validate(request).await
    }

    pub async fn validate_qualified_extended(
        &self,
        request: QualifiedRequest,
    ) -> Result<ExtendedResult, EvatrError> {
        self.validate_extended(request).await
    }

    // --- metadata endpoints ---

    /// Current status messages as published by the service.
    pub async fn status_messages(&self) -> Result<Vec<StatusMessage>, EvatrError> {
        let url = self.config.endpoint(STATUS_MESSAGES_PATH);
        tracing::debug!("fetching status messages");
        let fetched = self.send(self.http.get(&url)).await?;
        let wire: Vec<WireStatusMessage> = decode(&fetched.body, STATUS_MESSAGES_PATH)?;
        Ok(wire.into_iter().map(map_status_message).collect())
    }

    /// Member states and whether their VIES system currently answers.
    pub async fn eu_member_states(&self) -> Result<Vec<MemberState>, EvatrError> {
        let url = self.config.endpoint(MEMBER_STATES_PATH);
        tracing::debug!("fetching member states");
        let fetched = self.send(self.http.get(&url)).await?;
        let wire: Vec<WireMemberState> = decode(&fetched.body, MEMBER_STATES_PATH)?;
        Ok(wire.into_iter().map(map_member_state).collect())
    }

    /// [`Self::eu_member_states`] keyed by code.
    pub async fn availability(&self) -> Result<Availability, EvatrError> {
        Ok(self
            .eu_member_states()
            .await?
            .into_iter()
            .map(|s| (s.code, s.available))
            .collect())
    }

    // --- registry delegation ---

    pub fn status_message(&self, code: &str) -> Option<StatusMessage> {
        self.registry.get(code)
    }

    pub fn is_success_status(&self, code: &str) -> bool {
        self.registry.is_success(code)
    }

    pub fn is_error_status(&self, code: &str) -> bool {
        self.registry.is_error(code)
    }

    pub fn is_warning_status(&self, code: &str) -> bool {
        self.registry.is_warning(code)
    }

    /// Send a request and fold every failure into [`ApiError`].
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Fetched, EvatrError> {
        let resp = request.send().await.map_err(transport_error)?;

        let status = resp.status();
        let headers = envelope_headers(resp.headers());
        let text = resp.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let body: WireErrorBody = serde_json::from_str(&text).unwrap_or_default();
            let err = ApiError {
                message: body
                    .message
                    .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16())),
                http: Some(status.as_u16()),
                status: body.status,
                field: body.field,
            };
            tracing::debug!(http = status.as_u16(), status = ?err.status, "request rejected");
            return Err(err.into());
        }

        let body = serde_json::from_str(&text)
            .map_err(|e| EvatrError::Decode(format!("response is not JSON: {e}")))?;
        Ok(Fetched { headers, body })
    }
}

/// Flatten response headers for the raw envelope. Repeated headers are
/// joined with `", "`; non-UTF-8 bytes are replaced, not dropped.
fn envelope_headers(map: &HeaderMap) -> BTreeMap<String, String> {
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in map {
        let value = String::from_utf8_lossy(value.as_bytes());
        match headers.get_mut(name.as_str()) {
            Some(joined) => {
                joined.push_str(", ");
                joined.push_str(&value);
            }
            None => {
                headers.insert(name.as_str().to_string(), value.into_owned());
            }
        }
    }
    headers
}

fn transport_error(e: reqwest::Error) -> EvatrError {
    let mut err = ApiError::new(e.to_string());
    if let Some(status) = e.status() {
        err = err.with_http(status.as_u16());
    }
    err.into()
}

fn decode<T: DeserializeOwned>(body: &serde_json::Value, endpoint: &str) -> Result<T, EvatrError> {
    T::deserialize(body)
        .map_err(|e| EvatrError::Decode(format!("unexpected response from {endpoint}: {e}")))
}
