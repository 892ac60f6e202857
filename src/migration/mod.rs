//! Compatibility layer for code written against the retired XML-RPC `evatr` API.
//!
//! [`LegacyClient`] accepts the old parameter names and returns the old result
//! shape, including a numeric `error_code` instead of the eVatR status.
//! Differences from the XML-RPC interface:
//!
//! - `include_raw` attaches the JSON of the modern result, not XML
//! - error codes are approximated from the new status codes
//!   (see [`legacy_error_code`])
//! - `error_description` is the message returned by the REST service
//! - `status` is returned in addition to the error code
//!
//! Unlike [`EvatrClient`], the checks here never fail. Any error is folded
//! into a result with `valid == false`.
//!
//! # Example
//!
//! ```ignore
//! use evatr::migration::{LegacyClient, LegacySimpleParams};
//!
//! let legacy = LegacyClient::with_defaults()?;
//! let result = legacy
//!     .check_simple(&LegacySimpleParams::new("DE123456789", "ATU12345678"))
//!     .await;
//! println!("{} {}", result.error_code, result.valid);
//! ```

mod codes;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::client::{ClientConfig, EvatrClient};
use crate::core::{
    EvatrError, QualifiedRequest, QualifiedResultCode, SimpleRequest, ValidationResult,
    parse_timestamp,
};

pub use codes::{UNKNOWN_ERROR_CODE, legacy_error_code};

/// Parameters of a simple check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySimpleParams {
    #[serde(default)]
    pub include_raw: bool,
    /// Own German VAT-ID.
    pub own_vat_number: String,
    /// VAT-ID to check.
    pub validate_vat_number: String,
}

impl LegacySimpleParams {
    pub fn new(own_vat_number: impl Into<String>, validate_vat_number: impl Into<String>) -> Self {
        Self {
            include_raw: false,
            own_vat_number: own_vat_number.into(),
            validate_vat_number: validate_vat_number.into(),
        }
    }

    pub fn include_raw(mut self, include_raw: bool) -> Self {
        self.include_raw = include_raw;
        self
    }
}

/// Parameters of a qualified check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyQualifiedParams {
    #[serde(flatten)]
    pub simple: LegacySimpleParams,
    pub company_name: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
}

impl LegacyQualifiedParams {
    pub fn new(
        own_vat_number: impl Into<String>,
        validate_vat_number: impl Into<String>,
        company_name: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            simple: LegacySimpleParams::new(own_vat_number, validate_vat_number),
            company_name: company_name.into(),
            city: city.into(),
            zip: None,
            street: None,
        }
    }

    pub fn zip(mut self, zip: impl Into<String>) -> Self {
        self.zip = Some(zip.into());
        self
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn include_raw(mut self, include_raw: bool) -> Self {
        self.simple.include_raw = include_raw;
        self
    }
}

/// Result of a simple check in the legacy shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySimpleResult {
    /// Pretty-printed JSON of the modern result, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    /// Query date, `DD.MM.YYYY` in local time.
    pub date: String,
    /// Query time, `HH:MM:SS` in local time.
    pub time: String,
    /// Legacy error code; 200 means valid.
    pub error_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    /// eVatR status code, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub own_vat_number: String,
    pub validated_vat_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    pub valid: bool,
}

/// Result of a qualified check in the legacy shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyQualifiedResult {
    #[serde(flatten)]
    pub simple: LegacySimpleResult,
    pub company_name: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_name: Option<QualifiedResultCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_city: Option<QualifiedResultCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_zip: Option<QualifiedResultCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_street: Option<QualifiedResultCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_name_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_city_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_zip_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_street_description: Option<String>,
}

/// Adapter exposing the legacy call shapes on top of an [`EvatrClient`].
#[derive(Debug, Clone)]
pub struct LegacyClient {
    client: EvatrClient,
}

impl LegacyClient {
    pub fn new(client: EvatrClient) -> Self {
        Self { client }
    }

    /// A legacy client on top of a default [`EvatrClient`].
    ///
    /// # Errors
    ///
    /// As [`EvatrClient::new`].
    pub fn with_defaults() -> Result<Self, EvatrError> {
        Ok(Self::new(EvatrClient::new(ClientConfig::default())?))
    }

    pub fn inner(&self) -> &EvatrClient {
        &self.client
    }

    /// Simple check. Never fails; errors become `valid == false`.
    pub async fn check_simple(&self, params: &LegacySimpleParams) -> LegacySimpleResult {
        let request = SimpleRequest::new(&params.own_vat_number, &params.validate_vat_number);
        match self.client.validate_simple(request).await {
            Ok(result) => self.simple_result(&result, params.include_raw),
            Err(e) => failed_result(&e, params),
        }
    }

    /// Qualified check. Never fails; errors become `valid == false`.
    pub async fn check_qualified(&self, params: &LegacyQualifiedParams) -> LegacyQualifiedResult {
        let mut request = QualifiedRequest::new(
            &params.simple.own_vat_number,
            &params.simple.validate_vat_number,
            &params.company_name,
            &params.city,
        );
        request.street = params.street.clone();
        request.zip = params.zip.clone();

        let (simple, codes) = match self.client.validate_qualified(request).await {
            Ok(result) => {
                let codes = [result.company, result.location, result.zip, result.street];
                (self.simple_result(&result, params.simple.include_raw), codes)
            }
            Err(e) => (failed_result(&e, &params.simple), [None; 4]),
        };
        let [name, city, zip, street] = codes;
        let describe = |code: Option<QualifiedResultCode>| {
            code.map(|c| c.legacy_description().to_string())
        };

        LegacyQualifiedResult {
            simple,
            company_name: params.company_name.clone(),
            city: params.city.clone(),
            zip: params.zip.clone(),
            street: params.street.clone(),
            result_name: name,
            result_city: city,
            result_zip: zip,
            result_street: street,
            result_name_description: describe(name),
            result_city_description: describe(city),
            result_zip_description: describe(zip),
            result_street_description: describe(street),
        }
    }

    fn simple_result(&self, result: &ValidationResult, include_raw: bool) -> LegacySimpleResult {
        let message = self.client.status_message(&result.status);
        // An unparseable timestamp falls back to the local clock.
        let when = parse_timestamp(&result.timestamp)
            .map(|ts| ts.with_timezone(&Local))
            .unwrap_or_else(|_| Local::now());
        let (date, time) = split_timestamp(&when);

        LegacySimpleResult {
            raw: include_raw
                .then(|| serde_json::to_string_pretty(result).ok())
                .flatten(),
            date,
            time,
            error_code: legacy_error_code(&result.status),
            error_description: message.as_ref().map(|m| m.message.clone()),
            status: message.map(|m| m.status),
            own_vat_number: result.vat_id_own.clone(),
            validated_vat_number: result.vat_id_foreign.clone(),
            valid_from: result.valid_from.clone(),
            valid_until: result.valid_till.clone(),
            valid: self.client.is_success_status(&result.status),
        }
    }
}

fn failed_result(err: &EvatrError, params: &LegacySimpleParams) -> LegacySimpleResult {
    tracing::warn!(error = %err, "legacy check failed");
    let (date, time) = split_timestamp(&Local::now());
    LegacySimpleResult {
        raw: None,
        date,
        time,
        error_code: failure_code(err),
        error_description: Some(err.message()),
        status: err.status().map(str::to_string),
        own_vat_number: params.own_vat_number.clone(),
        validated_vat_number: params.validate_vat_number.clone(),
        valid_from: None,
        valid_until: None,
        valid: false,
    }
}

/// Status from the error body if any, else the HTTP status, else the sentinel.
fn failure_code(err: &EvatrError) -> u16 {
    match (err.status(), err.http()) {
        (Some(status), _) => legacy_error_code(status),
        (None, Some(http)) => http,
        (None, None) => UNKNOWN_ERROR_CODE,
    }
}

fn split_timestamp<Tz: TimeZone>(when: &DateTime<Tz>) -> (String, String)
where
    Tz::Offset: std::fmt::Display,
{
    (
        when.format("%d.%m.%Y").to_string(),
        when.format("%H:%M:%S").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ApiError;
    use chrono::Utc;

    #[test]
    fn failure_code_prefers_status() {
        let err = EvatrError::from(ApiError {
            message: "x".into(),
            http: Some(400),
            status: Some("evatr-0004".into()),
            field: None,
        });
        assert_eq!(failure_code(&err), 214);
    }

    #[test]
    fn failure_code_falls_back_to_http_then_sentinel() {
        let err = EvatrError::from(ApiError::new("down").with_http(503));
        assert_eq!(failure_code(&err), 503);

        let err = EvatrError::MissingField { field: "vat_id_own" };
        assert_eq!(failure_code(&err), UNKNOWN_ERROR_CODE);
    }

    #[test]
    fn timestamp_split() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(
            split_timestamp(&ts),
            ("07.03.2025".to_string(), "09:05:01".to_string())
        );
    }

    #[test]
    fn qualified_params_flatten() {
        let params = LegacyQualifiedParams::new("DE123456789", "ATU12345678", "ACME", "Wien")
            .zip("1010")
            .include_raw(true);
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["ownVatNumber"], "DE123456789");
        assert_eq!(json["companyName"], "ACME");
        assert_eq!(json["includeRaw"], true);
        assert!(json.get("street").is_none());

        let back: LegacyQualifiedParams = serde_json::from_value(json).unwrap();
        assert_eq!(back, params);
    }

    #[tokio::test]
    async fn invalid_input_yields_failed_result() {
        let legacy = LegacyClient::with_defaults().unwrap();
        let result = legacy
            .check_simple(&LegacySimpleParams::new("INVALID", "ATU12345678"))
            .await;
        assert!(!result.valid);
        assert_eq!(result.error_code, UNKNOWN_ERROR_CODE);
        assert_eq!(result.own_vat_number, "INVALID");
        assert!(
            result
                .error_description
                .as_deref()
                .is_some_and(|d| d.contains("vat_id_own"))
        );
        assert_eq!(result.date.len(), 10);
        assert_eq!(result.time.len(), 8);
    }

    #[tokio::test]
    async fn qualified_failure_echoes_company_data() {
        let legacy = LegacyClient::with_defaults().unwrap();
        let params = LegacyQualifiedParams::new("", "ATU12345678", "ACME", "Wien").street("Ring 1");
        let result = legacy.check_qualified(&params).await;
        assert!(!result.simple.valid);
        assert_eq!(result.company_name, "ACME");
        assert_eq!(result.street.as_deref(), Some("Ring 1"));
        assert_eq!(result.result_name, None);
        assert_eq!(result.result_name_description, None);
    }
}
