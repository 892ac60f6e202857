use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::EvatrError;
use super::status::StatusRegistry;

/// Per-field outcome of a qualified confirmation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualifiedResultCode {
    /// Matches the registered data.
    A,
    /// Does not match the registered data.
    B,
    /// Not queried.
    C,
    /// Not supplied by the member state.
    D,
}

impl QualifiedResultCode {
    /// Full German explanation as published by the BZSt.
    pub fn explain(self) -> &'static str {
        match self {
            Self::A => "Die Angaben stimmen mit den registrierten Daten überein.",
            Self::B => "Die Angaben stimmen mit den registrierten Daten nicht überein.",
            Self::C => "Die Angaben wurden nicht angefragt.",
            Self::D => "Die Angaben wurden vom EU-Mitgliedsstaat nicht mitgeteilt.",
        }
    }

    /// Short German description used by the legacy result shape.
    pub fn legacy_description(self) -> &'static str {
        match self {
            Self::A => "stimmt überein",
            Self::B => "stimmt nicht überein",
            Self::C => "nicht angefragt",
            Self::D => "vom EU-Mitgliedsstaat nicht mitgeteilt",
        }
    }

    /// Single-letter code as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

/// A confirmation request in its most general form.
///
/// Usually built from a [`SimpleRequest`] or [`QualifiedRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    /// The requester's own German VAT-ID.
    pub vat_id_own: String,
    /// The VAT-ID being confirmed.
    pub vat_id_foreign: String,
    /// Company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// City.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Street and house number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    /// Attach the raw HTTP envelope to the result.
    #[serde(default)]
    pub include_raw: bool,
}

impl ValidationRequest {
    /// A request carrying only the two VAT-IDs.
    pub fn new(vat_id_own: impl Into<String>, vat_id_foreign: impl Into<String>) -> Self {
        Self {
            vat_id_own: vat_id_own.into(),
            vat_id_foreign: vat_id_foreign.into(),
            ..Self::default()
        }
    }

    /// Set the company name.
    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Set the city.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the street.
    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    /// Set the postal code.
    pub fn zip(mut self, zip: impl Into<String>) -> Self {
        self.zip = Some(zip.into());
        self
    }

    /// Request the raw HTTP envelope.
    pub fn include_raw(mut self, include_raw: bool) -> Self {
        self.include_raw = include_raw;
        self
    }
}

/// Simple confirmation: is the foreign VAT-ID valid right now?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleRequest {
    pub vat_id_own: String,
    pub vat_id_foreign: String,
    #[serde(default)]
    pub include_raw: bool,
}

impl SimpleRequest {
    pub fn new(vat_id_own: impl Into<String>, vat_id_foreign: impl Into<String>) -> Self {
        Self {
            vat_id_own: vat_id_own.into(),
            vat_id_foreign: vat_id_foreign.into(),
            include_raw: false,
        }
    }

    /// Request the raw HTTP envelope.
    pub fn include_raw(mut self, include_raw: bool) -> Self {
        self.include_raw = include_raw;
        self
    }
}

impl From<SimpleRequest> for ValidationRequest {
    fn from(req: SimpleRequest) -> Self {
        Self {
            vat_id_own: req.vat_id_own,
            vat_id_foreign: req.vat_id_foreign,
            include_raw: req.include_raw,
            ..Self::default()
        }
    }
}

/// Qualified confirmation: validity plus a comparison of company data.
///
/// Company name and city are mandatory; street and postal code are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifiedRequest {
    pub vat_id_own: String,
    pub vat_id_foreign: String,
    pub company: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default)]
    pub include_raw: bool,
}

impl QualifiedRequest {
    pub fn new(
        vat_id_own: impl Into<String>,
        vat_id_foreign: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            vat_id_own: vat_id_own.into(),
            vat_id_foreign: vat_id_foreign.into(),
            company: company.into(),
            location: location.into(),
            street: None,
            zip: None,
            include_raw: false,
        }
    }

    /// Set the street.
    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    /// Set the postal code.
    pub fn zip(mut self, zip: impl Into<String>) -> Self {
        self.zip = Some(zip.into());
        self
    }

    /// Request the raw HTTP envelope.
    pub fn include_raw(mut self, include_raw: bool) -> Self {
        self.include_raw = include_raw;
        self
    }
}

impl From<QualifiedRequest> for ValidationRequest {
    fn from(req: QualifiedRequest) -> Self {
        Self {
            vat_id_own: req.vat_id_own,
            vat_id_foreign: req.vat_id_foreign,
            company: Some(req.company),
            location: Some(req.location),
            street: req.street,
            zip: req.zip,
            include_raw: req.include_raw,
        }
    }
}

/// Result of a confirmation request, with dates as delivered by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Technical request ID assigned by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Time of the query (ISO-8601).
    pub timestamp: String,
    /// Status code, e.g. `evatr-0000`.
    pub status: String,
    /// Normalized own VAT-ID.
    pub vat_id_own: String,
    /// Normalized foreign VAT-ID.
    pub vat_id_foreign: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_till: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<QualifiedResultCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<QualifiedResultCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<QualifiedResultCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<QualifiedResultCode>,
    /// JSON envelope `{"headers": …, "data": …}` of the HTTP response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// [`ValidationResult`] with parsed dates and the registry's verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// `true` if the status counts as success.
    pub valid: bool,
    pub status: String,
    /// German status message, if the status is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub vat_id_own: String,
    pub vat_id_foreign: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_till: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<QualifiedResultCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<QualifiedResultCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<QualifiedResultCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<QualifiedResultCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl ValidationResult {
    /// Parse dates and resolve the status against `registry`.
    ///
    /// # Errors
    ///
    /// [`EvatrError::Decode`] if the timestamp or a validity date is present
    /// but cannot be parsed.
    pub fn into_extended(self, registry: &StatusRegistry) -> Result<ExtendedResult, EvatrError> {
        let timestamp = parse_timestamp(&self.timestamp)?;
        let valid_from = self.valid_from.as_deref().map(parse_date).transpose()?;
        let valid_till = self.valid_till.as_deref().map(parse_date).transpose()?;
        let table = registry.table();

        Ok(ExtendedResult {
            id: self.id,
            timestamp,
            valid: table.is_success(&self.status),
            message: table.get(&self.status).map(|m| m.message.clone()),
            status: self.status,
            vat_id_own: self.vat_id_own,
            vat_id_foreign: self.vat_id_foreign,
            valid_from,
            valid_till,
            company: self.company,
            street: self.street,
            zip: self.zip,
            location: self.location,
            raw: self.raw,
        })
    }
}

/// A member state as reported by the availability endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberState {
    /// Two-letter code.
    pub code: String,
    /// German country name.
    pub name: String,
    /// Whether the member state's VIES system currently answers.
    pub available: bool,
}

/// Availability keyed by member-state code.
pub type Availability = BTreeMap<String, bool>;

/// Parse an ISO-8601 timestamp. Offsets are honored; a timestamp without
/// offset or a bare date is taken as UTC.
pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, EvatrError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| EvatrError::Decode(format!("invalid timestamp: {s}")))
}

/// Dates keep the calendar day of their own offset; a timestamp is never
/// shifted to UTC first.
fn parse_date(s: &str) -> Result<NaiveDate, EvatrError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .map_err(|_| EvatrError::Decode(format!("invalid date: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn result(status: &str) -> ValidationResult {
        ValidationResult {
            id: Some("abc123".into()),
            timestamp: "2025-07-23T14:30:00.000Z".into(),
            status: status.into(),
            vat_id_own: "DE123456789".into(),
            vat_id_foreign: "ATU12345678".into(),
            valid_from: None,
            valid_till: None,
            company: None,
            street: None,
            zip: None,
            location: None,
            raw: None,
        }
    }

    #[test]
    fn qualified_request_converts() {
        let req: ValidationRequest = QualifiedRequest::new("DE1", "AT2", "ACME", "Wien")
            .zip("1010")
            .include_raw(true)
            .into();
        assert_eq!(req.company.as_deref(), Some("ACME"));
        assert_eq!(req.location.as_deref(), Some("Wien"));
        assert_eq!(req.zip.as_deref(), Some("1010"));
        assert_eq!(req.street, None);
        assert!(req.include_raw);
    }

    #[test]
    fn simple_request_converts() {
        let req: ValidationRequest = SimpleRequest::new("DE1", "AT2").into();
        assert_eq!(req, ValidationRequest::new("DE1", "AT2"));
    }

    #[test]
    fn extended_valid_result() {
        let ext = result("evatr-0000")
            .into_extended(&StatusRegistry::new())
            .unwrap();
        assert!(ext.valid);
        assert_eq!(
            ext.message.as_deref(),
            Some("Die angefragte Ust-IdNr. ist zum Anfragezeitpunkt gültig.")
        );
        assert_eq!(ext.timestamp.year(), 2025);
        assert_eq!(ext.timestamp.hour(), 14);
        assert_eq!(ext.valid_from, None);
    }

    #[test]
    fn extended_parses_validity_window() {
        let mut r = result("evatr-2006");
        r.valid_from = Some("2020-01-01".into());
        r.valid_till = Some("2024-12-31".into());
        let ext = r.into_extended(&StatusRegistry::new()).unwrap();
        assert!(ext.valid);
        assert_eq!(ext.valid_from, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(ext.valid_till, NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn extended_dates_keep_their_own_offset() {
        let mut r = result("evatr-0000");
        r.valid_from = Some("2025-01-01T00:00:00+01:00".into());
        r.valid_till = Some("2025-06-30T23:30:00-02:00".into());
        let ext = r.into_extended(&StatusRegistry::new()).unwrap();
        assert_eq!(ext.valid_from, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(ext.valid_till, NaiveDate::from_ymd_opt(2025, 6, 30));

        let mut r = result("evatr-0000");
        r.valid_from = Some("2025-01-01T00:00:00".into());
        let ext = r.into_extended(&StatusRegistry::new()).unwrap();
        assert_eq!(ext.valid_from, NaiveDate::from_ymd_opt(2025, 1, 1));
    }

    #[test]
    fn extended_reads_one_snapshot() {
        let registry = StatusRegistry::new();
        let table = registry.table();
        let ext = result("evatr-2002").into_extended(&registry).unwrap();
        assert_eq!(ext.valid, table.is_success("evatr-2002"));
        assert_eq!(
            ext.message.as_deref(),
            table.get("evatr-2002").map(|m| m.message.as_str())
        );
    }

    #[test]
    fn extended_unknown_status() {
        let ext = result("evatr-9999")
            .into_extended(&StatusRegistry::new())
            .unwrap();
        assert!(!ext.valid);
        assert_eq!(ext.message, None);
    }

    #[test]
    fn extended_rejects_bad_dates() {
        let mut r = result("evatr-0000");
        r.valid_from = Some("01.01.2020".into());
        assert!(matches!(
            r.into_extended(&StatusRegistry::new()),
            Err(EvatrError::Decode(_))
        ));

        let mut r = result("evatr-0000");
        r.timestamp = "yesterday".into();
        assert!(r.into_extended(&StatusRegistry::new()).is_err());
    }

    #[test]
    fn timestamp_formats() {
        let offset = parse_timestamp("2025-07-23T16:30:00+02:00").unwrap();
        assert_eq!(offset.hour(), 14);
        let naive = parse_timestamp("2025-07-23T14:30:00").unwrap();
        assert_eq!(naive, offset);
        let date = parse_timestamp("2025-07-23").unwrap();
        assert_eq!(date.hour(), 0);
    }

    #[test]
    fn result_serializes_camel_case_without_absent_fields() {
        let mut r = result("evatr-0000");
        r.company = Some(QualifiedResultCode::A);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["vatIdForeign"], "ATU12345678");
        assert_eq!(json["company"], "A");
        assert!(json.get("validFrom").is_none());
        assert!(json.get("raw").is_none());
    }

    #[test]
    fn result_code_texts() {
        assert_eq!(QualifiedResultCode::B.legacy_description(), "stimmt nicht überein");
        assert!(QualifiedResultCode::D.explain().contains("EU-Mitgliedsstaat"));
        assert_eq!(QualifiedResultCode::C.as_str(), "C");
    }
}
