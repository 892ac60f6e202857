//! Wire format of the eVatR REST API and its mapping to the crate's types.
//!
//! The service speaks German field names (`anfragendeUstid`, `ergFirmenname`,
//! `kategorie`, ...). Nothing outside this module sees them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::status::{StatusCategory, StatusMessage};
use super::types::{MemberState, QualifiedResultCode, ValidationRequest, ValidationResult};

/// Body of `POST /abfrage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRequest {
    pub anfragende_ustid: String,
    pub angefragte_ustid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmenname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strasse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plz: Option<String>,
}

/// Successful response of `POST /abfrage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub anfrage_zeitpunkt: String,
    pub status: String,
    #[serde(default)]
    pub gueltig_ab: Option<String>,
    #[serde(default)]
    pub gueltig_bis: Option<String>,
    #[serde(default)]
    pub erg_firmenname: Option<QualifiedResultCode>,
    #[serde(default)]
    pub erg_strasse: Option<QualifiedResultCode>,
    #[serde(default)]
    pub erg_plz: Option<QualifiedResultCode>,
    #[serde(default)]
    pub erg_ort: Option<QualifiedResultCode>,
}

/// Entry of `GET /info/statusmeldungen`, also the snapshot file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireStatusMessage {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kategorie: Option<String>,
    #[serde(default)]
    pub httpcode: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feld: Option<String>,
    pub meldung: String,
}

/// Entry of `GET /info/eu_mitgliedstaaten`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMemberState {
    pub alpha2: String,
    #[serde(default)]
    pub name: String,
    pub verfuegbar: bool,
}

/// Body of a non-2xx response. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WireErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}

/// Build the request body. `include_raw` is client-side only and not sent.
pub fn to_wire_payload(req: &ValidationRequest) -> WireRequest {
    WireRequest {
        anfragende_ustid: req.vat_id_own.clone(),
        angefragte_ustid: req.vat_id_foreign.clone(),
        firmenname: req.company.clone(),
        ort: req.location.clone(),
        strasse: req.street.clone(),
        plz: req.zip.clone(),
    }
}

/// Map a response, carrying the request's normalized VAT-IDs through.
pub fn from_wire_response(
    resp: WireResponse,
    vat_id_own: impl Into<String>,
    vat_id_foreign: impl Into<String>,
) -> ValidationResult {
    ValidationResult {
        id: resp.id,
        timestamp: resp.anfrage_zeitpunkt,
        status: resp.status,
        vat_id_own: vat_id_own.into(),
        vat_id_foreign: vat_id_foreign.into(),
        valid_from: resp.gueltig_ab,
        valid_till: resp.gueltig_bis,
        company: resp.erg_firmenname,
        street: resp.erg_strasse,
        zip: resp.erg_plz,
        location: resp.erg_ort,
        raw: None,
    }
}

/// Ergebnis/Fehler/Hinweis become Result/Error/Hint; other labels stay absent.
pub fn map_status_message(msg: WireStatusMessage) -> StatusMessage {
    StatusMessage {
        category: msg
            .kategorie
            .as_deref()
            .and_then(StatusCategory::from_wire_label),
        status: msg.status,
        http: msg.httpcode,
        field: msg.feld,
        message: msg.meldung,
    }
}

pub fn map_member_state(state: WireMemberState) -> MemberState {
    MemberState {
        code: state.alpha2,
        name: state.name,
        available: state.verfuegbar,
    }
}

/// Serialize the response headers and body as `{"headers": …, "data": …}`.
pub fn raw_envelope(headers: &BTreeMap<String, String>, data: &serde_json::Value) -> String {
    serde_json::json!({
        "headers": headers,
        "data": data,
    })
    .to_string()
}
