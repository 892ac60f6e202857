//! VAT-ID normalization and syntax checks.
//!
//! Every check runs on the normalized form: ASCII letters and digits only,
//! uppercased. Spaces, dots, dashes and lowercase input are therefore accepted
//! by construction.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::countries::is_eu_member_state;
use super::error::EvatrError;

/// Syntax rules per country, as published by the issuing authorities.
///
/// Each pattern is anchored on both ends. IE, LT and XI carry a second
/// alternative for a historical shape.
static VATID_PATTERNS: &[(&str, &str)] = &[
    ("AT", r"^ATU\d{8}$"),
    ("BE", r"^BE[01]\d{9}$"),
    ("BG", r"^BG\d{9,10}$"),
    ("CY", r"^CY\d{8}[A-Z]$"),
    ("CZ", r"^CZ\d{8,10}$"),
    ("DE", r"^DE\d{9}$"),
    ("DK", r"^DK\d{8}$"),
    ("EE", r"^EE\d{9}$"),
    ("ES", r"^ES[A-Z]\d{7}[A-Z0-9]$"),
    ("FI", r"^FI\d{8}$"),
    ("FR", r"^FR[A-Z0-9]{2}\d{9}$"),
    ("GR", r"^GR\d{9}$"),
    ("HR", r"^HR\d{11}$"),
    ("HU", r"^HU\d{8}$"),
    ("IE", r"^IE\d[A-Z0-9]\d{5}[A-Z]$|^\d{7}[A-Z]{1,2}$"),
    ("IT", r"^IT\d{11}$"),
    ("LT", r"^LT\d{9}$|^\d{12}$"),
    ("LU", r"^LU\d{8}$"),
    ("LV", r"^LV\d{11}$"),
    ("MT", r"^MT\d{8}$"),
    ("NL", r"^NL\d{9}B\d{2}$"),
    ("PL", r"^PL\d{10}$"),
    ("PT", r"^PT\d{9}$"),
    ("RO", r"^RO\d{2,10}$"),
    ("SE", r"^SE\d{10}01$"),
    ("SI", r"^SI\d{8}$"),
    ("SK", r"^SK\d{10}$"),
    ("XI", r"^XI\d{9}$|^\d{12}$"),
];

static COMPILED_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    VATID_PATTERNS
        .iter()
        .map(|&(code, pattern)| (code, Regex::new(pattern).expect("valid VAT-ID pattern")))
        .collect()
});

fn pattern_for(country: &str) -> Option<&'static Regex> {
    COMPILED_PATTERNS
        .iter()
        .find(|(code, _)| *code == country)
        .map(|(_, re)| re)
}

/// Strip everything but ASCII letters and digits, then uppercase.
///
/// Total and idempotent.
pub fn normalize_vat_id(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// The first two characters of the normalized VAT-ID.
///
/// Shorter input yields whatever is there; no validation happens.
pub fn country_code(raw: &str) -> String {
    normalize_vat_id(raw).chars().take(2).collect()
}

/// Check a VAT-ID against the pattern of the country in its prefix.
///
/// Fails closed: empty input, a prefix that is not two letters, and
/// countries without a pattern all return `false`.
pub fn check_vat_id_syntax(raw: &str) -> bool {
    let clean = normalize_vat_id(raw);
    let prefix = clean.as_bytes();
    if prefix.len() < 2 || !prefix[0].is_ascii_alphabetic() || !prefix[1].is_ascii_alphabetic() {
        return false;
    }

    match pattern_for(&clean[..2]) {
        Some(re) => re.is_match(&clean),
        None => false,
    }
}

/// Check a VAT-ID against a specific country's pattern.
///
/// With `country = None` the country is taken from the VAT-ID itself.
/// Unlike [`check_vat_id_syntax`] this does not require a letter prefix,
/// so the prefix-less alternatives of IE, LT and XI can be tested directly.
pub fn check_vat_id_syntax_for_country(raw: &str, country: Option<&str>) -> bool {
    let clean = normalize_vat_id(raw);
    let country = match country {
        Some(c) => c.to_ascii_uppercase(),
        None => clean.chars().take(2).collect(),
    };

    pattern_for(&country).is_some_and(|re| re.is_match(&clean))
}

/// Numeric part of a VAT-ID: the normalized value without its two-character
/// prefix and without any letters.
pub fn vat_id_number(raw: &str) -> String {
    normalize_vat_id(raw)
        .chars()
        .skip(2)
        .filter(char::is_ascii_digit)
        .collect()
}

/// `true` for a syntactically valid German VAT-ID.
pub fn is_german_vat_id(raw: &str) -> bool {
    let clean = normalize_vat_id(raw);
    clean.starts_with("DE") && check_vat_id_syntax_for_country(&clean, Some("DE"))
}

/// Whether `own` may ask the service about `foreign`.
///
/// Only German-registered requesters may query, and only for VAT-IDs of
/// EU member states (Germany included).
pub fn can_request(own: &str, foreign: &str) -> bool {
    if !is_german_vat_id(own) {
        return false;
    }
    is_eu_member_state(&country_code(foreign))
}

/// Country codes that have a syntax pattern, in table order.
pub fn supported_pattern_codes() -> Vec<&'static str> {
    VATID_PATTERNS.iter().map(|(code, _)| *code).collect()
}

/// A normalized, syntactically valid VAT-ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VatId(String);

impl VatId {
    /// Normalize and syntax-check `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`EvatrError::MissingField`] for empty input and
    /// [`EvatrError::InvalidFormat`] when the normalized value fails its
    /// country pattern.
    pub fn parse(raw: &str) -> Result<Self, EvatrError> {
        Self::parse_field(raw, "vat_id")
    }

    pub(crate) fn parse_field(raw: &str, field: &'static str) -> Result<Self, EvatrError> {
        if raw.is_empty() {
            return Err(EvatrError::MissingField { field });
        }
        let clean = normalize_vat_id(raw);
        if !check_vat_id_syntax(&clean) {
            return Err(EvatrError::InvalidFormat {
                field,
                value: clean,
            });
        }
        Ok(Self(clean))
    }

    /// Two-letter country prefix.
    pub fn country(&self) -> &str {
        &self.0[..2]
    }

    /// Everything after the country prefix.
    pub fn number(&self) -> &str {
        &self.0[2..]
    }

    /// The normalized VAT-ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the normalized string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for VatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VatId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VatId {
    type Error = EvatrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VatId> for String {
    fn from(value: VatId) -> Self {
        value.0
    }
}

impl std::str::FromStr for VatId {
    type Err = EvatrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
