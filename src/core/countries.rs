//! EU member states reachable through the eVatR service.
//!
//! Country codes follow the VAT-ID prefixes used by the service, which differ
//! from ISO 3166-1 for Greece (`GR`, as listed by the BZSt) and add `XI` for
//! Northern Ireland.

/// Check whether `code` is a member state the service can be asked about.
///
/// Case-insensitive: `"at"` and `"AT"` are both accepted.
pub fn is_eu_member_state(code: &str) -> bool {
    lookup(code).is_some()
}

/// English name of a member state, or `None` for unknown codes.
pub fn country_name(code: &str) -> Option<&'static str> {
    lookup(code).map(|(_, name)| *name)
}

/// All supported member-state codes, sorted.
pub fn supported_country_codes() -> Vec<&'static str> {
    EU_MEMBER_STATES.iter().map(|(code, _)| *code).collect()
}

/// All supported member states as `(code, name)` pairs, sorted by code.
pub fn supported_countries() -> &'static [(&'static str, &'static str)] {
    EU_MEMBER_STATES
}

fn lookup(code: &str) -> Option<&'static (&'static str, &'static str)> {
    if code.len() != 2 {
        return None;
    }
    let upper = code.to_ascii_uppercase();
    EU_MEMBER_STATES
        .binary_search_by(|(c, _)| (*c).cmp(upper.as_str()))
        .ok()
        .map(|idx| &EU_MEMBER_STATES[idx])
}

/// Member states with their English names (28 entries).
/// Sorted by code for binary search.
static EU_MEMBER_STATES: &[(&str, &str)] = &[
    ("AT", "Austria"),
    ("BE", "Belgium"),
    ("BG", "Bulgaria"),
    ("CY", "Cyprus"),
    ("CZ", "Czech Republic"),
    ("DE", "Germany"),
    ("DK", "Denmark"),
    ("EE", "Estonia"),
    ("ES", "Spain"),
    ("FI", "Finland"),
    ("FR", "France"),
    ("GR", "Greece"),
    ("HR", "Croatia"),
    ("HU", "Hungary"),
    ("IE", "Ireland"),
    ("IT", "Italy"),
    ("LT", "Lithuania"),
    ("LU", "Luxembourg"),
    ("LV", "Latvia"),
    ("MT", "Malta"),
    ("NL", "Netherlands"),
    ("PL", "Poland"),
    ("PT", "Portugal"),
    ("RO", "Romania"),
    ("SE", "Sweden"),
    ("SI", "Slovenia"),
    ("SK", "Slovakia"),
    ("XI", "Northern Ireland"),
];
