/// Legacy code for status codes without a reliable historical equivalent.
pub const UNKNOWN_ERROR_CODE: u16 = 999;

/// Map an eVatR status code to the error code of the retired XML-RPC interface.
///
/// The mapping is approximate. Several legacy codes (201, 205, 208, 210, 211,
/// 219, 223) have no modern counterpart; modern codes without a counterpart
/// yield [`UNKNOWN_ERROR_CODE`].
pub fn legacy_error_code(status: &str) -> u16 {
    match status {
        "evatr-0000" => 200,
        "evatr-0001" | "evatr-0007" => 221,
        "evatr-0002" => 215,
        "evatr-0003" => 216,
        "evatr-0004" => 214,
        "evatr-0005" | "evatr-0012" => 209,
        "evatr-0006" => 213,
        "evatr-2001" => 202,
        "evatr-2002" => 203,
        "evatr-2003" => 212,
        "evatr-2005" => 206,
        "evatr-2006" => 204,
        "evatr-2007" => 217,
        "evatr-2008" => 218,
        // 0008, 0011, 0013, 1001-1004, 2004, 2011, 3011
        _ => UNKNOWN_ERROR_CODE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_codes() {
        assert_eq!(legacy_error_code("evatr-0000"), 200);
        assert_eq!(legacy_error_code("evatr-0001"), 221);
        assert_eq!(legacy_error_code("evatr-0007"), 221);
        assert_eq!(legacy_error_code("evatr-0012"), 209);
        assert_eq!(legacy_error_code("evatr-2006"), 204);
        assert_eq!(legacy_error_code("evatr-2008"), 218);
    }

    #[test]
    fn unmapped_codes_use_sentinel() {
        for code in [
            "evatr-0008",
            "evatr-0011",
            "evatr-0013",
            "evatr-1001",
            "evatr-1004",
            "evatr-2004",
            "evatr-2011",
            "evatr-3011",
            "evatr-9999",
            "",
        ] {
            assert_eq!(legacy_error_code(code), UNKNOWN_ERROR_CODE, "{code}");
        }
    }

    #[test]
    fn every_known_status_has_a_code() {
        let registry = crate::core::StatusRegistry::new();
        for code in registry.status_codes() {
            let legacy = legacy_error_code(&code);
            assert!(
                (200..=221).contains(&legacy) || legacy == UNKNOWN_ERROR_CODE,
                "{code} -> {legacy}"
            );
        }
    }
}
