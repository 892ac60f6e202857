#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic; the newtype and the plain check must agree.
        let valid = evatr::check_vat_id_syntax(s);
        if !s.is_empty() {
            assert_eq!(evatr::VatId::parse(s).is_ok(), valid);
        }
        let _ = evatr::can_request(s, s);
        let _ = evatr::has_valid_german_check_digit(s);
        let _ = evatr::german_check_digit(s);
    }
});
