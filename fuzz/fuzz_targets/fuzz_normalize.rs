#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let once = evatr::normalize_vat_id(s);
        assert_eq!(evatr::normalize_vat_id(&once), once);
        assert!(once.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_uppercase()));
    }
});
