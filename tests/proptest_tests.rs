//! Property-based tests for normalization, syntax checks and the check digit.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "core")]

use evatr::core::*;
use proptest::prelude::*;

/// Separators a user might type between the characters of a VAT-ID.
fn separator() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["", " ", ".", "-", "/", "  "]).prop_map(String::from)
}

/// A VAT-ID with random case and random separators between its characters.
fn decorated(id: String) -> impl Strategy<Value = String> {
    let n = id.len();
    (
        prop::collection::vec(separator(), n),
        prop::collection::vec(any::<bool>(), n),
    )
        .prop_map(move |(seps, lower)| {
            id.chars()
                .zip(seps.iter().zip(lower.iter()))
                .map(|(c, (sep, &lower))| {
                    let c = if lower { c.to_ascii_lowercase() } else { c };
                    format!("{c}{sep}")
                })
                .collect()
        })
}

fn german_vat_id() -> impl Strategy<Value = String> {
    "[0-9]{9}".prop_map(|digits| format!("DE{digits}"))
}

fn austrian_vat_id() -> impl Strategy<Value = String> {
    "[0-9]{8}".prop_map(|digits| format!("ATU{digits}"))
}

fn dutch_vat_id() -> impl Strategy<Value = String> {
    ("[0-9]{9}", "[0-9]{2}").prop_map(|(a, b)| format!("NL{a}B{b}"))
}

proptest! {
    #[test]
    fn normalize_is_idempotent(raw in ".{0,40}") {
        let once = normalize_vat_id(&raw);
        prop_assert_eq!(normalize_vat_id(&once), once.clone());
    }

    #[test]
    fn normalize_yields_uppercase_alphanumerics(raw in ".{0,40}") {
        let clean = normalize_vat_id(&raw);
        prop_assert!(clean.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn syntax_check_never_panics(raw in ".{0,40}") {
        let _ = check_vat_id_syntax(&raw);
        let _ = check_vat_id_syntax_for_country(&raw, None);
        let _ = country_code(&raw);
    }

    #[test]
    fn syntax_check_ignores_decoration(
        id in prop_oneof![german_vat_id(), austrian_vat_id(), dutch_vat_id()]
            .prop_flat_map(|id| (Just(id.clone()), decorated(id)))
    ) {
        let (plain, fancy) = id;
        prop_assert!(check_vat_id_syntax(&plain));
        prop_assert!(check_vat_id_syntax(&fancy), "{:?} rejected", fancy);
        prop_assert_eq!(normalize_vat_id(&fancy), plain);
    }

    #[test]
    fn vat_id_parse_agrees_with_syntax_check(raw in "[A-Za-z]{2}[0-9A-Za-z .-]{0,14}") {
        prop_assert_eq!(VatId::parse(&raw).is_ok(), check_vat_id_syntax(&raw));
    }

    #[test]
    fn check_digit_is_a_digit(digits in "[0-9]{9}") {
        let d = german_check_digit(&digits).unwrap();
        prop_assert!(d <= 9);
    }

    #[test]
    fn check_digit_ignores_ninth_digit(prefix in "[0-9]{8}", a in 0u8..10, b in 0u8..10) {
        prop_assert_eq!(
            german_check_digit(&format!("{prefix}{a}")).unwrap(),
            german_check_digit(&format!("{prefix}{b}")).unwrap()
        );
    }

    #[test]
    fn completed_german_ids_pass_check(prefix in "[0-9]{8}") {
        let d = german_check_digit(&format!("{prefix}0")).unwrap();
        let id = format!("DE{prefix}{d}");
        prop_assert!(has_valid_german_check_digit(&id));
        prop_assert!(is_german_vat_id(&id));
    }

    #[test]
    fn check_digit_rejects_other_lengths(digits in "[0-9]{0,8}|[0-9]{10,12}") {
        let rejected = matches!(
            german_check_digit(&digits),
            Err(EvatrError::InvalidLength { .. })
        );
        prop_assert!(rejected);
    }
}
