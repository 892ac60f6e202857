//! Check digit for German VAT-IDs (ISO 7064 MOD 11,10).

use super::error::EvatrError;
use super::vat_id::normalize_vat_id;

/// Compute the expected ninth digit of a German VAT-ID number.
///
/// `nine_digits` is the number without the `DE` prefix. Only the first eight
/// digits enter the calculation; the ninth is not compared, the caller does
/// that with the returned value.
///
/// # Errors
///
/// [`EvatrError::InvalidLength`] unless the input is exactly nine ASCII digits.
pub fn german_check_digit(nine_digits: &str) -> Result<u8, EvatrError> {
    let bytes = nine_digits.as_bytes();
    if bytes.len() != 9 || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(EvatrError::InvalidLength {
            value: nine_digits.into(),
        });
    }

    let mut product: u8 = 10;
    for b in &bytes[..8] {
        let digit = b - b'0';
        let sum = match (digit + product) % 10 {
            0 => 10,
            s => s,
        };
        product = (2 * sum) % 11;
    }

    Ok(match 11 - product {
        10 => 0,
        check => check,
    })
}

/// `true` if `raw` is a German VAT-ID whose last digit matches its check digit.
///
/// Input is normalized first; anything that is not `DE` + 9 digits is `false`.
pub fn has_valid_german_check_digit(raw: &str) -> bool {
    let clean = normalize_vat_id(raw);
    let Some(number) = clean.strip_prefix("DE") else {
        return false;
    };
    match german_check_digit(number) {
        Ok(expected) => number.as_bytes()[8] - b'0' == expected,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_value() {
        assert_eq!(german_check_digit("123456788").unwrap(), 8);
    }

    #[test]
    fn ninth_digit_is_ignored() {
        assert_eq!(german_check_digit("123456780").unwrap(), 8);
        assert_eq!(german_check_digit("123456789").unwrap(), 8);
    }

    #[test]
    fn ten_maps_to_zero() {
        // product ends at 1 -> 11 - 1 = 10 -> 0
        assert_eq!(german_check_digit("000000020").unwrap(), 0);
    }

    #[test]
    fn result_is_always_a_digit() {
        for n in (0..100_000_000u32).step_by(9_999_991) {
            let input = format!("{n:08}0");
            assert!(german_check_digit(&input).unwrap() <= 9);
        }
    }

    #[test]
    fn wrong_length_rejected() {
        assert!(matches!(
            german_check_digit("12345678"),
            Err(EvatrError::InvalidLength { .. })
        ));
        assert!(german_check_digit("1234567890").is_err());
        assert!(german_check_digit("").is_err());
    }

    #[test]
    fn non_digits_rejected() {
        assert!(matches!(
            german_check_digit("12345678A"),
            Err(EvatrError::InvalidLength { .. })
        ));
        assert!(german_check_digit("1234 5678").is_err());
    }

    #[test]
    fn full_vat_id_check() {
        assert!(has_valid_german_check_digit("DE123456788"));
        assert!(has_valid_german_check_digit("de 123 456 788"));
        assert!(!has_valid_german_check_digit("DE123456789"));
        assert!(!has_valid_german_check_digit("ATU12345678"));
        assert!(!has_valid_german_check_digit("DE12345678"));
    }
}
