//! Tax identifier validation tests
//!
//! Covers the VAT checksum law, fiscal code patterns and the Italian IBAN
//! format check.

use proptest::prelude::*;
use shared::{
    validate_fiscal_code, validate_iban, validate_vat_number, vat_check_digit, TaxIdError,
};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// The reference fixture: body 1234567890 has check digit 3, so the
    /// commonly quoted "IT12345678901" must be rejected on its checksum.
    #[test]
    fn test_reference_vat_fixture() {
        assert_eq!(
            validate_vat_number("IT12345678901"),
            Err(TaxIdError::ChecksumMismatch)
        );
        assert!(validate_vat_number("IT12345678903").is_ok());
    }

    #[test]
    fn test_vat_known_good_values() {
        // All-zero body has checksum 0
        assert!(validate_vat_number("IT00000000000").is_ok());
        // Normalization accepts spacing and lowercase
        assert!(validate_vat_number("  it 0000 0000 000 ").is_ok());
    }

    #[test]
    fn test_vat_format_rejections() {
        assert_eq!(
            validate_vat_number("FR12345678903"),
            Err(TaxIdError::InvalidFormat)
        );
        assert_eq!(
            validate_vat_number("IT123456789"),
            Err(TaxIdError::InvalidFormat)
        );
        assert_eq!(
            validate_vat_number("IT123456789012"),
            Err(TaxIdError::InvalidFormat)
        );
        assert_eq!(
            validate_vat_number("ITABCDEFGHIJK"),
            Err(TaxIdError::InvalidFormat)
        );
        assert_eq!(validate_vat_number(""), Err(TaxIdError::InvalidFormat));
    }

    /// Flipping the ninth digit of a valid number changes the sum by a
    /// non-multiple of 10, so the checksum must fail.
    #[test]
    fn test_single_digit_flip_detected() {
        assert!(validate_vat_number("IT12345678903").is_ok());
        assert_eq!(
            validate_vat_number("IT12345678913"),
            Err(TaxIdError::ChecksumMismatch)
        );
    }

    #[test]
    fn test_fiscal_code_personal_pattern() {
        assert!(validate_fiscal_code("RSSMRA85M01H501Z").is_ok());
        assert!(validate_fiscal_code("BNCLRA90A41F205X").is_ok());
        // Letter where a digit belongs
        assert!(validate_fiscal_code("RSSMRA8AM01H501Z").is_err());
        // Truncated
        assert!(validate_fiscal_code("RSSMRA85M01H50").is_err());
    }

    #[test]
    fn test_fiscal_code_company_pattern() {
        assert!(validate_fiscal_code("12345678901").is_ok());
        assert!(validate_fiscal_code("1234567890").is_err());
        assert!(validate_fiscal_code("123456789012").is_err());
    }

    #[test]
    fn test_iban_structure() {
        assert!(validate_iban("IT60X0542811101000000123456").is_ok());
        // Wrong country
        assert_eq!(
            validate_iban("FR60X0542811101000000123456"),
            Err(TaxIdError::InvalidFormat)
        );
        // 26 characters
        assert_eq!(
            validate_iban("IT60X054281110100000012345"),
            Err(TaxIdError::InvalidFormat)
        );
        // Letter inside the ABI/CAB digits
        assert_eq!(
            validate_iban("IT60X05428A1101000000123456"),
            Err(TaxIdError::InvalidFormat)
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn body_strategy() -> impl Strategy<Value = Vec<u32>> {
        prop::collection::vec(0u32..10, 10)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Appending the computed check digit always yields an accepted VAT
        /// number (checksum round-trip law).
        #[test]
        fn prop_generated_vat_always_accepted(body in body_strategy()) {
            let check = vat_check_digit(&body);
            let vat = format!(
                "IT{}{}",
                body.iter().map(|d| d.to_string()).collect::<String>(),
                check
            );
            prop_assert!(validate_vat_number(&vat).is_ok());
        }

        /// Any check digit other than the computed one is rejected with a
        /// checksum mismatch, never a format error.
        #[test]
        fn prop_wrong_check_digit_rejected(body in body_strategy(), offset in 1u32..10) {
            let check = vat_check_digit(&body);
            let wrong = (check + offset) % 10;
            let vat = format!(
                "IT{}{}",
                body.iter().map(|d| d.to_string()).collect::<String>(),
                wrong
            );
            prop_assert_eq!(validate_vat_number(&vat), Err(TaxIdError::ChecksumMismatch));
        }

        /// The check digit is always a single digit.
        #[test]
        fn prop_check_digit_in_range(body in body_strategy()) {
            prop_assert!(vat_check_digit(&body) < 10);
        }

        /// Normalization is idempotent: a validated value revalidates to
        /// itself.
        #[test]
        fn prop_normalization_idempotent(body in body_strategy()) {
            let check = vat_check_digit(&body);
            let vat = format!(
                "IT{}{}",
                body.iter().map(|d| d.to_string()).collect::<String>(),
                check
            );
            let normalized = validate_vat_number(&vat).unwrap();
            prop_assert_eq!(validate_vat_number(&normalized), Ok(normalized.clone()));
        }
    }
}
