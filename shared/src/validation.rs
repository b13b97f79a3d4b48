//! Validation utilities for the Gestionale platform
//!
//! Includes the Italian tax-identifier checks required by the registry
//! module: VAT number (partita IVA), fiscal code and IBAN.

use thiserror::Error;

/// Failure modes of the tax-identifier validators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TaxIdError {
    #[error("invalid format")]
    InvalidFormat,
    #[error("checksum mismatch")]
    ChecksumMismatch,
}

/// Normalize a tax identifier: strip whitespace, uppercase.
pub fn normalize_tax_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Check digit of an Italian VAT body (first 10 digits).
///
/// Digits at even 0-based positions count as-is; digits at odd positions are
/// doubled and folded (tens plus units). The check digit is
/// `(10 - (sum mod 10)) mod 10`.
pub fn vat_check_digit(digits: &[u32]) -> u32 {
    let mut sum = 0;
    for (i, &d) in digits.iter().take(10).enumerate() {
        if i % 2 == 0 {
            sum += d;
        } else {
            let doubled = d * 2;
            sum += doubled / 10 + doubled % 10;
        }
    }
    (10 - (sum % 10)) % 10
}

/// Validate an Italian VAT number: `IT` followed by exactly 11 digits, the
/// last of which is the checksum. Returns the normalized value.
pub fn validate_vat_number(raw: &str) -> Result<String, TaxIdError> {
    let vat = normalize_tax_id(raw);
    let body = vat.strip_prefix("IT").ok_or(TaxIdError::InvalidFormat)?;
    if body.len() != 11 || !body.chars().all(|c| c.is_ascii_digit()) {
        return Err(TaxIdError::InvalidFormat);
    }

    let digits: Vec<u32> = body.chars().filter_map(|c| c.to_digit(10)).collect();
    if vat_check_digit(&digits) != digits[10] {
        return Err(TaxIdError::ChecksumMismatch);
    }

    Ok(vat)
}

/// Validate an Italian fiscal code: either the 16-character personal form
/// (`AAAAAA00A00A000A`) or the 11-digit company form. Returns the normalized
/// value.
pub fn validate_fiscal_code(raw: &str) -> Result<String, TaxIdError> {
    let cf = normalize_tax_id(raw);
    if is_personal_fiscal_code(&cf) || is_company_fiscal_code(&cf) {
        Ok(cf)
    } else {
        Err(TaxIdError::InvalidFormat)
    }
}

fn is_personal_fiscal_code(cf: &str) -> bool {
    let bytes = cf.as_bytes();
    if bytes.len() != 16 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, &c)| match i {
        // surname + name (6), month letter, birthplace letter, check letter
        0..=5 | 8 | 11 | 15 => c.is_ascii_uppercase(),
        // birth year, birth day, birthplace code
        6 | 7 | 9 | 10 | 12..=14 => c.is_ascii_digit(),
        _ => false,
    })
}

fn is_company_fiscal_code(cf: &str) -> bool {
    cf.len() == 11 && cf.bytes().all(|c| c.is_ascii_digit())
}

/// Validate an Italian IBAN (simplified): `IT`, 2 check digits, CIN letter,
/// 5-digit ABI, 5-digit CAB, 12-character alphanumeric account, 27 characters
/// in total. Returns the normalized value.
pub fn validate_iban(raw: &str) -> Result<String, TaxIdError> {
    let iban = normalize_tax_id(raw);
    let body = iban.strip_prefix("IT").ok_or(TaxIdError::InvalidFormat)?;
    let bytes = body.as_bytes();
    if bytes.len() != 25 {
        return Err(TaxIdError::InvalidFormat);
    }
    let well_formed = bytes.iter().enumerate().all(|(i, &c)| match i {
        0 | 1 => c.is_ascii_digit(),      // check digits
        2 => c.is_ascii_uppercase(),      // CIN
        3..=12 => c.is_ascii_digit(),     // ABI + CAB
        13..=24 => c.is_ascii_uppercase() || c.is_ascii_digit(),
        _ => false,
    });
    if !well_formed {
        return Err(TaxIdError::InvalidFormat);
    }
    Ok(iban)
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate an EAN-13 product code (13 digits)
pub fn validate_ean13(ean: &str) -> Result<(), &'static str> {
    if ean.len() == 13 && ean.bytes().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err("EAN must be 13 digits")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // VAT Number Tests
    // ========================================================================

    #[test]
    fn test_validate_vat_number_valid() {
        // body 1234567890 -> even positions 1+3+5+7+9 = 25,
        // odd positions doubled-and-folded 4+8+3+7+0 = 22, check (10-47%10)%10 = 3
        assert_eq!(
            validate_vat_number("IT12345678903"),
            Ok("IT12345678903".to_string())
        );
        assert!(validate_vat_number("IT00000000000").is_ok());
    }

    #[test]
    fn test_validate_vat_number_normalizes() {
        assert_eq!(
            validate_vat_number("it 1234 5678 903"),
            Ok("IT12345678903".to_string())
        );
    }

    #[test]
    fn test_validate_vat_number_checksum_mismatch() {
        assert_eq!(
            validate_vat_number("IT12345678901"),
            Err(TaxIdError::ChecksumMismatch)
        );
    }

    #[test]
    fn test_validate_vat_number_invalid_format() {
        // Missing prefix
        assert_eq!(
            validate_vat_number("12345678903"),
            Err(TaxIdError::InvalidFormat)
        );
        // Wrong length
        assert_eq!(
            validate_vat_number("IT1234567890"),
            Err(TaxIdError::InvalidFormat)
        );
        // Non-digit body
        assert_eq!(
            validate_vat_number("IT1234567890A"),
            Err(TaxIdError::InvalidFormat)
        );
    }

    #[test]
    fn test_vat_check_digit_round_trip() {
        let digits = [1, 2, 3, 4, 5, 6, 7, 8, 9, 0];
        let check = vat_check_digit(&digits);
        let vat: String = format!(
            "IT{}{}",
            digits.iter().map(|d| d.to_string()).collect::<String>(),
            check
        );
        assert!(validate_vat_number(&vat).is_ok());
    }

    // ========================================================================
    // Fiscal Code Tests
    // ========================================================================

    #[test]
    fn test_validate_fiscal_code_personal() {
        assert!(validate_fiscal_code("RSSMRA85M01H501Z").is_ok());
        assert_eq!(
            validate_fiscal_code("rss mra 85M01 H501Z"),
            Ok("RSSMRA85M01H501Z".to_string())
        );
    }

    #[test]
    fn test_validate_fiscal_code_company() {
        assert!(validate_fiscal_code("12345678901").is_ok());
    }

    #[test]
    fn test_validate_fiscal_code_invalid() {
        // Wrong length
        assert!(validate_fiscal_code("RSSMRA85M01H501").is_err());
        // Digit where a letter is expected
        assert!(validate_fiscal_code("RSSMRA85M01H5012").is_err());
        // Company form with a letter
        assert!(validate_fiscal_code("1234567890A").is_err());
    }

    // ========================================================================
    // IBAN Tests
    // ========================================================================

    #[test]
    fn test_validate_iban_valid() {
        assert!(validate_iban("IT60X0542811101000000123456").is_ok());
        assert_eq!(
            validate_iban("it60 x054 2811 1010 0000 0123 456"),
            Ok("IT60X0542811101000000123456".to_string())
        );
    }

    #[test]
    fn test_validate_iban_invalid() {
        // Wrong country prefix
        assert!(validate_iban("DE60X0542811101000000123456").is_err());
        // Wrong length
        assert!(validate_iban("IT60X054281110100000012345").is_err());
        // Digit where the CIN letter is expected
        assert!(validate_iban("IT6090542811101000000123456").is_err());
    }

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_email() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@domain").is_err());
    }

    #[test]
    fn test_validate_ean13() {
        assert!(validate_ean13("8001234567890").is_ok());
        assert!(validate_ean13("800123456789").is_err());
        assert!(validate_ean13("80012345678AB").is_err());
    }
}
