//! # Validation Module
//!
//! Storage-boundary validation for Reshelf.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      What Gets Validated Where                          │
//! │                                                                         │
//! │  Numbers and dates (prices, caps, expiry)                              │
//! │  └── NEVER rejected. Normalized in `records` (NaN → 0, bad date →      │
//! │      no constraint) so a garbled row can't break a checkout.           │
//! │                                                                         │
//! │  Identifiers and tags (THIS MODULE)                                    │
//! │  ├── voucher id / product id must be present                           │
//! │  ├── voucher codes must be printable codes                             │
//! │  └── checkout quantities must be sane                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a voucher code.
pub const MAX_VOUCHER_CODE_LEN: usize = 32;

// =============================================================================
// String Validators
// =============================================================================

/// Requires a non-blank value and returns it trimmed.
///
/// ```rust
/// use reshelf_core::validation::validate_required;
///
/// assert_eq!(validate_required("id", "  v-1 ").unwrap(), "v-1");
/// assert!(validate_required("id", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

/// Validates and normalizes a voucher code.
///
/// ## Rules
/// - Must not be empty
/// - At most 32 characters
/// - ASCII letters, digits, hyphens and underscores only
/// - Stored uppercase
///
/// ```rust
/// use reshelf_core::validation::validate_voucher_code;
///
/// assert_eq!(validate_voucher_code("freeship-gold").unwrap(), "FREESHIP-GOLD");
/// assert!(validate_voucher_code("FREE SHIP").is_err());
/// ```
pub fn validate_voucher_code(code: &str) -> ValidationResult<String> {
    let code = validate_required("voucher code", code)?;

    if code.len() > MAX_VOUCHER_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "voucher code".to_string(),
            max: MAX_VOUCHER_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "voucher code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(code.to_ascii_uppercase())
}

/// Parses an enum tag case-insensitively against its allowed spellings.
///
/// ```rust
/// use reshelf_core::validation::validate_one_of;
///
/// assert_eq!(validate_one_of("status", "used", &["AVAILABLE", "USED"]).unwrap(), 1);
/// assert!(validate_one_of("status", "lost", &["AVAILABLE", "USED"]).is_err());
/// ```
pub fn validate_one_of(field: &str, value: &str, allowed: &[&str]) -> ValidationResult<usize> {
    let value = value.trim();
    allowed
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(value))
        .ok_or_else(|| ValidationError::NotAllowed {
            field: field.to_string(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        })
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a checkout line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (99)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_voucher_code() {
        assert_eq!(validate_voucher_code("GOLD_SHIP").unwrap(), "GOLD_SHIP");
        assert_eq!(validate_voucher_code(" ship-100 ").unwrap(), "SHIP-100");

        assert!(validate_voucher_code("").is_err());
        assert!(validate_voucher_code("has space").is_err());
        assert!(validate_voucher_code("ÑAME").is_err());
        assert!(matches!(
            validate_voucher_code(&"A".repeat(40)),
            Err(ValidationError::TooLong { max: 32, .. })
        ));
    }

    #[test]
    fn test_validate_one_of_trims_and_ignores_case() {
        let allowed = ["AVAILABLE", "USED", "EXPIRED"];
        assert_eq!(validate_one_of("status", " Expired ", &allowed).unwrap(), 2);
        assert!(matches!(
            validate_one_of("status", "", &allowed),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(99).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(100).is_err());
    }
}
