//! # Validation Module
//!
//! Field-level validation rules shared by every input object.
//!
//! ## Validation Strategy
//! ```text
//! Layer 1: serde deserialization  - type/shape errors, amount precision
//! Layer 2: THIS MODULE            - business rule validation
//! Layer 3: database               - NOT NULL / UNIQUE / FK constraints
//! ```
//!
//! Defense in depth: each layer catches a different class of bad input.

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::{MAX_ITEM_QUANTITY, MAX_LINE_ITEMS};

// =============================================================================
// String Validators
// =============================================================================

/// Validates a business code (`patient_code`, `bill_number`, `sale_number`).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only alphanumeric characters, hyphens, and underscores
pub fn validate_code(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > 50 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 50,
        });
    }

    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (patient, product, service, medicine).
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Minimal email shape check: something before and after a single '@'.
/// Anything stricter belongs to the mail system, not this form backend.
pub fn validate_email(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a valid email address".to_string(),
        }),
    }
}

/// Passwords must be at least 6 characters.
pub fn validate_password(value: &str) -> ValidationResult<()> {
    if value.len() < 6 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (guards against fat-fingered forms)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Catalog prices must be strictly positive.
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Amounts tendered or paid must be strictly positive.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Stock quantities must not be negative. Zero is fine (out of stock).
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock_quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of lines on a sale, bill, or prescription.
///
/// ## Rules
/// - At least one line (an empty transaction is meaningless)
/// - At most MAX_LINE_ITEMS
pub fn validate_line_count(field: &str, count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::EmptyCollection {
            field: field.to_string(),
        });
    }

    if count > MAX_LINE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_LINE_ITEMS as i64,
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
    fn test_validate_code() {
        assert!(validate_code("sale_number", "POS-20260806-0001").is_ok());
        assert!(validate_code("patient_code", "P_0042").is_ok());

        assert!(validate_code("sale_number", "").is_err());
        assert!(validate_code("sale_number", "   ").is_err());
        assert!(validate_code("sale_number", "has space").is_err());
        assert!(validate_code("sale_number", &"A".repeat(60)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Paracetamol 500mg").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "front.desk@klinika.example").is_ok());
        assert!(validate_email("email", "no-at-sign").is_err());
        assert!(validate_email("email", "@klinika.example").is_err());
        assert!(validate_email("email", "desk@nodot").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("unit_price", Money::from_cents(2500)).is_ok());
        assert!(validate_price("unit_price", Money::zero()).is_err());
        assert!(validate_price("unit_price", Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_line_count() {
        assert!(validate_line_count("items", 1).is_ok());
        assert!(validate_line_count("items", 100).is_ok());
        assert!(validate_line_count("items", 0).is_err());
        assert!(validate_line_count("items", 101).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
    }
}
