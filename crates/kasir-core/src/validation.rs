//! # Validation Module
//!
//! Input validation for Kasir POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (apps/api)                                      │
//! │  ├── Type validation (JSON / query deserialization)                    │
//! │  └── Calls into THIS MODULE before touching the database               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── name non-empty, price > 0, stock ≥ 0                              │
//! │  └── cart non-empty, bounded, quantities > 0                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (price > 0), CHECK (stock >= 0)                             │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here runs before a unit of work is opened, so a rejected
//! request never holds a lock.
//!
//! ## Usage
//! ```rust
//! use kasir_core::validation::{validate_product_name, validate_quantity};
//!
//! validate_product_name("Indomie Goreng").unwrap();
//! validate_quantity(5).unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{CheckoutItem, DateRange, NewProduct};
use crate::{MAX_CHECKOUT_ITEMS, MAX_PRODUCT_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Date format accepted by the report endpoints.
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_PRODUCT_NAME_LEN`] characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero-priced products are rejected.
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a stock level. Zero is allowed (sold out).
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

/// Validates all fields of a product create/update body.
///
/// Returns a copy with the name trimmed, ready to persist.
///
/// ## Example
/// ```rust
/// use kasir_core::validation::validate_new_product;
/// use kasir_core::NewProduct;
///
/// let input = NewProduct { name: "  Teh Botol ".into(), price: 5000, stock: 12 };
/// let clean = validate_new_product(&input).unwrap();
/// assert_eq!(clean.name, "Teh Botol");
///
/// let bad = NewProduct { name: "Teh Botol".into(), price: 0, stock: 12 };
/// assert!(validate_new_product(&bad).is_err());
/// ```
pub fn validate_new_product(input: &NewProduct) -> ValidationResult<NewProduct> {
    validate_product_name(&input.name)?;
    validate_price(input.price)?;
    validate_stock(input.stock)?;

    Ok(NewProduct {
        name: input.name.trim().to_string(),
        price: input.price,
        stock: input.stock,
    })
}

// =============================================================================
// Checkout Validators
// =============================================================================

/// Validates a checkout line quantity.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a whole checkout request body.
///
/// ## Rules
/// - At least one line
/// - At most [`MAX_CHECKOUT_ITEMS`] lines
/// - Every quantity positive
///
/// Duplicate product ids are allowed; each line is processed on its own.
pub fn validate_checkout_items(items: &[CheckoutItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if items.len() > MAX_CHECKOUT_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_CHECKOUT_ITEMS as i64,
        });
    }

    for item in items {
        validate_quantity(item.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Report Validators
// =============================================================================

/// Parses a `YYYY-MM-DD` report date.
pub fn parse_report_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveDate::parse_from_str(value, REPORT_DATE_FORMAT).map_err(|e| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("expected YYYY-MM-DD ({})", e),
        }
    })
}

/// Parses both bounds of a report window and checks their order.
pub fn parse_report_range(start: &str, end: &str) -> ValidationResult<DateRange> {
    let start = parse_report_date("start_date", start)?;
    let end = parse_report_date("end_date", end)?;
    DateRange::new(start, end)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Indomie").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
        assert!(validate_product_name(&"A".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price(1).is_ok());
        assert!(validate_price(0).is_err());
        assert!(validate_price(-5).is_err());

        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(1_000_000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_checkout_items() {
        assert!(matches!(
            validate_checkout_items(&[]),
            Err(ValidationError::Required { .. })
        ));

        let line = CheckoutItem {
            product_id: 1,
            quantity: 1,
        };
        assert!(validate_checkout_items(&[line, line]).is_ok());

        let too_many = vec![line; MAX_CHECKOUT_ITEMS + 1];
        assert!(matches!(
            validate_checkout_items(&too_many),
            Err(ValidationError::OutOfRange { .. })
        ));

        let zero = CheckoutItem {
            product_id: 1,
            quantity: 0,
        };
        assert!(validate_checkout_items(&[line, zero]).is_err());
    }

    #[test]
    fn test_parse_report_range() {
        let range = parse_report_range("2026-01-01", "2026-01-31").unwrap();
        assert_eq!(range.start().to_string(), "2026-01-01");
        assert_eq!(range.end().to_string(), "2026-01-31");

        assert!(parse_report_range("2026-02-01", "2026-01-01").is_err());
        assert!(parse_report_range("01/02/2026", "2026-01-01").is_err());
        assert!(matches!(
            parse_report_date("start_date", ""),
            Err(ValidationError::Required { .. })
        ));
    }
}
