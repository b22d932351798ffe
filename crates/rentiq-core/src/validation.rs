//! # Validation Module
//!
//! Input validation for booking data. Everything here runs before any store
//! access, so a malformed request never costs a database round trip.
//!
//! ## Usage
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use rentiq_core::validation::{validate_date_range, validate_quantity};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
//!
//! validate_date_range(start, end).unwrap();
//! validate_quantity(5).unwrap();
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::DiscountType;
use crate::{MAX_BOOKING_LINE_ITEMS, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Date Validators
// =============================================================================

/// Validates a booking window.
///
/// ## Rules
/// - `start <= end` (both days are billed; a single-day rental is legal)
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> ValidationResult<()> {
    if start > end {
        return Err(ValidationError::DateRangeInverted { start, end });
    }

    Ok(())
}

/// Validates the optional informational event window against the rental
/// window.
///
/// ## Rules
/// - Both ends present or both absent
/// - `event_start <= event_end`
/// - The event window lies within `[start, end]`
pub fn validate_event_window(
    start: NaiveDate,
    end: NaiveDate,
    event_start: Option<NaiveDate>,
    event_end: Option<NaiveDate>,
) -> ValidationResult<()> {
    let (event_start, event_end) = match (event_start, event_end) {
        (None, None) => return Ok(()),
        (Some(s), Some(e)) => (s, e),
        _ => {
            return Err(ValidationError::Required {
                field: "event window (both ends)".to_string(),
            })
        }
    };

    if event_start > event_end || event_start < start || event_end > end {
        return Err(ValidationError::EventOutsideWindow {
            event_start,
            event_end,
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
/// - Must be positive (>= 1)
/// - Must not exceed MAX_LINE_QUANTITY
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

/// Validates a monetary amount in cents that must not be negative
/// (shipping cost, deposit, down payment).
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a discount against its type.
///
/// ## Rules
/// - `Value`: non-negative cents
/// - `Percent`: 0..=10000 basis points (0% to 100%)
pub fn validate_discount(discount: i64, discount_type: DiscountType) -> ValidationResult<()> {
    match discount_type {
        DiscountType::Value => validate_price_cents("discount", discount),
        DiscountType::Percent => {
            if !(0..=10_000).contains(&discount) {
                return Err(ValidationError::OutOfRange {
                    field: "discount".to_string(),
                    min: 0,
                    max: 10_000,
                });
            }
            Ok(())
        }
    }
}

/// Validates the installment count (1 = single payment).
pub fn validate_installments(installments: i64) -> ValidationResult<()> {
    if !(1..=60).contains(&installments) {
        return Err(ValidationError::OutOfRange {
            field: "installments".to_string(),
            min: 1,
            max: 60,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of line items on a booking.
pub fn validate_line_item_count(count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::Required {
            field: "line_items".to_string(),
        });
    }

    if count > MAX_BOOKING_LINE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "line_items".to_string(),
            min: 1,
            max: MAX_BOOKING_LINE_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a UUID string.
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

/// Validates a customer reference. Customers live in an external system, so
/// the id is only checked for shape, not existence.
pub fn validate_customer_id(customer_id: &str) -> ValidationResult<()> {
    let customer_id = customer_id.trim();

    if customer_id.is_empty() {
        return Err(ValidationError::Required {
            field: "customer_id".to_string(),
        });
    }

    if customer_id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "customer_id".to_string(),
            max: 64,
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

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_validate_date_range() {
        assert!(validate_date_range(d("2024-01-10"), d("2024-01-12")).is_ok());
        assert!(validate_date_range(d("2024-01-10"), d("2024-01-10")).is_ok());
        assert!(validate_date_range(d("2024-01-12"), d("2024-01-10")).is_err());
    }

    #[test]
    fn test_validate_event_window() {
        let (start, end) = (d("2024-01-10"), d("2024-01-20"));

        assert!(validate_event_window(start, end, None, None).is_ok());
        assert!(
            validate_event_window(start, end, Some(d("2024-01-12")), Some(d("2024-01-14"))).is_ok()
        );
        // Outside the rental window
        assert!(
            validate_event_window(start, end, Some(d("2024-01-08")), Some(d("2024-01-14")))
                .is_err()
        );
        assert!(
            validate_event_window(start, end, Some(d("2024-01-12")), Some(d("2024-01-25")))
                .is_err()
        );
        // Half-open input
        assert!(validate_event_window(start, end, Some(d("2024-01-12")), None).is_err());
        // Inverted event window
        assert!(
            validate_event_window(start, end, Some(d("2024-01-14")), Some(d("2024-01-12")))
                .is_err()
        );
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount(5_000, DiscountType::Value).is_ok());
        assert!(validate_discount(-1, DiscountType::Value).is_err());
        assert!(validate_discount(1000, DiscountType::Percent).is_ok());
        assert!(validate_discount(10_000, DiscountType::Percent).is_ok());
        assert!(validate_discount(10_001, DiscountType::Percent).is_err());
        assert!(validate_discount(-1, DiscountType::Percent).is_err());
    }

    #[test]
    fn test_validate_installments() {
        assert!(validate_installments(1).is_ok());
        assert!(validate_installments(12).is_ok());
        assert!(validate_installments(0).is_err());
        assert!(validate_installments(61).is_err());
    }

    #[test]
    fn test_validate_line_item_count() {
        assert!(validate_line_item_count(1).is_ok());
        assert!(validate_line_item_count(0).is_err());
        assert!(validate_line_item_count(101).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("id", "").is_err());
        assert!(validate_uuid("id", "not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_customer_id() {
        assert!(validate_customer_id("cust-42").is_ok());
        assert!(validate_customer_id("  ").is_err());
        assert!(validate_customer_id(&"x".repeat(100)).is_err());
    }
}
