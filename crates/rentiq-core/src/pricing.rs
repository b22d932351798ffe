//! # Pricing Engine
//!
//! Pure totals computation for quotes and rentals. Identical inputs always
//! yield identical outputs; all arithmetic is exact integer cents.
//!
//! ## Computation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  days           = (end − start) + 1     (both handover days billed)    │
//! │  subtotal       = Σ unit_price × days × quantity                        │
//! │  discount_value = Percent ? subtotal × bps / 10000 : discount cents     │
//! │                   (clamped to subtotal, flagged when clamped)           │
//! │  final_value    = subtotal − discount_value + shipping                  │
//! │  balance        = final_value − down_payment                            │
//! │                                                                         │
//! │  The security deposit never enters final_value: it is held and         │
//! │  refunded separately.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine recomputes `total_value` from these inputs at every
//! creation/conversion; a caller-supplied total is never trusted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{BookingLineItem, DiscountType};

// =============================================================================
// Inputs
// =============================================================================

/// The slice of a line item the pricing engine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingLine {
    pub quantity: i64,
    /// Frozen daily price in cents.
    pub unit_price_cents: i64,
}

impl From<&BookingLineItem> for PricingLine {
    fn from(line: &BookingLineItem) -> Self {
        PricingLine {
            quantity: line.quantity,
            unit_price_cents: line.unit_price_snapshot_cents,
        }
    }
}

// =============================================================================
// Result
// =============================================================================

/// The computed totals for one booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Billed days, inclusive of delivery and return day.
    pub days: i64,
    pub subtotal_cents: i64,
    pub discount_value_cents: i64,
    /// `subtotal − discount + shipping`.
    pub final_value_cents: i64,
    /// `final_value − down_payment`. May be negative when the down payment
    /// exceeds the total; the ledger reconciles that at return time.
    pub balance_cents: i64,
    /// True when the requested discount exceeded the subtotal and was
    /// clamped down to it.
    pub discount_clamped: bool,
}

impl PriceBreakdown {
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    pub fn final_value(&self) -> Money {
        Money::from_cents(self.final_value_cents)
    }

    pub fn balance(&self) -> Money {
        Money::from_cents(self.balance_cents)
    }
}

// =============================================================================
// Computation
// =============================================================================

/// Number of billed days in an inclusive window.
///
/// The delivery day and the return day are both billed: a Friday→Sunday
/// rental is 3 days. Callers validate `start <= end` before pricing.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use rentiq_core::pricing::rental_days;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
/// assert_eq!(rental_days(start, end), 3);
/// ```
#[inline]
pub fn rental_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Computes the totals for a booking from its line items and pricing inputs.
///
/// Pure function; the caller has already validated the date window, the
/// quantities and the discount range.
///
/// ## Arguments
/// * `discount` - cents when `discount_type` is `Value`, basis points
///   (1000 = 10%) when `Percent`
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use rentiq_core::pricing::{compute_totals, PricingLine};
/// use rentiq_core::types::DiscountType;
///
/// let lines = [PricingLine { quantity: 2, unit_price_cents: 10_000 }];
/// let start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
///
/// let totals = compute_totals(&lines, start, end, 1000, DiscountType::Percent, 5_000, 0);
/// assert_eq!(totals.days, 3);
/// assert_eq!(totals.subtotal_cents, 60_000);
/// assert_eq!(totals.discount_value_cents, 6_000);
/// assert_eq!(totals.final_value_cents, 59_000);
/// ```
pub fn compute_totals(
    lines: &[PricingLine],
    start: NaiveDate,
    end: NaiveDate,
    discount: i64,
    discount_type: DiscountType,
    shipping_cost_cents: i64,
    down_payment_cents: i64,
) -> PriceBreakdown {
    let days = rental_days(start, end);

    let subtotal = lines.iter().fold(Money::zero(), |acc, line| {
        acc + Money::from_cents(line.unit_price_cents)
            .multiply_quantity(days)
            .multiply_quantity(line.quantity)
    });

    let requested_discount = match discount_type {
        DiscountType::Percent => {
            // Validation bounds percent discounts to [0, 10000] bps; the
            // clamp here keeps the arithmetic total even on raw inputs.
            subtotal.percent_bps(discount.clamp(0, 10_000) as u32)
        }
        DiscountType::Value => Money::from_cents(discount.max(0)),
    };

    let discount_clamped = requested_discount > subtotal;
    let discount_value = if discount_clamped {
        subtotal
    } else {
        requested_discount
    };

    let final_value = subtotal - discount_value + Money::from_cents(shipping_cost_cents);
    let balance = final_value - Money::from_cents(down_payment_cents);

    PriceBreakdown {
        days,
        subtotal_cents: subtotal.cents(),
        discount_value_cents: discount_value.cents(),
        final_value_cents: final_value.cents(),
        balance_cents: balance.cents(),
        discount_clamped,
    }
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
    fn test_rental_days_inclusive() {
        assert_eq!(rental_days(d("2024-01-10"), d("2024-01-12")), 3);
        assert_eq!(rental_days(d("2024-01-10"), d("2024-01-10")), 1);
    }

    /// daily 100.00, 3 days, qty 2 → subtotal 600.00; 10% discount → 60.00;
    /// shipping 50.00 → final 590.00.
    #[test]
    fn test_percent_discount_breakdown() {
        let lines = [PricingLine {
            quantity: 2,
            unit_price_cents: 10_000,
        }];
        let totals = compute_totals(
            &lines,
            d("2024-01-10"),
            d("2024-01-12"),
            1000,
            DiscountType::Percent,
            5_000,
            0,
        );

        assert_eq!(totals.days, 3);
        assert_eq!(totals.subtotal_cents, 60_000);
        assert_eq!(totals.discount_value_cents, 6_000);
        assert_eq!(totals.final_value_cents, 59_000);
        assert_eq!(totals.balance_cents, 59_000);
        assert!(!totals.discount_clamped);
    }

    #[test]
    fn test_value_discount_and_balance() {
        let lines = [PricingLine {
            quantity: 1,
            unit_price_cents: 2_500,
        }];
        let totals = compute_totals(
            &lines,
            d("2024-03-01"),
            d("2024-03-04"),
            1_000,
            DiscountType::Value,
            0,
            5_000,
        );

        // 4 days × 25.00 = 100.00, minus 10.00 = 90.00, down payment 50.00
        assert_eq!(totals.days, 4);
        assert_eq!(totals.subtotal_cents, 10_000);
        assert_eq!(totals.discount_value_cents, 1_000);
        assert_eq!(totals.final_value_cents, 9_000);
        assert_eq!(totals.balance_cents, 4_000);
    }

    #[test]
    fn test_discount_clamped_to_subtotal() {
        let lines = [PricingLine {
            quantity: 1,
            unit_price_cents: 1_000,
        }];
        let totals = compute_totals(
            &lines,
            d("2024-01-01"),
            d("2024-01-01"),
            99_999,
            DiscountType::Value,
            500,
            0,
        );

        assert!(totals.discount_clamped);
        assert_eq!(totals.discount_value_cents, 1_000);
        // Shipping survives the clamp; the total never goes negative from
        // discounting alone.
        assert_eq!(totals.final_value_cents, 500);
    }

    #[test]
    fn test_multiple_lines_sum() {
        let lines = [
            PricingLine {
                quantity: 4,
                unit_price_cents: 500,
            },
            PricingLine {
                quantity: 1,
                unit_price_cents: 7_500,
            },
        ];
        let totals = compute_totals(
            &lines,
            d("2024-06-01"),
            d("2024-06-02"),
            0,
            DiscountType::Value,
            0,
            0,
        );

        // 2 days: chairs 4×5.00×2 = 40.00, speaker 1×75.00×2 = 150.00
        assert_eq!(totals.subtotal_cents, 19_000);
        assert_eq!(totals.final_value_cents, 19_000);
    }

    #[test]
    fn test_empty_lines_price_to_zero() {
        let totals = compute_totals(
            &[],
            d("2024-01-10"),
            d("2024-01-12"),
            0,
            DiscountType::Value,
            0,
            0,
        );
        assert_eq!(totals.subtotal_cents, 0);
        assert_eq!(totals.final_value_cents, 0);
    }

    #[test]
    fn test_determinism() {
        let lines = [PricingLine {
            quantity: 3,
            unit_price_cents: 1_234,
        }];
        let a = compute_totals(
            &lines,
            d("2024-01-05"),
            d("2024-01-09"),
            750,
            DiscountType::Percent,
            1_299,
            2_000,
        );
        let b = compute_totals(
            &lines,
            d("2024-01-05"),
            d("2024-01-09"),
            750,
            DiscountType::Percent,
            1_299,
            2_000,
        );
        assert_eq!(a, b);
    }
}
