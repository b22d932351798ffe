//! # Money Module
//!
//! The `Money` type: monetary values in integer minor units (cents).
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A rental quote is repriced many times while it is negotiated —        │
//! │  discount, shipping and deposit arithmetic repeated on floats          │
//! │  drifts by a cent and the frozen total no longer matches the sum       │
//! │  of its parts.                                                          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    All arithmetic stays exact; any rounding (percent discounts)        │
//! │    happens once, explicitly, with a documented rule.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rentiq_core::money::Money;
//!
//! // Create from cents (the only way in)
//! let daily = Money::from_cents(10_000); // $100.00
//!
//! // Arithmetic operations
//! let three_days = daily * 3;                      // $300.00
//! let with_fee = three_days + Money::from_cents(5_000); // $350.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values are legal — a reported availability
///   deficit, an over-applied down payment, a refund all produce them
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **No float constructor**: values enter the system as cents or not at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use rentiq_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Computes a basis-point fraction of this amount, rounding half up.
    ///
    /// Used for percentage discounts: 1 basis point = 0.01%, so
    /// 1000 bps = 10%.
    ///
    /// ## Implementation
    /// Integer math in `i128` to rule out overflow on large amounts:
    /// `(amount * bps + 5000) / 10000`. The `+5000` rounds the half-cent
    /// case up rather than truncating.
    ///
    /// ## Example
    /// ```rust
    /// use rentiq_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(60_000); // $600.00
    /// let discount = subtotal.percent_bps(1000); // 10%
    /// assert_eq!(discount.cents(), 6_000); // $60.00
    /// ```
    pub fn percent_bps(&self, bps: u32) -> Money {
        let cents = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Multiplies by a quantity (line totals: unit price × days × qty).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns the larger of this value and zero.
    ///
    /// Display-layer helper: net availability and balances may legitimately
    /// be negative inside the engine, while most callers render a floor of
    /// zero.
    #[inline]
    pub const fn clamped_to_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display. UI formatting and localization happen at the
/// presentation boundary, not here.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let tripled: Money = a * 3i64;
        assert_eq!(tripled.cents(), 3000);
    }

    #[test]
    fn test_percent_bps() {
        // $600.00 at 10% = $60.00
        let subtotal = Money::from_cents(60_000);
        assert_eq!(subtotal.percent_bps(1000).cents(), 6_000);

        // Half-cent boundary rounds up: $0.10 at 25% = 2.5 cents → 3
        assert_eq!(Money::from_cents(10).percent_bps(2500).cents(), 3);
    }

    #[test]
    fn test_percent_bps_full_and_zero() {
        let amount = Money::from_cents(12345);
        assert_eq!(amount.percent_bps(10000), amount);
        assert_eq!(amount.percent_bps(0), Money::zero());
    }

    #[test]
    fn test_zero_and_sign_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }

    #[test]
    fn test_clamped_to_zero() {
        assert_eq!(Money::from_cents(-250).clamped_to_zero(), Money::zero());
        assert_eq!(
            Money::from_cents(250).clamped_to_zero(),
            Money::from_cents(250)
        );
    }

    #[test]
    fn test_multiply_quantity() {
        // daily $100.00 × 3 days × 2 units = $600.00
        let daily = Money::from_cents(10_000);
        assert_eq!(daily.multiply_quantity(3).multiply_quantity(2).cents(), 60_000);
    }
}
