//! # Domain Types
//!
//! Core entities of the booking engine.
//!
//! ## Entity Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Model                                    │
//! │                                                                         │
//! │  ┌─────────────────┐      ┌──────────────────┐      ┌───────────────┐  │
//! │  │      Item       │ 1  N │ BookingLineItem  │ N  1 │    Booking    │  │
//! │  │  ─────────────  │◄─────│  ──────────────  │─────►│  ───────────  │  │
//! │  │  total_quantity │      │  quantity        │      │  kind         │  │
//! │  │  maintenance    │      │  unit_price_     │      │  status       │  │
//! │  │  lost           │      │    snapshot      │      │  start..end   │  │
//! │  │  daily_price    │      └──────────────────┘      │  total_value  │  │
//! │  └─────────────────┘                                └───────┬───────┘  │
//! │                                                             │ 0..1     │
//! │                                              ┌──────────────▼───────┐  │
//! │                                              │ FinancialTransaction │  │
//! │                                              │ (down payment entry) │  │
//! │                                              └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A line item copies the item's daily price at creation/conversion time.
//! Catalogue price changes never retroactively alter an existing booking.
//!
//! ## Monetary fields
//! Every monetary column is an `i64` in cents with a `Money` accessor, so the
//! structs map 1:1 onto storage while arithmetic goes through [`Money`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::status::BookingStatus;

// =============================================================================
// Date-Window Overlap
// =============================================================================

/// Inclusive date-window overlap: `[a_start, a_end]` overlaps
/// `[b_start, b_end]` iff `a_start <= b_end && a_end >= b_start`.
///
/// Both bounds are billed days, so a same-day handover — one rental
/// returning the morning an other departs — counts as overlapping. The gear
/// cannot be in two places on that day.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use rentiq_core::types::windows_overlap;
///
/// let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
/// assert!(windows_overlap(d("2024-01-10"), d("2024-01-12"), d("2024-01-12"), d("2024-01-15")));
/// assert!(!windows_overlap(d("2024-01-10"), d("2024-01-12"), d("2024-01-13"), d("2024-01-15")));
/// ```
#[inline]
pub fn windows_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

// =============================================================================
// Enumerations
// =============================================================================

/// Whether a booking is a non-binding offer or a confirmed allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum BookingKind {
    /// Non-binding offer; converts into a rental.
    Quote,
    /// Confirmed allocation created by conversion.
    Rental,
}

/// How the `discount` field is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount` is an absolute amount in cents.
    Value,
    /// `discount` is a percentage in basis points (1000 = 10%).
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
}

/// How equipment moves at the start and end of the rental window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// Customer collects/returns at the warehouse.
    Pickup,
    /// We deliver/fetch at the booking address.
    Delivery,
}

// =============================================================================
// Item
// =============================================================================

/// A rentable catalogue item with finite owned stock.
///
/// Read-only to the booking engine; quantities are maintained by the
/// inventory collaborator. `maintenance_quantity` units are temporarily out
/// of service, `lost_quantity` permanently — neither can be allocated.
///
/// Invariant: `maintenance_quantity + lost_quantity <= total_quantity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on quotes and rental contracts.
    pub name: String,

    /// Units owned in total.
    pub total_quantity: i64,

    /// Units temporarily unusable (repair, cleaning).
    pub maintenance_quantity: i64,

    /// Units permanently unusable (lost, written off).
    pub lost_quantity: i64,

    /// Rental price per day, in cents.
    pub daily_price_cents: i64,

    /// Soft-delete flag.
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Daily price as Money.
    #[inline]
    pub fn daily_price(&self) -> Money {
        Money::from_cents(self.daily_price_cents)
    }

    /// Units that could ever be allocated: total minus maintenance and lost.
    #[inline]
    pub fn in_service_quantity(&self) -> i64 {
        self.total_quantity - self.maintenance_quantity - self.lost_quantity
    }

    /// Units out of service (maintenance + lost).
    #[inline]
    pub fn out_of_service_quantity(&self) -> i64 {
        self.maintenance_quantity + self.lost_quantity
    }
}

// =============================================================================
// Booking
// =============================================================================

/// A quote or rental: customer, inclusive date window, pricing and logistics.
///
/// ## Lifecycle
/// Created by a form submission as a `Quote` in `Draft`; advances through
/// the status machine ([`BookingStatus`]). Conversion never mutates a quote
/// into a rental — it creates a **new** `Rental` booking and marks the
/// source quote `Converted`, preserving the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: String,
    pub kind: BookingKind,
    pub status: BookingStatus,
    pub customer_id: String,

    /// First billed day (delivery/handover).
    pub start_date: NaiveDate,
    /// Last billed day (return), inclusive. `start_date <= end_date`.
    pub end_date: NaiveDate,

    /// Optional informational event window, within `[start_date, end_date]`.
    pub event_start: Option<NaiveDate>,
    pub event_end: Option<NaiveDate>,

    /// Cents when `discount_type` is `Value`, basis points when `Percent`.
    pub discount: i64,
    pub discount_type: DiscountType,
    pub shipping_cost_cents: i64,
    /// Held separately and refunded on return; never part of `total_value`.
    pub security_deposit_cents: i64,
    pub down_payment_cents: i64,
    pub installments: i64,
    /// Frozen computed total; recomputed only by the pricing engine.
    pub total_value_cents: i64,
    pub payment_method: PaymentMethod,

    pub delivery_mode: TransportMode,
    pub return_mode: TransportMode,
    /// Opaque to this engine; used by logistics.
    pub address: Option<String>,
    pub due_date: Option<NaiveDate>,

    /// For rentals: the id of the quote this booking was converted from.
    pub converted_from: Option<String>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Whether this booking's window overlaps the given inclusive window.
    #[inline]
    pub fn overlaps_window(&self, start: NaiveDate, end: NaiveDate) -> bool {
        windows_overlap(self.start_date, self.end_date, start, end)
    }

    /// Number of billed days (inclusive of both handover days).
    #[inline]
    pub fn rental_days(&self) -> i64 {
        crate::pricing::rental_days(self.start_date, self.end_date)
    }

    pub fn total_value(&self) -> Money {
        Money::from_cents(self.total_value_cents)
    }

    pub fn down_payment(&self) -> Money {
        Money::from_cents(self.down_payment_cents)
    }

    pub fn security_deposit(&self) -> Money {
        Money::from_cents(self.security_deposit_cents)
    }
}

// =============================================================================
// Booking Line Item
// =============================================================================

/// One (item, quantity, price) row of a booking.
///
/// Owned exclusively by its booking: line items are replaced as a whole set
/// when a booking is edited, never patched individually. The unit price is
/// frozen from the item at creation/conversion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BookingLineItem {
    pub id: String,
    pub booking_id: String,
    pub item_id: String,
    /// Units reserved; always >= 1.
    pub quantity: i64,
    /// Daily price in cents, frozen from the item.
    pub unit_price_snapshot_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl BookingLineItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_snapshot_cents)
    }
}

// =============================================================================
// Financial Transaction
// =============================================================================

/// Ledger entry produced when a booking records a non-zero down payment.
///
/// Append-only: the booking engine writes one entry per creation/conversion
/// and never mutates it afterward. Owned by the ledger subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct FinancialTransaction {
    pub id: String,
    pub booking_id: String,
    pub amount_cents: i64,
    pub payment_method: PaymentMethod,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl FinancialTransaction {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
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
    fn test_overlap_inclusive_bounds() {
        // Same-day handover overlaps on both ends
        assert!(windows_overlap(
            d("2024-01-10"),
            d("2024-01-12"),
            d("2024-01-12"),
            d("2024-01-15")
        ));
        assert!(windows_overlap(
            d("2024-01-12"),
            d("2024-01-15"),
            d("2024-01-10"),
            d("2024-01-12")
        ));
    }

    #[test]
    fn test_overlap_disjoint() {
        assert!(!windows_overlap(
            d("2024-01-10"),
            d("2024-01-12"),
            d("2024-01-13"),
            d("2024-01-15")
        ));
        assert!(!windows_overlap(
            d("2024-01-13"),
            d("2024-01-15"),
            d("2024-01-10"),
            d("2024-01-12")
        ));
    }

    #[test]
    fn test_overlap_containment() {
        // One window fully inside the other
        assert!(windows_overlap(
            d("2024-01-01"),
            d("2024-01-31"),
            d("2024-01-10"),
            d("2024-01-12")
        ));
        // Single-day windows
        assert!(windows_overlap(
            d("2024-01-10"),
            d("2024-01-10"),
            d("2024-01-10"),
            d("2024-01-10")
        ));
    }

    #[test]
    fn test_item_in_service_quantity() {
        let now = Utc::now();
        let item = Item {
            id: "i-1".to_string(),
            name: "Folding Chair".to_string(),
            total_quantity: 10,
            maintenance_quantity: 1,
            lost_quantity: 2,
            daily_price_cents: 500,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(item.in_service_quantity(), 7);
        assert_eq!(item.out_of_service_quantity(), 3);
        assert_eq!(item.daily_price().cents(), 500);
    }
}
