//! # rentiq-core: Pure Business Logic for the RentIQ Booking Engine
//!
//! The **heart** of the booking engine: all business rules as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RentIQ Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   Caller (UI / API layer, out of scope)         │   │
//! │  │   edits a booking ──► advisory availability ──► submits         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    rentiq-engine                                │   │
//! │  │    AvailabilityCalculator • ConversionOrchestrator              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rentiq-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │  status   │  │   │
//! │  │   │  Booking  │  │   Money   │  │  totals   │  │ lifecycle │  │   │
//! │  │   │   Item    │  │   cents   │  │   days    │  │ profiles  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK DECISIONS • PURE FUNCTIONS   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    rentiq-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, Booking, line items, ledger entries)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Totals computation (days, subtotal, discount, balance)
//! - [`status`] - Status state machine and availability profiles
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, always
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64)
//! 4. **Closed Enumerations**: statuses and kinds are tagged variants with
//!    centrally enforced transitions, never free-form strings

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, Shortage, ValidationError};
pub use money::Money;
pub use pricing::{compute_totals, PriceBreakdown, PricingLine};
pub use status::{AvailabilityProfile, BookingStatus};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single item on one line.
///
/// Guards against fat-finger quantities (1000 chairs instead of 10) before
/// they reach availability math.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum number of line items on one booking.
pub const MAX_BOOKING_LINE_ITEMS: usize = 100;
