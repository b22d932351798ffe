//! # Error Types
//!
//! Domain-specific error types for rentiq-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rentiq-core errors (this file)                                        │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  rentiq-db errors (separate crate)                                     │
//! │  └── DbError          - Store failures, commit-time conflicts          │
//! │                                                                         │
//! │  rentiq-engine errors (separate crate)                                 │
//! │  └── EngineError      - The full taxonomy callers consume              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derive macros, never manual impls
//! 2. Context in the variant (item id, requested vs available), never in
//!    free-form strings alone
//! 3. Errors are enum variants; nothing is thrown past a crate boundary
//!    untyped

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::BookingStatus;

// =============================================================================
// Shortage
// =============================================================================

/// One item that cannot be fulfilled for a requested window.
///
/// Conversion collects a `Shortage` per failing line item and reports all of
/// them in one response, so the caller can fix the whole booking in a single
/// round trip instead of resubmitting once per item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortage {
    pub item_id: String,
    pub item_name: String,
    pub requested: i64,
    /// Net availability; negative values mean the window is already
    /// overbooked before this request.
    pub available: i64,
}

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The status machine refused a transition.
    #[error("illegal status transition: {from} -> {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// Conversion requested on a quote whose status does not allow it.
    ///
    /// Only `Sent` and `Approved` quotes convert; a `Draft` was never
    /// offered, and `Refused`/`Expired`/`Converted` are terminal.
    #[error("quote is {status}, conversion requires sent or approved")]
    NotConvertible { status: BookingStatus },

    /// Line-item edit requested after the customer answered the quote.
    #[error("booking is {status}, line items can no longer be edited")]
    LineItemsLocked { status: BookingStatus },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation failures. Rejected before any store access; fully
/// recoverable by the caller.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g. not a UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// `start_date` is after `end_date`.
    #[error("date range is inverted: {start} is after {end}")]
    DateRangeInverted {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// The informational event window falls outside the rental window.
    #[error("event window {event_start}..{event_end} lies outside the rental window")]
    EventOutsideWindow {
        event_start: chrono::NaiveDate,
        event_end: chrono::NaiveDate,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
