//! # Engine Error Types
//!
//! The full error taxonomy callers of the booking engine consume.
//!
//! ## Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Domain(Validation)          malformed input, rejected before any      │
//! │                              store access — fully recoverable          │
//! │  Domain(NotConvertible /     illegal status for the operation —        │
//! │         InvalidTransition)   recoverable, user-facing                  │
//! │  InsufficientAvailability    every failing item enumerated in one      │
//! │                              response — recoverable                    │
//! │  Conflict                    lost a concurrency race at commit —       │
//! │                              retry once with fresh data                │
//! │  Persistence                 store failure — fatal for this request,   │
//! │                              logged, no partial state left visible     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is swallowed: every operation returns this discriminated result
//! rather than throwing past the crate boundary.

use thiserror::Error;

use rentiq_core::{CoreError, Shortage, ValidationError};
use rentiq_db::DbError;

/// Errors produced by the availability and conversion engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Domain rule violation (validation, illegal status, locked edit).
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Booking id did not resolve.
    #[error("booking not found: {0}")]
    BookingNotFound(String),

    /// Item id did not resolve (or the item is retired).
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// One or more line items cannot be fulfilled for the requested window.
    ///
    /// Carries **every** failing item, not just the first, so the caller can
    /// adjust the whole booking in a single round trip.
    #[error("insufficient availability for {} item(s)", .shortages.len())]
    InsufficientAvailability { shortages: Vec<Shortage> },

    /// A concurrent transaction won the race at commit time. Retry once
    /// with fresh data before surfacing to the user.
    #[error("conversion lost a concurrent race, retry with fresh data")]
    Conflict,

    /// The store failed. Fatal for this request; the transaction has been
    /// rolled back and no partial state is visible.
    #[error("persistence failure: {0}")]
    Persistence(DbError),
}

impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict => EngineError::Conflict,
            other => EngineError::Persistence(other),
        }
    }
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Domain(CoreError::Validation(err))
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================
