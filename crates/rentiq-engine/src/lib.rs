//! # rentiq-engine: Booking Availability & Conversion Engine
//!
//! The orchestration layer of RentIQ: computes how many units of an item are
//! free for a date window, and converts non-binding quotes into confirmed
//! rentals atomically.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  While a booking is edited (UI layer, out of scope):                   │
//! │                                                                         │
//! │    check_availability(item, window) ──► advisory numbers, may be      │
//! │                                          stale, gates nothing          │
//! │                                                                         │
//! │  At submission:                                                         │
//! │                                                                         │
//! │    convert(quote_id, overrides)                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │    ┌── ONE TRANSACTION ────────────────────────────────┐               │
//! │    │  authoritative re-check (strict profile)          │               │
//! │    │  create rental • clone lines • reprice            │               │
//! │    │  mark quote converted • ledger entry              │               │
//! │    └───────────────────────────────────────────────────┘               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │    Rental | InsufficientAvailability | NotConvertible | Conflict       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`availability`] - [`AvailabilityCalculator`], net free stock per window
//! - [`conversion`] - [`ConversionOrchestrator`], quote lifecycle + conversion
//! - [`error`] - [`EngineError`], the taxonomy callers consume
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rentiq_db::{Database, DbConfig};
//! use rentiq_engine::{AvailabilityCalculator, ConversionOrchestrator, ConversionOverrides};
//!
//! let db = Database::new(DbConfig::new("rentiq.db")).await?;
//!
//! let calculator = AvailabilityCalculator::new(db.clone());
//! let availability = calculator
//!     .check_availability(&item_id, start, end, None)
//!     .await?;
//!
//! let orchestrator = ConversionOrchestrator::new(db);
//! let rental = orchestrator
//!     .convert(&quote_id, ConversionOverrides::default())
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod availability;
pub mod conversion;
pub mod error;

// =============================================================================
// Re-exports
// =============================================================================

pub use availability::{Availability, AvailabilityCalculator};
pub use conversion::{ConversionOrchestrator, ConversionOverrides, NewQuote, QuoteLine};
pub use error::{EngineError, EngineResult};
