//! # Repository Module
//!
//! Database repository implementations for the booking engine.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Engine code                                                            │
//! │       │                                                                 │
//! │       │  db.bookings().find_overlapping_line_items(...)                 │
//! │       ▼                                                                 │
//! │  BookingRepository ── SQL lives here, nowhere else                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two calling conventions
//!
//! Every repository exposes pool-backed methods for standalone operations
//! and `*_tx` associated functions taking `&mut SqliteConnection` for work
//! that must share the conversion engine's transaction. The SQL is the same;
//! only the executor differs.
//!
//! ## Available Repositories
//!
//! - [`item::ItemRepository`] - catalogue reads and inventory maintenance
//! - [`booking::BookingRepository`] - bookings, line items, overlap queries
//! - [`ledger::LedgerRepository`] - append-only financial transactions

pub mod booking;
pub mod item;
pub mod ledger;
