//! # Booking Status State Machine
//!
//! Every booking carries a status from one closed enumeration; which
//! transitions are legal is decided here and nowhere else. Call sites never
//! compare status strings or hand-roll transition checks.
//!
//! ## Lifecycles
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Quote lifecycle                                                        │
//! │                                                                         │
//! │   Draft ──► Sent ──┬──► Approved ──► Converted                         │
//! │                    ├──► Refused                (terminal)               │
//! │                    ├──► Expired                (terminal)               │
//! │                    └──► Converted              (terminal)               │
//! │                                                                         │
//! │   A quote may convert straight from Sent — approval is optional.       │
//! │                                                                         │
//! │  Rental lifecycle                                                       │
//! │                                                                         │
//! │   Confirmed ──┬──► Completed                   (terminal)               │
//! │               └──► Canceled                    (terminal)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Availability profiles
//!
//! The availability calculator asks "which statuses consume stock?" in two
//! different situations: advisory checks while a booking is edited in the UI,
//! and the authoritative re-check inside a conversion transaction. The two
//! active-status sets are enumerated here, not scattered across queries.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

// =============================================================================
// Booking Status
// =============================================================================

/// Status of a booking. The first six variants belong to quotes, the last
/// three to rentals; [`BookingStatus::valid_for_kind`] enforces the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Quote is being drafted, not yet shown to the customer.
    Draft,
    /// Quote has been sent to the customer.
    Sent,
    /// Customer approved the quote.
    Approved,
    /// Customer refused the quote.
    Refused,
    /// Quote validity window lapsed without an answer.
    Expired,
    /// Quote was converted into a rental; the successor carries the stock.
    Converted,
    /// Rental is confirmed and consumes stock for its window.
    Confirmed,
    /// Rental finished and the equipment returned.
    Completed,
    /// Rental was canceled administratively.
    Canceled,
}

impl BookingStatus {
    /// Whether `self → next` is a legal transition.
    ///
    /// ## Example
    /// ```rust
    /// use rentiq_core::status::BookingStatus;
    ///
    /// assert!(BookingStatus::Sent.can_transition_to(BookingStatus::Converted));
    /// assert!(!BookingStatus::Draft.can_transition_to(BookingStatus::Converted));
    /// ```
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (*self, next),
            (Draft, Sent)
                | (Sent, Approved)
                | (Sent, Refused)
                | (Sent, Expired)
                | (Sent, Converted)
                | (Approved, Converted)
                | (Confirmed, Completed)
                | (Confirmed, Canceled)
        )
    }

    /// Checked transition: returns the new status or `InvalidTransition`.
    pub fn transition_to(&self, next: BookingStatus) -> Result<BookingStatus, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                from: *self,
                to: next,
            })
        }
    }

    /// Terminal statuses admit no further transition.
    pub fn is_terminal(&self) -> bool {
        use BookingStatus::*;
        matches!(self, Refused | Expired | Converted | Completed | Canceled)
    }

    /// Conversion is only legal from `Sent` or `Approved`.
    pub fn can_convert(&self) -> bool {
        matches!(self, BookingStatus::Sent | BookingStatus::Approved)
    }

    /// Whether the booking's line items may still be replaced wholesale.
    /// Editing stops once the customer has answered.
    pub fn allows_line_edit(&self) -> bool {
        matches!(self, BookingStatus::Draft | BookingStatus::Sent)
    }

    /// Whether this status is legal for the given booking kind.
    pub fn valid_for_kind(&self, kind: crate::types::BookingKind) -> bool {
        use BookingStatus::*;
        match kind {
            crate::types::BookingKind::Quote => {
                matches!(self, Draft | Sent | Approved | Refused | Expired | Converted)
            }
            crate::types::BookingKind::Rental => matches!(self, Confirmed | Completed | Canceled),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Draft => "draft",
            BookingStatus::Sent => "sent",
            BookingStatus::Approved => "approved",
            BookingStatus::Refused => "refused",
            BookingStatus::Expired => "expired",
            BookingStatus::Converted => "converted",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Canceled => "canceled",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Availability Profiles
// =============================================================================

/// Which status set counts toward allocated stock.
///
/// `Converted` is excluded from both profiles: a converted quote's
/// allocation is carried forward by its successor rental, so counting both
/// records would double-book every converted window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityProfile {
    /// Advisory profile for live UI feedback while a booking is edited.
    /// Permissive: only `Canceled`, `Completed` and `Converted` bookings are
    /// ignored (plus the booking being edited, via `exclude_booking_id`).
    General,
    /// Authoritative profile used inside the conversion transaction.
    /// Additionally ignores `Draft`, `Refused` and `Expired` quotes — those
    /// never consumed real stock.
    Strict,
}

impl AvailabilityProfile {
    /// The statuses that consume stock under this profile.
    pub fn active_statuses(&self) -> &'static [BookingStatus] {
        use BookingStatus::*;
        match self {
            AvailabilityProfile::General => {
                &[Draft, Sent, Approved, Refused, Expired, Confirmed]
            }
            AvailabilityProfile::Strict => &[Sent, Approved, Confirmed],
        }
    }

    /// Whether a booking in `status` counts toward allocation.
    pub fn counts(&self, status: BookingStatus) -> bool {
        self.active_statuses().contains(&status)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BookingKind;

    #[test]
    fn test_quote_happy_path() {
        assert!(BookingStatus::Draft.can_transition_to(BookingStatus::Sent));
        assert!(BookingStatus::Sent.can_transition_to(BookingStatus::Approved));
        assert!(BookingStatus::Approved.can_transition_to(BookingStatus::Converted));
    }

    #[test]
    fn test_conversion_may_skip_approval() {
        assert!(BookingStatus::Sent.can_transition_to(BookingStatus::Converted));
    }

    #[test]
    fn test_illegal_transitions_rejected() {
        let err = BookingStatus::Draft
            .transition_to(BookingStatus::Converted)
            .expect_err("draft cannot convert");
        assert!(matches!(err, CoreError::InvalidTransition { .. }));

        assert!(!BookingStatus::Refused.can_transition_to(BookingStatus::Sent));
        assert!(!BookingStatus::Converted.can_transition_to(BookingStatus::Converted));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Canceled));
    }

    #[test]
    fn test_terminal_statuses() {
        for status in [
            BookingStatus::Refused,
            BookingStatus::Expired,
            BookingStatus::Converted,
            BookingStatus::Completed,
            BookingStatus::Canceled,
        ] {
            assert!(status.is_terminal(), "{status} should be terminal");
        }
        assert!(!BookingStatus::Sent.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
    }

    #[test]
    fn test_convertible_set() {
        assert!(BookingStatus::Sent.can_convert());
        assert!(BookingStatus::Approved.can_convert());
        assert!(!BookingStatus::Draft.can_convert());
        assert!(!BookingStatus::Converted.can_convert());
        assert!(!BookingStatus::Expired.can_convert());
    }

    #[test]
    fn test_profiles_exclude_converted() {
        assert!(!AvailabilityProfile::General.counts(BookingStatus::Converted));
        assert!(!AvailabilityProfile::Strict.counts(BookingStatus::Converted));
    }

    #[test]
    fn test_general_profile_is_permissive() {
        // A draft quote still shows as consuming stock in the advisory view
        assert!(AvailabilityProfile::General.counts(BookingStatus::Draft));
        assert!(!AvailabilityProfile::Strict.counts(BookingStatus::Draft));
    }

    #[test]
    fn test_strict_profile() {
        assert!(AvailabilityProfile::Strict.counts(BookingStatus::Sent));
        assert!(AvailabilityProfile::Strict.counts(BookingStatus::Approved));
        assert!(AvailabilityProfile::Strict.counts(BookingStatus::Confirmed));
        for excluded in [
            BookingStatus::Draft,
            BookingStatus::Refused,
            BookingStatus::Expired,
            BookingStatus::Canceled,
            BookingStatus::Completed,
            BookingStatus::Converted,
        ] {
            assert!(!AvailabilityProfile::Strict.counts(excluded));
        }
    }

    #[test]
    fn test_status_kind_split() {
        assert!(BookingStatus::Sent.valid_for_kind(BookingKind::Quote));
        assert!(!BookingStatus::Sent.valid_for_kind(BookingKind::Rental));
        assert!(BookingStatus::Confirmed.valid_for_kind(BookingKind::Rental));
        assert!(!BookingStatus::Confirmed.valid_for_kind(BookingKind::Quote));
    }
}
