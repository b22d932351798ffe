//! # Availability Calculator
//!
//! Net free stock for an item over an inclusive date window.
//!
//! ## Computation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  available = total_quantity                                             │
//! │            − maintenance_quantity − lost_quantity                       │
//! │            − Σ quantity of overlapping line items whose booking        │
//! │                status is active under the chosen profile                │
//! │                (excluding the booking being edited)                     │
//! │                                                                         │
//! │  The result MAY BE NEGATIVE: an already-overbooked window is           │
//! │  reported, not masked. Callers that want a display floor use           │
//! │  Availability::clamped().                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two callers, one computation
//!
//! The UI layer calls [`AvailabilityCalculator::check_availability`]
//! continuously while a booking is edited — advisory, possibly stale, never
//! gating a write. The conversion orchestrator runs the *same* computation
//! via [`AvailabilityCalculator::compute_tx`] inside its transaction, where
//! it is authoritative. Read-only and idempotent in both forms.

use chrono::NaiveDate;
use sqlx::SqliteConnection;
use tracing::debug;

use rentiq_core::{validation, AvailabilityProfile, Item};
use rentiq_db::repository::booking::BookingRepository;
use rentiq_db::{AllocatedLine, Database};

use crate::error::{EngineError, EngineResult};

// =============================================================================
// Result Type
// =============================================================================

/// Availability of one item for one date window.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Availability {
    pub item_id: String,
    /// Units owned in total.
    pub total_quantity: i64,
    /// Units out of service (maintenance + lost).
    pub out_of_service: i64,
    /// Units held by competing active bookings overlapping the window.
    pub allocated: i64,
    /// Net free units. Negative when the window is already overbooked.
    pub available: i64,
}

impl Availability {
    /// Display-friendly availability, floored at zero.
    #[inline]
    pub fn clamped(&self) -> i64 {
        self.available.max(0)
    }

    /// Whether `quantity` more units fit in this window.
    #[inline]
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        quantity <= self.available
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Computes net availability against the booking store.
///
/// Stateless besides the database handle; safe to call repeatedly and
/// concurrently. No side effects.
#[derive(Debug, Clone)]
pub struct AvailabilityCalculator {
    db: Database,
}

impl AvailabilityCalculator {
    /// Creates a new calculator.
    pub fn new(db: Database) -> Self {
        AvailabilityCalculator { db }
    }

    /// Produced interface for the UI/API layer: validates the window, loads
    /// the item and computes advisory availability under the
    /// [`AvailabilityProfile::General`] profile.
    ///
    /// `exclude_booking_id` lets a booking being edited ignore its own
    /// prior allocation.
    pub async fn check_availability(
        &self,
        item_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        exclude_booking_id: Option<&str>,
    ) -> EngineResult<Availability> {
        validation::validate_date_range(start, end)?;

        let item = self
            .db
            .items()
            .get_by_id(item_id)
            .await?
            .ok_or_else(|| EngineError::ItemNotFound(item_id.to_string()))?;

        self.compute(&item, start, end, exclude_booking_id, AvailabilityProfile::General)
            .await
    }

    /// Computes availability for an already-loaded item.
    ///
    /// The caller has validated `start <= end`.
    pub async fn compute(
        &self,
        item: &Item,
        start: NaiveDate,
        end: NaiveDate,
        exclude_booking_id: Option<&str>,
        profile: AvailabilityProfile,
    ) -> EngineResult<Availability> {
        let rows = self
            .db
            .bookings()
            .find_overlapping_line_items(
                &item.id,
                start,
                end,
                exclude_booking_id,
                profile.active_statuses(),
            )
            .await?;

        Ok(Self::from_rows(item, &rows))
    }

    /// Same computation on an existing transaction connection.
    ///
    /// This is the authoritative form: the conversion orchestrator calls it
    /// inside the transaction whose writes depend on the answer, so check
    /// and commit are serialized against competing conversions.
    pub async fn compute_tx(
        conn: &mut SqliteConnection,
        item: &Item,
        start: NaiveDate,
        end: NaiveDate,
        exclude_booking_id: Option<&str>,
        profile: AvailabilityProfile,
    ) -> EngineResult<Availability> {
        let rows = BookingRepository::find_overlapping_line_items_tx(
            conn,
            &item.id,
            start,
            end,
            exclude_booking_id,
            profile.active_statuses(),
        )
        .await?;

        Ok(Self::from_rows(item, &rows))
    }

    /// Folds the overlap rows into the availability figures.
    fn from_rows(item: &Item, rows: &[AllocatedLine]) -> Availability {
        let allocated: i64 = rows.iter().map(|row| row.quantity).sum();
        let available = item.in_service_quantity() - allocated;

        debug!(
            item_id = %item.id,
            allocated,
            available,
            "Computed availability"
        );

        Availability {
            item_id: item.id.clone(),
            total_quantity: item.total_quantity,
            out_of_service: item.out_of_service_quantity(),
            allocated,
            available,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(total: i64, maintenance: i64, lost: i64) -> Item {
        let now = Utc::now();
        Item {
            id: "item-1".to_string(),
            name: "Folding Chair".to_string(),
            total_quantity: total,
            maintenance_quantity: maintenance,
            lost_quantity: lost,
            daily_price_cents: 500,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn rows(quantities: &[i64]) -> Vec<AllocatedLine> {
        quantities
            .iter()
            .enumerate()
            .map(|(i, q)| AllocatedLine {
                booking_id: format!("b-{i}"),
                quantity: *q,
            })
            .collect()
    }

    #[test]
    fn test_net_availability() {
        // total 10, 1 in maintenance, one active rental of 4 → 5 free
        let availability = AvailabilityCalculator::from_rows(&item(10, 1, 0), &rows(&[4]));

        assert_eq!(availability.total_quantity, 10);
        assert_eq!(availability.out_of_service, 1);
        assert_eq!(availability.allocated, 4);
        assert_eq!(availability.available, 5);
    }

    #[test]
    fn test_negative_availability_is_reported() {
        let availability = AvailabilityCalculator::from_rows(&item(10, 0, 2), &rows(&[6, 5]));

        assert_eq!(availability.available, -3);
        assert_eq!(availability.clamped(), 0);
        assert!(!availability.can_fulfill(1));
    }

    #[test]
    fn test_can_fulfill_boundary() {
        let availability = AvailabilityCalculator::from_rows(&item(10, 1, 0), &rows(&[4]));

        assert!(availability.can_fulfill(5));
        assert!(!availability.can_fulfill(6));
    }

    #[test]
    fn test_no_competing_bookings() {
        let availability = AvailabilityCalculator::from_rows(&item(8, 2, 1), &[]);

        assert_eq!(availability.allocated, 0);
        assert_eq!(availability.available, 5);
    }
}
