//! # Booking Repository
//!
//! Persistence for bookings and their line items, including the overlap
//! query the availability calculator is built on.
//!
//! ## Booking Lifecycle in the Store
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. CREATE QUOTE                                                        │
//! │     └── insert_tx() + replace_line_items_tx()     (one transaction)    │
//! │                                                                         │
//! │  2. NEGOTIATE                                                           │
//! │     └── update_status() draft → sent → approved                        │
//! │     └── replace_line_items_tx() whole-set edits                        │
//! │                                                                         │
//! │  3. CONVERT (rentiq-engine)                                            │
//! │     └── find_overlapping_line_items_tx()  re-check                     │
//! │     └── insert_tx() new rental + cloned line items                     │
//! │     └── update_status_tx() quote → converted                           │
//! │     └── all on ONE transaction                                          │
//! │                                                                         │
//! │  4. CLOSE OUT                                                           │
//! │     └── update_status() confirmed → completed | canceled               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use rentiq_core::{Booking, BookingLineItem, BookingStatus};

const BOOKING_COLUMNS: &str = "id, kind, status, customer_id, start_date, end_date, \
     event_start, event_end, discount, discount_type, shipping_cost_cents, \
     security_deposit_cents, down_payment_cents, installments, total_value_cents, \
     payment_method, delivery_mode, return_mode, address, due_date, converted_from, \
     notes, created_at, updated_at";

const LINE_ITEM_COLUMNS: &str =
    "id, booking_id, item_id, quantity, unit_price_snapshot_cents, created_at";

/// One allocated row returned by the overlap query: how many units a
/// competing booking holds on the queried item.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AllocatedLine {
    pub booking_id: String,
    pub quantity: i64,
}

/// Repository for booking database operations.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    /// Creates a new BookingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a booking by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Booking>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_by_id_tx(&mut conn, id).await
    }

    /// Gets a booking by ID on an existing transaction connection.
    pub async fn get_by_id_tx(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(booking)
    }

    /// Gets all line items of a booking, oldest first.
    pub async fn line_items(&self, booking_id: &str) -> DbResult<Vec<BookingLineItem>> {
        let mut conn = self.pool.acquire().await?;
        Self::line_items_tx(&mut conn, booking_id).await
    }

    /// Gets all line items of a booking on an existing transaction
    /// connection.
    pub async fn line_items_tx(
        conn: &mut SqliteConnection,
        booking_id: &str,
    ) -> DbResult<Vec<BookingLineItem>> {
        let items = sqlx::query_as::<_, BookingLineItem>(&format!(
            "SELECT {LINE_ITEM_COLUMNS} FROM booking_line_items \
             WHERE booking_id = ? ORDER BY created_at, id"
        ))
        .bind(booking_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(items)
    }

    /// Loads a booking together with its line items.
    pub async fn load_with_items(
        &self,
        booking_id: &str,
    ) -> DbResult<Option<(Booking, Vec<BookingLineItem>)>> {
        let Some(booking) = self.get_by_id(booking_id).await? else {
            return Ok(None);
        };
        let items = self.line_items(booking_id).await?;
        Ok(Some((booking, items)))
    }

    // =========================================================================
    // Overlap Query
    // =========================================================================

    /// Finds the line items of other bookings that compete with the given
    /// window for the given item.
    ///
    /// ## Predicate
    /// A booking's line item is returned when all of these hold:
    /// - it references `item_id`
    /// - its booking is not `exclude_booking_id`
    /// - its booking's status is in `statuses`
    /// - its booking's window overlaps `[start, end]` inclusively:
    ///   `b.start_date <= end AND b.end_date >= start`
    ///
    /// Dates are ISO-8601 TEXT columns, so the comparison happens directly
    /// in SQL.
    pub async fn find_overlapping_line_items(
        &self,
        item_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        exclude_booking_id: Option<&str>,
        statuses: &[BookingStatus],
    ) -> DbResult<Vec<AllocatedLine>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_overlapping_line_items_tx(&mut conn, item_id, start, end, exclude_booking_id, statuses)
            .await
    }

    /// [`Self::find_overlapping_line_items`] on an existing transaction
    /// connection — the authoritative re-check inside a conversion must see
    /// the same snapshot its writes will be validated against.
    pub async fn find_overlapping_line_items_tx(
        conn: &mut SqliteConnection,
        item_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        exclude_booking_id: Option<&str>,
        statuses: &[BookingStatus],
    ) -> DbResult<Vec<AllocatedLine>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        debug!(item_id = %item_id, %start, %end, "Querying overlapping allocations");

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT li.booking_id, li.quantity \
             FROM booking_line_items li \
             JOIN bookings b ON b.id = li.booking_id \
             WHERE li.item_id = ",
        );
        query.push_bind(item_id);
        query.push(" AND b.start_date <= ");
        query.push_bind(end);
        query.push(" AND b.end_date >= ");
        query.push_bind(start);

        if let Some(excluded) = exclude_booking_id {
            query.push(" AND b.id <> ");
            query.push_bind(excluded);
        }

        query.push(" AND b.status IN (");
        {
            let mut separated = query.separated(", ");
            for status in statuses {
                separated.push_bind(*status);
            }
        }
        query.push(")");

        let rows = query
            .build_query_as::<AllocatedLine>()
            .fetch_all(&mut *conn)
            .await?;

        Ok(rows)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts a booking.
    pub async fn insert(&self, booking: &Booking) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_tx(&mut conn, booking).await
    }

    /// Inserts a booking on an existing transaction connection.
    pub async fn insert_tx(conn: &mut SqliteConnection, booking: &Booking) -> DbResult<()> {
        debug!(id = %booking.id, kind = ?booking.kind, "Inserting booking");

        sqlx::query(&format!(
            "INSERT INTO bookings ({BOOKING_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&booking.id)
        .bind(booking.kind)
        .bind(booking.status)
        .bind(&booking.customer_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.event_start)
        .bind(booking.event_end)
        .bind(booking.discount)
        .bind(booking.discount_type)
        .bind(booking.shipping_cost_cents)
        .bind(booking.security_deposit_cents)
        .bind(booking.down_payment_cents)
        .bind(booking.installments)
        .bind(booking.total_value_cents)
        .bind(booking.payment_method)
        .bind(booking.delivery_mode)
        .bind(booking.return_mode)
        .bind(&booking.address)
        .bind(booking.due_date)
        .bind(&booking.converted_from)
        .bind(&booking.notes)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Inserts a single line item on an existing transaction connection.
    pub async fn insert_line_item_tx(
        conn: &mut SqliteConnection,
        line: &BookingLineItem,
    ) -> DbResult<()> {
        sqlx::query(&format!(
            "INSERT INTO booking_line_items ({LINE_ITEM_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)"
        ))
        .bind(&line.id)
        .bind(&line.booking_id)
        .bind(&line.item_id)
        .bind(line.quantity)
        .bind(line.unit_price_snapshot_cents)
        .bind(line.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Replaces a booking's line items as a whole set.
    ///
    /// Line items are owned by their booking — there is no partial patching,
    /// the old set is deleted and the new set inserted in one pass. Callers
    /// run this inside a transaction together with the reprice of the frozen
    /// total.
    pub async fn replace_line_items_tx(
        conn: &mut SqliteConnection,
        booking_id: &str,
        lines: &[BookingLineItem],
    ) -> DbResult<()> {
        debug!(booking_id = %booking_id, count = lines.len(), "Replacing line items");

        sqlx::query("DELETE FROM booking_line_items WHERE booking_id = ?")
            .bind(booking_id)
            .execute(&mut *conn)
            .await?;

        for line in lines {
            Self::insert_line_item_tx(conn, line).await?;
        }

        Ok(())
    }

    /// Updates a booking's status, guarded by the set of statuses the
    /// transition is legal from.
    ///
    /// Returns `true` when a row changed. `false` means the booking is
    /// missing or its status was no longer in `allowed_from` — for the
    /// conversion engine that is a lost race, not a bug.
    pub async fn update_status_tx(
        conn: &mut SqliteConnection,
        id: &str,
        new_status: BookingStatus,
        allowed_from: &[BookingStatus],
    ) -> DbResult<bool> {
        if allowed_from.is_empty() {
            return Ok(false);
        }

        let now = Utc::now();

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE bookings SET status = ");
        query.push_bind(new_status);
        query.push(", updated_at = ");
        query.push_bind(now);
        query.push(" WHERE id = ");
        query.push_bind(id);
        query.push(" AND status IN (");
        {
            let mut separated = query.separated(", ");
            for status in allowed_from {
                separated.push_bind(*status);
            }
        }
        query.push(")");

        let result = query.build().execute(&mut *conn).await?;

        Ok(result.rows_affected() > 0)
    }

    /// Pool-backed status update for administrative transitions; maps "no
    /// row changed" to NotFound.
    pub async fn update_status(
        &self,
        id: &str,
        new_status: BookingStatus,
        allowed_from: &[BookingStatus],
    ) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        let updated = Self::update_status_tx(&mut conn, id, new_status, allowed_from).await?;

        if !updated {
            return Err(DbError::not_found("Booking", id));
        }

        Ok(())
    }

    /// Stores a freshly computed frozen total on an existing transaction
    /// connection.
    pub async fn update_total_tx(
        conn: &mut SqliteConnection,
        id: &str,
        total_value_cents: i64,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE bookings SET total_value_cents = ?, updated_at = ? WHERE id = ?",
        )
        .bind(total_value_cents)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use rentiq_core::{BookingKind, DiscountType, Item, PaymentMethod, TransportMode};
    use uuid::Uuid;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn item(id: &str) -> Item {
        let now = Utc::now();
        Item {
            id: id.to_string(),
            name: "PA Speaker".to_string(),
            total_quantity: 8,
            maintenance_quantity: 0,
            lost_quantity: 0,
            daily_price_cents: 7_500,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn booking(id: &str, status: BookingStatus, start: &str, end: &str) -> Booking {
        let now = Utc::now();
        let kind = if status.valid_for_kind(BookingKind::Quote) {
            BookingKind::Quote
        } else {
            BookingKind::Rental
        };
        Booking {
            id: id.to_string(),
            kind,
            status,
            customer_id: "cust-1".to_string(),
            start_date: d(start),
            end_date: d(end),
            event_start: None,
            event_end: None,
            discount: 0,
            discount_type: DiscountType::Value,
            shipping_cost_cents: 0,
            security_deposit_cents: 0,
            down_payment_cents: 0,
            installments: 1,
            total_value_cents: 0,
            payment_method: PaymentMethod::Cash,
            delivery_mode: TransportMode::Pickup,
            return_mode: TransportMode::Pickup,
            address: None,
            due_date: None,
            converted_from: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn line(booking_id: &str, item_id: &str, quantity: i64) -> BookingLineItem {
        BookingLineItem {
            id: Uuid::new_v4().to_string(),
            booking_id: booking_id.to_string(),
            item_id: item_id.to_string(),
            quantity,
            unit_price_snapshot_cents: 7_500,
            created_at: Utc::now(),
        }
    }

    async fn seed_booking(db: &Database, b: &Booking, lines: &[BookingLineItem]) {
        db.bookings().insert(b).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();
        for l in lines {
            BookingRepository::insert_line_item_tx(&mut conn, l).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_insert_and_load_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.items().insert(&item("item-1")).await.unwrap();

        let b = booking("b-1", BookingStatus::Sent, "2024-05-01", "2024-05-03");
        seed_booking(&db, &b, &[line("b-1", "item-1", 2)]).await;

        let (loaded, lines) = db
            .bookings()
            .load_with_items("b-1")
            .await
            .unwrap()
            .expect("booking should exist");
        assert_eq!(loaded.status, BookingStatus::Sent);
        assert_eq!(loaded.kind, BookingKind::Quote);
        assert_eq!(loaded.start_date, d("2024-05-01"));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].unit_price_snapshot_cents, 7_500);
    }

    #[tokio::test]
    async fn test_overlap_query_window_bounds() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.items().insert(&item("item-1")).await.unwrap();

        // Booking occupying May 10-12
        let b = booking("b-1", BookingStatus::Confirmed, "2024-05-10", "2024-05-12");
        seed_booking(&db, &b, &[line("b-1", "item-1", 3)]).await;

        let active = [BookingStatus::Confirmed];

        // Same-day handover on the end bound overlaps
        let rows = db
            .bookings()
            .find_overlapping_line_items("item-1", d("2024-05-12"), d("2024-05-15"), None, &active)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 3);

        // The day after the window ends does not
        let rows = db
            .bookings()
            .find_overlapping_line_items("item-1", d("2024-05-13"), d("2024-05-15"), None, &active)
            .await
            .unwrap();
        assert!(rows.is_empty());

        // Fully containing window overlaps
        let rows = db
            .bookings()
            .find_overlapping_line_items("item-1", d("2024-05-01"), d("2024-05-31"), None, &active)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_overlap_query_filters_status_and_exclusion() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.items().insert(&item("item-1")).await.unwrap();

        let canceled = booking("b-canceled", BookingStatus::Canceled, "2024-05-10", "2024-05-12");
        seed_booking(&db, &canceled, &[line("b-canceled", "item-1", 5)]).await;

        let confirmed = booking("b-live", BookingStatus::Confirmed, "2024-05-10", "2024-05-12");
        seed_booking(&db, &confirmed, &[line("b-live", "item-1", 2)]).await;

        let active = [BookingStatus::Confirmed, BookingStatus::Sent];

        // Canceled booking is filtered out by the status set
        let rows = db
            .bookings()
            .find_overlapping_line_items("item-1", d("2024-05-11"), d("2024-05-11"), None, &active)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].booking_id, "b-live");

        // Excluding the booking being edited removes its own allocation
        let rows = db
            .bookings()
            .find_overlapping_line_items(
                "item-1",
                d("2024-05-11"),
                d("2024-05-11"),
                Some("b-live"),
                &active,
            )
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_update_status_guard() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let b = booking("b-1", BookingStatus::Sent, "2024-05-01", "2024-05-03");
        db.bookings().insert(&b).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();

        // Guard mismatch: booking is Sent, guard expects Draft
        let updated = BookingRepository::update_status_tx(
            &mut conn,
            "b-1",
            BookingStatus::Sent,
            &[BookingStatus::Draft],
        )
        .await
        .unwrap();
        assert!(!updated);

        // Legal: Sent → Converted
        let updated = BookingRepository::update_status_tx(
            &mut conn,
            "b-1",
            BookingStatus::Converted,
            &[BookingStatus::Sent, BookingStatus::Approved],
        )
        .await
        .unwrap();
        assert!(updated);
        drop(conn);

        let loaded = db.bookings().get_by_id("b-1").await.unwrap().unwrap();
        assert_eq!(loaded.status, BookingStatus::Converted);
    }

    #[tokio::test]
    async fn test_replace_line_items_is_whole_set() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.items().insert(&item("item-1")).await.unwrap();
        db.items().insert(&item("item-2")).await.unwrap();

        let b = booking("b-1", BookingStatus::Draft, "2024-05-01", "2024-05-03");
        seed_booking(&db, &b, &[line("b-1", "item-1", 2), line("b-1", "item-2", 1)]).await;

        let mut conn = db.pool().acquire().await.unwrap();
        BookingRepository::replace_line_items_tx(&mut conn, "b-1", &[line("b-1", "item-2", 4)])
            .await
            .unwrap();
        drop(conn);

        let lines = db.bookings().line_items("b-1").await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].item_id, "item-2");
        assert_eq!(lines[0].quantity, 4);
    }
}
