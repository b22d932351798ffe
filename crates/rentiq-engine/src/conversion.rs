//! # Conversion Orchestrator
//!
//! Quote lifecycle operations and the quote → rental conversion.
//!
//! ## Conversion Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  convert(quote_id, overrides)                                           │
//! │                                                                         │
//! │  1. Load quote + line items; require status ∈ {Sent, Approved}         │
//! │  ┌──────────────────── ONE TRANSACTION ─────────────────────────────┐  │
//! │  │ 2. Re-check availability per item (strict profile,               │  │
//! │  │    excluding the quote itself)                                    │  │
//! │  │      └── any shortage → roll back, report ALL failing items      │  │
//! │  │ 3a. Insert new Rental booking (quote fields ⊕ overrides)         │  │
//! │  │ 3b. Clone line items, preserving price snapshots                 │  │
//! │  │ 3c. Recompute frozen total via the pricing engine                │  │
//! │  │ 3d. Mark quote Converted (audit trail otherwise untouched)       │  │
//! │  │ 3e. Down payment > 0 → append one ledger entry                   │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! │  4. Commit → return the new rental                                      │
//! │                                                                         │
//! │  Any failure inside the box rolls back wholesale: a rental with        │
//! │  missing line items is never observable.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serializability
//!
//! The re-check and the writes share one SQLite transaction. SQLite admits a
//! single writer, so two conversions racing for the same capacity serialize;
//! the loser's writes fail busy and surface as
//! [`EngineError::Conflict`](crate::error::EngineError::Conflict).
//! Availability failures are reported, never retried automatically — the
//! caller lets the user adjust quantities or dates and resubmit.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use rentiq_core::{
    compute_totals, validation, AvailabilityProfile, Booking, BookingKind, BookingLineItem,
    BookingStatus, CoreError, DiscountType, FinancialTransaction, Item, PaymentMethod,
    PricingLine, Shortage, TransportMode,
};
use rentiq_db::repository::booking::BookingRepository;
use rentiq_db::repository::item::ItemRepository;
use rentiq_db::repository::ledger::LedgerRepository;
use rentiq_db::Database;

use crate::availability::AvailabilityCalculator;
use crate::error::{EngineError, EngineResult};

// =============================================================================
// Inputs
// =============================================================================

/// One requested line of a new or edited quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteLine {
    pub item_id: String,
    pub quantity: i64,
}

/// Input for creating a quote from a form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuote {
    pub customer_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub event_start: Option<NaiveDate>,
    pub event_end: Option<NaiveDate>,
    pub lines: Vec<QuoteLine>,
    /// Cents when `discount_type` is `Value`, basis points when `Percent`.
    pub discount: i64,
    pub discount_type: DiscountType,
    pub shipping_cost_cents: i64,
    pub security_deposit_cents: i64,
    pub down_payment_cents: i64,
    pub installments: i64,
    pub payment_method: PaymentMethod,
    pub delivery_mode: TransportMode,
    pub return_mode: TransportMode,
    pub address: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Financial fields a conversion may override on top of the quote.
///
/// `None` keeps the quote's value; `Some` takes precedence. The frozen
/// total is always recomputed from the merged inputs — a caller-supplied
/// total is never accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionOverrides {
    pub payment_method: Option<PaymentMethod>,
    pub installments: Option<i64>,
    pub discount: Option<i64>,
    pub discount_type: Option<DiscountType>,
    pub shipping_cost_cents: Option<i64>,
    pub security_deposit_cents: Option<i64>,
    pub down_payment_cents: Option<i64>,
    pub due_date: Option<NaiveDate>,
}

/// The quote's pricing fields after the overrides are applied.
#[derive(Debug, Clone, Copy)]
struct MergedPricing {
    payment_method: PaymentMethod,
    installments: i64,
    discount: i64,
    discount_type: DiscountType,
    shipping_cost_cents: i64,
    security_deposit_cents: i64,
    down_payment_cents: i64,
    due_date: Option<NaiveDate>,
}

impl ConversionOverrides {
    fn merge(&self, quote: &Booking) -> MergedPricing {
        MergedPricing {
            payment_method: self.payment_method.unwrap_or(quote.payment_method),
            installments: self.installments.unwrap_or(quote.installments),
            discount: self.discount.unwrap_or(quote.discount),
            discount_type: self.discount_type.unwrap_or(quote.discount_type),
            shipping_cost_cents: self.shipping_cost_cents.unwrap_or(quote.shipping_cost_cents),
            security_deposit_cents: self
                .security_deposit_cents
                .unwrap_or(quote.security_deposit_cents),
            down_payment_cents: self.down_payment_cents.unwrap_or(quote.down_payment_cents),
            due_date: self.due_date.or(quote.due_date),
        }
    }
}

impl MergedPricing {
    fn validate(&self) -> EngineResult<()> {
        validation::validate_discount(self.discount, self.discount_type)?;
        validation::validate_price_cents("shipping_cost", self.shipping_cost_cents)?;
        validation::validate_price_cents("security_deposit", self.security_deposit_cents)?;
        validation::validate_price_cents("down_payment", self.down_payment_cents)?;
        validation::validate_installments(self.installments)?;
        Ok(())
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Top-level workflow for quote creation, status administration and
/// conversion. Every multi-write operation runs inside one transaction.
#[derive(Debug, Clone)]
pub struct ConversionOrchestrator {
    db: Database,
}

impl ConversionOrchestrator {
    /// Creates a new orchestrator.
    pub fn new(db: Database) -> Self {
        ConversionOrchestrator { db }
    }

    // =========================================================================
    // Quote Creation
    // =========================================================================

    /// Creates a quote in `Draft` from a form submission.
    ///
    /// Validates everything up front, snapshots unit prices from the
    /// catalogue, prices the quote, and writes the booking, its line items
    /// and the optional down-payment ledger entry in one transaction.
    ///
    /// Availability is *not* enforced here — quotes are non-binding; stock
    /// is only gated at conversion. The UI gets its advisory numbers from
    /// [`AvailabilityCalculator::check_availability`].
    pub async fn create_quote(&self, input: NewQuote) -> EngineResult<Booking> {
        validation::validate_customer_id(&input.customer_id)?;
        validation::validate_date_range(input.start_date, input.end_date)?;
        validation::validate_event_window(
            input.start_date,
            input.end_date,
            input.event_start,
            input.event_end,
        )?;
        validation::validate_line_item_count(input.lines.len())?;
        for line in &input.lines {
            validation::validate_quantity(line.quantity)?;
        }
        validation::validate_discount(input.discount, input.discount_type)?;
        validation::validate_price_cents("shipping_cost", input.shipping_cost_cents)?;
        validation::validate_price_cents("security_deposit", input.security_deposit_cents)?;
        validation::validate_price_cents("down_payment", input.down_payment_cents)?;
        validation::validate_installments(input.installments)?;

        let booking_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.db.begin().await?;

        // Snapshot unit prices from the catalogue
        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let item = Self::load_item(&mut tx, &line.item_id).await?;
            lines.push(BookingLineItem {
                id: Uuid::new_v4().to_string(),
                booking_id: booking_id.clone(),
                item_id: item.id.clone(),
                quantity: line.quantity,
                unit_price_snapshot_cents: item.daily_price_cents,
                created_at: now,
            });
        }

        let pricing_lines: Vec<PricingLine> = lines.iter().map(PricingLine::from).collect();
        let totals = compute_totals(
            &pricing_lines,
            input.start_date,
            input.end_date,
            input.discount,
            input.discount_type,
            input.shipping_cost_cents,
            input.down_payment_cents,
        );

        let quote = Booking {
            id: booking_id.clone(),
            kind: BookingKind::Quote,
            status: BookingStatus::Draft,
            customer_id: input.customer_id.trim().to_string(),
            start_date: input.start_date,
            end_date: input.end_date,
            event_start: input.event_start,
            event_end: input.event_end,
            discount: input.discount,
            discount_type: input.discount_type,
            shipping_cost_cents: input.shipping_cost_cents,
            security_deposit_cents: input.security_deposit_cents,
            down_payment_cents: input.down_payment_cents,
            installments: input.installments,
            total_value_cents: totals.final_value_cents,
            payment_method: input.payment_method,
            delivery_mode: input.delivery_mode,
            return_mode: input.return_mode,
            address: input.address,
            due_date: input.due_date,
            converted_from: None,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };

        BookingRepository::insert_tx(&mut tx, &quote).await?;
        for line in &lines {
            BookingRepository::insert_line_item_tx(&mut tx, line).await?;
        }

        if input.down_payment_cents > 0 {
            LedgerRepository::insert_tx(
                &mut tx,
                &FinancialTransaction {
                    id: Uuid::new_v4().to_string(),
                    booking_id: booking_id.clone(),
                    amount_cents: input.down_payment_cents,
                    payment_method: input.payment_method,
                    description: "Down payment".to_string(),
                    created_at: now,
                },
            )
            .await?;
        }

        tx.commit().await.map_err(rentiq_db::DbError::from)?;

        info!(
            booking_id = %quote.id,
            total = %quote.total_value_cents,
            lines = lines.len(),
            "Quote created"
        );

        Ok(quote)
    }

    // =========================================================================
    // Status Administration
    // =========================================================================

    /// Applies a status transition, enforced by the central state machine.
    ///
    /// The store-side guard re-checks the previous status, so a concurrent
    /// transition surfaces as [`EngineError::Conflict`] instead of silently
    /// overwriting.
    pub async fn update_status(
        &self,
        booking_id: &str,
        new_status: BookingStatus,
    ) -> EngineResult<Booking> {
        let booking = self.load_booking(booking_id).await?;
        booking.status.transition_to(new_status)?;

        let mut conn = self.db.pool().acquire().await.map_err(rentiq_db::DbError::from)?;
        let updated = BookingRepository::update_status_tx(
            &mut conn,
            booking_id,
            new_status,
            &[booking.status],
        )
        .await?;
        drop(conn);

        if !updated {
            return Err(EngineError::Conflict);
        }

        debug!(booking_id = %booking_id, from = %booking.status, to = %new_status, "Status updated");

        self.load_booking(booking_id).await
    }

    /// Marks a draft quote as sent to the customer.
    pub async fn send_quote(&self, quote_id: &str) -> EngineResult<Booking> {
        self.update_status(quote_id, BookingStatus::Sent).await
    }

    /// Administratively cancels a confirmed rental, releasing its stock.
    pub async fn cancel_rental(&self, rental_id: &str) -> EngineResult<Booking> {
        self.update_status(rental_id, BookingStatus::Canceled).await
    }

    // =========================================================================
    // Line-Item Editing
    // =========================================================================

    /// Replaces a booking's line items as a whole set and reprices the
    /// frozen total, in one transaction.
    ///
    /// Legal while the quote is `Draft` or `Sent`; once the customer has
    /// answered, the line set is locked.
    pub async fn replace_line_items(
        &self,
        booking_id: &str,
        new_lines: Vec<QuoteLine>,
    ) -> EngineResult<Booking> {
        validation::validate_line_item_count(new_lines.len())?;
        for line in &new_lines {
            validation::validate_quantity(line.quantity)?;
        }

        let booking = self.load_booking(booking_id).await?;
        if !booking.status.allows_line_edit() {
            return Err(CoreError::LineItemsLocked {
                status: booking.status,
            }
            .into());
        }

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let mut lines = Vec::with_capacity(new_lines.len());
        for line in &new_lines {
            let item = Self::load_item(&mut tx, &line.item_id).await?;
            lines.push(BookingLineItem {
                id: Uuid::new_v4().to_string(),
                booking_id: booking_id.to_string(),
                item_id: item.id.clone(),
                quantity: line.quantity,
                unit_price_snapshot_cents: item.daily_price_cents,
                created_at: now,
            });
        }

        BookingRepository::replace_line_items_tx(&mut tx, booking_id, &lines).await?;

        let pricing_lines: Vec<PricingLine> = lines.iter().map(PricingLine::from).collect();
        let totals = compute_totals(
            &pricing_lines,
            booking.start_date,
            booking.end_date,
            booking.discount,
            booking.discount_type,
            booking.shipping_cost_cents,
            booking.down_payment_cents,
        );
        BookingRepository::update_total_tx(&mut tx, booking_id, totals.final_value_cents).await?;

        tx.commit().await.map_err(rentiq_db::DbError::from)?;

        debug!(booking_id = %booking_id, lines = lines.len(), "Line items replaced");

        self.load_booking(booking_id).await
    }

    // =========================================================================
    // Conversion
    // =========================================================================

    /// Converts a quote into a new, independent rental booking.
    ///
    /// See the module docs for the full flow. On success the returned
    /// booking is the freshly created rental (`Confirmed`); the source
    /// quote is `Converted` and otherwise untouched.
    ///
    /// Not idempotent by design: a second call on the same quote fails with
    /// an invalid-state error and never creates a duplicate rental.
    pub async fn convert(
        &self,
        quote_id: &str,
        overrides: ConversionOverrides,
    ) -> EngineResult<Booking> {
        validation::validate_uuid("quote_id", quote_id)?;

        let mut tx = self.db.begin().await?;

        // 1. Load and gate on status
        let quote = BookingRepository::get_by_id_tx(&mut tx, quote_id)
            .await?
            .ok_or_else(|| EngineError::BookingNotFound(quote_id.to_string()))?;

        if quote.kind != BookingKind::Quote || !quote.status.can_convert() {
            return Err(CoreError::NotConvertible {
                status: quote.status,
            }
            .into());
        }

        let lines = BookingRepository::line_items_tx(&mut tx, quote_id).await?;
        validation::validate_line_item_count(lines.len())?;

        let merged = overrides.merge(&quote);
        merged.validate()?;

        // 2. Authoritative availability re-check, strict profile, all
        //    failing items collected before reporting. A quote may list the
        //    same item on several lines; demand is aggregated per item.
        let mut demands: Vec<(String, i64)> = Vec::new();
        for line in &lines {
            match demands.iter_mut().find(|(id, _)| *id == line.item_id) {
                Some((_, qty)) => *qty += line.quantity,
                None => demands.push((line.item_id.clone(), line.quantity)),
            }
        }

        let mut shortages: Vec<Shortage> = Vec::new();
        for (item_id, requested) in &demands {
            let item = Self::load_item(&mut tx, item_id).await?;
            let availability = AvailabilityCalculator::compute_tx(
                &mut tx,
                &item,
                quote.start_date,
                quote.end_date,
                Some(quote_id),
                AvailabilityProfile::Strict,
            )
            .await?;

            if !availability.can_fulfill(*requested) {
                shortages.push(Shortage {
                    item_id: item.id.clone(),
                    item_name: item.name.clone(),
                    requested: *requested,
                    available: availability.available,
                });
            }
        }

        if !shortages.is_empty() {
            tx.rollback().await.map_err(rentiq_db::DbError::from)?;
            return Err(EngineError::InsufficientAvailability { shortages });
        }

        // 3a. Build the rental from the quote ⊕ overrides
        let rental_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let pricing_lines: Vec<PricingLine> = lines.iter().map(PricingLine::from).collect();
        let totals = compute_totals(
            &pricing_lines,
            quote.start_date,
            quote.end_date,
            merged.discount,
            merged.discount_type,
            merged.shipping_cost_cents,
            merged.down_payment_cents,
        );

        let rental = Booking {
            id: rental_id.clone(),
            kind: BookingKind::Rental,
            status: BookingStatus::Confirmed,
            customer_id: quote.customer_id.clone(),
            start_date: quote.start_date,
            end_date: quote.end_date,
            event_start: quote.event_start,
            event_end: quote.event_end,
            discount: merged.discount,
            discount_type: merged.discount_type,
            shipping_cost_cents: merged.shipping_cost_cents,
            security_deposit_cents: merged.security_deposit_cents,
            down_payment_cents: merged.down_payment_cents,
            installments: merged.installments,
            // 3c. Never trust a caller-supplied total
            total_value_cents: totals.final_value_cents,
            payment_method: merged.payment_method,
            delivery_mode: quote.delivery_mode,
            return_mode: quote.return_mode,
            address: quote.address.clone(),
            due_date: merged.due_date,
            converted_from: Some(quote.id.clone()),
            notes: quote.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        BookingRepository::insert_tx(&mut tx, &rental).await?;

        // 3b. Clone the line items, preserving the price snapshots
        for line in &lines {
            BookingRepository::insert_line_item_tx(
                &mut tx,
                &BookingLineItem {
                    id: Uuid::new_v4().to_string(),
                    booking_id: rental_id.clone(),
                    item_id: line.item_id.clone(),
                    quantity: line.quantity,
                    unit_price_snapshot_cents: line.unit_price_snapshot_cents,
                    created_at: now,
                },
            )
            .await?;
        }

        // 3d. Mark the source quote converted; the guard re-checks the
        //     status, so a racing conversion resolves to Conflict here.
        let marked = BookingRepository::update_status_tx(
            &mut tx,
            quote_id,
            BookingStatus::Converted,
            &[BookingStatus::Sent, BookingStatus::Approved],
        )
        .await?;
        if !marked {
            return Err(EngineError::Conflict);
        }

        // 3e. Down payment → one ledger entry referencing the rental
        if merged.down_payment_cents > 0 {
            LedgerRepository::insert_tx(
                &mut tx,
                &FinancialTransaction {
                    id: Uuid::new_v4().to_string(),
                    booking_id: rental_id.clone(),
                    amount_cents: merged.down_payment_cents,
                    payment_method: merged.payment_method,
                    description: "Down payment".to_string(),
                    created_at: now,
                },
            )
            .await?;
        }

        // 4. Commit; on any earlier error the dropped transaction rolled
        //    everything back.
        tx.commit().await.map_err(rentiq_db::DbError::from)?;

        info!(
            quote_id = %quote_id,
            rental_id = %rental.id,
            total = %rental.total_value_cents,
            "Quote converted to rental"
        );

        Ok(rental)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn load_booking(&self, booking_id: &str) -> EngineResult<Booking> {
        self.db
            .bookings()
            .get_by_id(booking_id)
            .await?
            .ok_or_else(|| EngineError::BookingNotFound(booking_id.to_string()))
    }

    async fn load_item(
        conn: &mut sqlx::SqliteConnection,
        item_id: &str,
    ) -> EngineResult<Item> {
        let item = ItemRepository::get_by_id_tx(conn, item_id)
            .await?
            .filter(|item| item.is_active)
            .ok_or_else(|| EngineError::ItemNotFound(item_id.to_string()))?;
        Ok(item)
    }
}
