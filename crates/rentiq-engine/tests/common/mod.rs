//! Shared helpers for the engine integration tests. Every test runs against
//! a fresh in-memory SQLite database with the real migrations applied.

#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use rentiq_core::{
    Booking, BookingKind, BookingLineItem, BookingStatus, DiscountType, Item, PaymentMethod,
    TransportMode,
};
use rentiq_db::repository::booking::BookingRepository;
use rentiq_db::{Database, DbConfig};
use rentiq_engine::{ConversionOrchestrator, NewQuote, QuoteLine};

pub async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date")
}

/// Inserts a catalogue item and returns it.
pub async fn seed_item(
    db: &Database,
    name: &str,
    total: i64,
    maintenance: i64,
    lost: i64,
    daily_price_cents: i64,
) -> Item {
    let now = Utc::now();
    let item = Item {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        total_quantity: total,
        maintenance_quantity: maintenance,
        lost_quantity: lost,
        daily_price_cents,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.items().insert(&item).await.expect("insert item");
    item
}

pub fn line(item: &Item, quantity: i64) -> QuoteLine {
    QuoteLine {
        item_id: item.id.clone(),
        quantity,
    }
}

/// A plain quote input: no discount, no shipping, no down payment.
pub fn quote_input(customer: &str, lines: Vec<QuoteLine>, start: &str, end: &str) -> NewQuote {
    NewQuote {
        customer_id: customer.to_string(),
        start_date: d(start),
        end_date: d(end),
        event_start: None,
        event_end: None,
        lines,
        discount: 0,
        discount_type: DiscountType::Value,
        shipping_cost_cents: 0,
        security_deposit_cents: 0,
        down_payment_cents: 0,
        installments: 1,
        payment_method: PaymentMethod::Cash,
        delivery_mode: TransportMode::Pickup,
        return_mode: TransportMode::Pickup,
        address: None,
        due_date: None,
        notes: None,
    }
}

/// Creates a quote and advances it to `Sent` (the usual conversion entry
/// point).
pub async fn sent_quote(orchestrator: &ConversionOrchestrator, input: NewQuote) -> Booking {
    let quote = orchestrator.create_quote(input).await.expect("create quote");
    orchestrator
        .send_quote(&quote.id)
        .await
        .expect("send quote")
}

/// Inserts a confirmed rental directly through the repository, bypassing
/// the engine's availability gate. Used to fabricate pre-existing (even
/// overbooked) state.
pub async fn force_rental(
    db: &Database,
    item: &Item,
    quantity: i64,
    start: &str,
    end: &str,
) -> Booking {
    let now = Utc::now();
    let rental = Booking {
        id: Uuid::new_v4().to_string(),
        kind: BookingKind::Rental,
        status: BookingStatus::Confirmed,
        customer_id: "cust-forced".to_string(),
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
    };
    db.bookings().insert(&rental).await.expect("insert rental");

    let mut conn = db.pool().acquire().await.expect("acquire");
    BookingRepository::insert_line_item_tx(
        &mut conn,
        &BookingLineItem {
            id: Uuid::new_v4().to_string(),
            booking_id: rental.id.clone(),
            item_id: item.id.clone(),
            quantity,
            unit_price_snapshot_cents: item.daily_price_cents,
            created_at: now,
        },
    )
    .await
    .expect("insert line");

    rental
}

pub async fn booking_count(db: &Database) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
        .fetch_one(db.pool())
        .await
        .expect("count bookings")
}

pub async fn rental_count(db: &Database) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE kind = 'rental'")
        .fetch_one(db.pool())
        .await
        .expect("count rentals")
}

pub async fn ledger_count(db: &Database) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM financial_transactions")
        .fetch_one(db.pool())
        .await
        .expect("count ledger entries")
}
