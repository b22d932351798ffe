//! # Seed Data Generator
//!
//! Populates the database with a rental catalogue for development.
//!
//! ## Usage
//! ```bash
//! # Default database path (./rentiq.db)
//! cargo run -p rentiq-db --bin seed
//!
//! # Specify database path
//! cargo run -p rentiq-db --bin seed -- --db ./data/rentiq.db
//! ```
//!
//! Generated items cover the usual event-rental categories (seating,
//! tables, sound, lighting, shelter), each with realistic owned quantities,
//! a few units in maintenance, and per-day prices.

use chrono::Utc;
use std::env;
use uuid::Uuid;

use rentiq_core::Item;
use rentiq_db::{Database, DbConfig};

/// (name, total owned, in maintenance, daily price in cents)
const CATALOGUE: &[(&str, i64, i64, i64)] = &[
    // Seating
    ("Folding Chair", 400, 12, 350),
    ("Chiavari Chair", 150, 4, 900),
    ("Bar Stool", 60, 2, 750),
    ("Lounge Sofa", 12, 1, 9_500),
    // Tables
    ("Banquet Table 6ft", 80, 3, 1_200),
    ("Round Table 5ft", 60, 2, 1_400),
    ("Cocktail Table", 40, 0, 1_100),
    // Sound
    ("PA Speaker 12\"", 16, 1, 7_500),
    ("Wireless Microphone", 24, 2, 3_500),
    ("Mixing Console 8ch", 6, 0, 12_000),
    ("Subwoofer 18\"", 8, 1, 9_000),
    // Lighting
    ("LED Par Light", 48, 4, 1_800),
    ("Moving Head Spot", 12, 1, 8_500),
    ("String Light 10m", 30, 0, 2_200),
    // Shelter & staging
    ("Canopy Tent 3x3m", 20, 2, 15_000),
    ("Stage Deck 1x2m", 32, 0, 4_500),
    ("Crowd Barrier", 50, 0, 1_000),
    // Power
    ("Generator 5kVA", 4, 1, 25_000),
    ("Cable Ramp 1m", 40, 0, 600),
];

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db_path = parse_db_path().unwrap_or_else(|| "./rentiq.db".to_string());

    tracing::info!(path = %db_path, "Seeding database");

    let db = match Database::new(DbConfig::new(&db_path)).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open database");
            std::process::exit(1);
        }
    };

    let repo = db.items();
    let now = Utc::now();
    let mut inserted = 0usize;

    for (name, total, maintenance, daily_price_cents) in CATALOGUE {
        let item = Item {
            id: Uuid::new_v4().to_string(),
            name: (*name).to_string(),
            total_quantity: *total,
            maintenance_quantity: *maintenance,
            lost_quantity: 0,
            daily_price_cents: *daily_price_cents,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        match repo.insert(&item).await {
            Ok(()) => inserted += 1,
            Err(e) => tracing::warn!(name = %name, error = %e, "Skipping item"),
        }
    }

    tracing::info!(inserted, "Seed complete");
    db.close().await;
}

/// Parses `--db <path>` from the command line.
fn parse_db_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .cloned()
}
