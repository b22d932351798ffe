//! # Ledger Repository
//!
//! Append-only financial transactions. The booking engine writes one entry
//! per non-zero down payment at creation/conversion time; nothing here is
//! ever updated or deleted.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use rentiq_core::FinancialTransaction;

const LEDGER_COLUMNS: &str =
    "id, booking_id, amount_cents, payment_method, description, created_at";

/// Repository for financial ledger entries.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Appends a ledger entry.
    pub async fn insert(&self, entry: &FinancialTransaction) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_tx(&mut conn, entry).await
    }

    /// Appends a ledger entry on an existing transaction connection.
    ///
    /// The down-payment entry of a conversion must commit or roll back with
    /// the rental it references.
    pub async fn insert_tx(
        conn: &mut SqliteConnection,
        entry: &FinancialTransaction,
    ) -> DbResult<()> {
        debug!(
            booking_id = %entry.booking_id,
            amount = %entry.amount_cents,
            "Recording financial transaction"
        );

        sqlx::query(
            "INSERT INTO financial_transactions (
                id, booking_id, amount_cents, payment_method, description, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&entry.id)
        .bind(&entry.booking_id)
        .bind(entry.amount_cents)
        .bind(entry.payment_method)
        .bind(&entry.description)
        .bind(entry.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Lists ledger entries for a booking, oldest first.
    pub async fn list_for_booking(&self, booking_id: &str) -> DbResult<Vec<FinancialTransaction>> {
        let entries = sqlx::query_as::<_, FinancialTransaction>(&format!(
            "SELECT {LEDGER_COLUMNS} FROM financial_transactions \
             WHERE booking_id = ? ORDER BY created_at"
        ))
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
