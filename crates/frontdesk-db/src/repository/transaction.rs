//! # Transaction Repository
//!
//! Append-only storage for collected payments.
//!
//! ## Append-Only Surface
//! This repository intentionally exposes **no update or delete operation**.
//! A transaction written here is permanent: the running paid/balance
//! snapshots taken at collection time are the audit trail a shift
//! reconciliation trusts. Corrections happen through new entries on the
//! booking, never by editing history.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use frontdesk_core::Transaction;

/// Repository for payment transaction records.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Lists all transactions for a booking in collection order.
    pub async fn list_for_booking(
        &self,
        tenant_id: &str,
        booking_id: &str,
    ) -> DbResult<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, tenant_id, booking_id, shift_id,
                   amount_paise, mode, ledger_type,
                   collected_by, collected_at,
                   paid_after_paise, balance_after_paise
            FROM transactions
            WHERE tenant_id = ?1 AND booking_id = ?2
            ORDER BY collected_at, id
            "#,
        )
        .bind(tenant_id)
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// Appends a transaction inside a transaction. The only write path.
    pub async fn insert_tx(conn: &mut SqliteConnection, txn: &Transaction) -> DbResult<()> {
        debug!(
            id = %txn.id,
            booking_id = %txn.booking_id,
            amount = %txn.amount_paise,
            "Appending transaction"
        );

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, tenant_id, booking_id, shift_id,
                amount_paise, mode, ledger_type,
                collected_by, collected_at,
                paid_after_paise, balance_after_paise
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7,
                ?8, ?9,
                ?10, ?11
            )
            "#,
        )
        .bind(&txn.id)
        .bind(&txn.tenant_id)
        .bind(&txn.booking_id)
        .bind(&txn.shift_id)
        .bind(txn.amount_paise)
        .bind(txn.mode)
        .bind(txn.ledger_type)
        .bind(&txn.collected_by)
        .bind(txn.collected_at)
        .bind(txn.paid_after_paise)
        .bind(txn.balance_after_paise)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Sums cash-drawer collections for a shift's drawer.
    ///
    /// Only `cash_drawer` ledger rows count: electronic and OTA collections
    /// never touch the physical drawer. The staff and window predicates
    /// pin the sum to amounts this staff member collected during the shift.
    pub async fn cash_total_for_shift_tx(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        shift_id: &str,
        staff_id: &str,
        window_start: DateTime<Utc>,
    ) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount_paise), 0)
            FROM transactions
            WHERE tenant_id = ?1
              AND shift_id = ?2
              AND ledger_type = 'cash_drawer'
              AND collected_by = ?3
              AND collected_at >= ?4
            "#,
        )
        .bind(tenant_id)
        .bind(shift_id)
        .bind(staff_id)
        .bind(window_start)
        .fetch_one(conn)
        .await?;

        Ok(total)
    }
}
