//! # Shift Repository
//!
//! Database operations for cash shifts and the petty-cash ledger.
//!
//! The open-shift uniqueness check and the shift insert share one engine
//! transaction; a partial unique index on `(tenant_id, staff_id)` where
//! `status = 'open'` backstops the race at the storage layer.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use frontdesk_core::{CashLedgerEntry, Shift};

/// Repository for shift database operations.
#[derive(Debug, Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

impl ShiftRepository {
    /// Creates a new ShiftRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShiftRepository { pool }
    }

    /// Gets a shift by id within a tenant.
    pub async fn fetch(&self, tenant_id: &str, id: &str) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, tenant_id, staff_id, started_at, ended_at,
                   opening_cash_paise, closing_cash_paise, expected_cash_paise,
                   variance_paise, handover_to, notes, status
            FROM shifts
            WHERE tenant_id = ?1 AND id = ?2
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Gets the currently open shift for a staff member, if any.
    ///
    /// The session collaborator calls this as the logout guard: a staff
    /// member with an open shift is blocked from ending their session.
    pub async fn open_for_staff(&self, tenant_id: &str, staff_id: &str) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, tenant_id, staff_id, started_at, ended_at,
                   opening_cash_paise, closing_cash_paise, expected_cash_paise,
                   variance_paise, handover_to, notes, status
            FROM shifts
            WHERE tenant_id = ?1 AND staff_id = ?2 AND status = 'open'
            "#,
        )
        .bind(tenant_id)
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Transactional variant of [`ShiftRepository::fetch`].
    pub async fn fetch_tx(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        id: &str,
    ) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, tenant_id, staff_id, started_at, ended_at,
                   opening_cash_paise, closing_cash_paise, expected_cash_paise,
                   variance_paise, handover_to, notes, status
            FROM shifts
            WHERE tenant_id = ?1 AND id = ?2
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(shift)
    }

    /// Transactional variant of [`ShiftRepository::open_for_staff`].
    pub async fn open_for_staff_tx(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        staff_id: &str,
    ) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, tenant_id, staff_id, started_at, ended_at,
                   opening_cash_paise, closing_cash_paise, expected_cash_paise,
                   variance_paise, handover_to, notes, status
            FROM shifts
            WHERE tenant_id = ?1 AND staff_id = ?2 AND status = 'open'
            "#,
        )
        .bind(tenant_id)
        .bind(staff_id)
        .fetch_optional(conn)
        .await?;

        Ok(shift)
    }

    /// Inserts a new open shift inside a transaction.
    pub async fn insert_tx(conn: &mut SqliteConnection, shift: &Shift) -> DbResult<()> {
        debug!(id = %shift.id, staff_id = %shift.staff_id, "Inserting shift");

        sqlx::query(
            r#"
            INSERT INTO shifts (
                id, tenant_id, staff_id, started_at, ended_at,
                opening_cash_paise, closing_cash_paise, expected_cash_paise,
                variance_paise, handover_to, notes, status
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8,
                ?9, ?10, ?11, ?12
            )
            "#,
        )
        .bind(&shift.id)
        .bind(&shift.tenant_id)
        .bind(&shift.staff_id)
        .bind(shift.started_at)
        .bind(shift.ended_at)
        .bind(shift.opening_cash_paise)
        .bind(shift.closing_cash_paise)
        .bind(shift.expected_cash_paise)
        .bind(shift.variance_paise)
        .bind(&shift.handover_to)
        .bind(&shift.notes)
        .bind(shift.status)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Closes a shift inside a transaction.
    ///
    /// The `status = 'open'` predicate makes the close first-writer-wins:
    /// a second close finds zero rows and returns `false` instead of
    /// overwriting the recorded variance.
    pub async fn close_tx(conn: &mut SqliteConnection, shift: &Shift) -> DbResult<bool> {
        debug!(id = %shift.id, variance = ?shift.variance_paise, "Closing shift");

        let result = sqlx::query(
            r#"
            UPDATE shifts SET
                ended_at = ?3,
                closing_cash_paise = ?4,
                expected_cash_paise = ?5,
                variance_paise = ?6,
                handover_to = ?7,
                notes = ?8,
                status = 'closed'
            WHERE tenant_id = ?1 AND id = ?2 AND status = 'open'
            "#,
        )
        .bind(&shift.tenant_id)
        .bind(&shift.id)
        .bind(shift.ended_at)
        .bind(shift.closing_cash_paise)
        .bind(shift.expected_cash_paise)
        .bind(shift.variance_paise)
        .bind(&shift.handover_to)
        .bind(&shift.notes)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Petty-cash ledger
    // -------------------------------------------------------------------------

    /// Appends a petty-cash entry inside a transaction. Append-only.
    pub async fn ledger_insert_tx(
        conn: &mut SqliteConnection,
        entry: &CashLedgerEntry,
    ) -> DbResult<()> {
        debug!(
            id = %entry.id,
            shift_id = %entry.shift_id,
            entry_type = ?entry.entry_type,
            "Appending cash ledger entry"
        );

        sqlx::query(
            r#"
            INSERT INTO cash_ledger (
                id, tenant_id, shift_id, entry_type,
                amount_paise, category, description, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.tenant_id)
        .bind(&entry.shift_id)
        .bind(entry.entry_type)
        .bind(entry.amount_paise)
        .bind(&entry.category)
        .bind(&entry.description)
        .bind(entry.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Lists the petty-cash entries for a shift in entry order.
    pub async fn ledger_entries(
        &self,
        tenant_id: &str,
        shift_id: &str,
    ) -> DbResult<Vec<CashLedgerEntry>> {
        let entries = sqlx::query_as::<_, CashLedgerEntry>(
            r#"
            SELECT id, tenant_id, shift_id, entry_type,
                   amount_paise, category, description, created_at
            FROM cash_ledger
            WHERE tenant_id = ?1 AND shift_id = ?2
            ORDER BY created_at, id
            "#,
        )
        .bind(tenant_id)
        .bind(shift_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Sums the shift's petty-cash movements: `(additions, expenses)`.
    pub async fn ledger_totals_tx(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        shift_id: &str,
    ) -> DbResult<(i64, i64)> {
        let totals: (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN entry_type = 'addition' THEN amount_paise ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN entry_type = 'expense' THEN amount_paise ELSE 0 END), 0)
            FROM cash_ledger
            WHERE tenant_id = ?1 AND shift_id = ?2
            "#,
        )
        .bind(tenant_id)
        .bind(shift_id)
        .fetch_one(conn)
        .await?;

        Ok(totals)
    }
}
