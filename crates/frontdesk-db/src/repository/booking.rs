//! # Booking Repository
//!
//! Database operations for bookings.
//!
//! ## Booking Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. CREATE                                                              │
//! │     └── overlapping_count_tx() + insert_tx()  (same transaction)        │
//! │                                                                         │
//! │  2. CHECK IN                                                            │
//! │     └── update_tx() → status checked_in, room locked                    │
//! │                                                                         │
//! │  3. IN-STAY CHARGES / PAYMENTS                                          │
//! │     └── update_tx() → money columns move together, invariants hold      │
//! │                                                                         │
//! │  4. CHECK OUT or CANCEL (terminal)                                      │
//! │     └── update_tx() → no further writes accepted by the engine          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The overlap query runs inside the same transaction as the insert so two
//! concurrent creates cannot both pass the availability check.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use chrono::NaiveDate;
use frontdesk_core::{Booking, BookingStatus};

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

    /// Gets a booking by id within a tenant.
    pub async fn fetch(&self, tenant_id: &str, id: &str) -> DbResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, tenant_id, guest_id, room_id, room_type_id,
                   check_in, check_out, checked_in_at, checked_out_at,
                   adults, children,
                   rate_per_night_paise, nights, room_charge_paise,
                   extra_charges_paise, cgst_paise, sgst_paise, tax_slab_bps,
                   grand_total_paise, paid_paise, balance_paise,
                   status, source, created_by, cancel_reason,
                   created_at, updated_at
            FROM bookings
            WHERE tenant_id = ?1 AND id = ?2
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Lists bookings for a tenant in a given status, newest first.
    pub async fn list_by_status(
        &self,
        tenant_id: &str,
        status: BookingStatus,
    ) -> DbResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, tenant_id, guest_id, room_id, room_type_id,
                   check_in, check_out, checked_in_at, checked_out_at,
                   adults, children,
                   rate_per_night_paise, nights, room_charge_paise,
                   extra_charges_paise, cgst_paise, sgst_paise, tax_slab_bps,
                   grand_total_paise, paid_paise, balance_paise,
                   status, source, created_by, cancel_reason,
                   created_at, updated_at
            FROM bookings
            WHERE tenant_id = ?1 AND status = ?2
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Transactional variant of [`BookingRepository::fetch`].
    pub async fn fetch_tx(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        id: &str,
    ) -> DbResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, tenant_id, guest_id, room_id, room_type_id,
                   check_in, check_out, checked_in_at, checked_out_at,
                   adults, children,
                   rate_per_night_paise, nights, room_charge_paise,
                   extra_charges_paise, cgst_paise, sgst_paise, tax_slab_bps,
                   grand_total_paise, paid_paise, balance_paise,
                   status, source, created_by, cancel_reason,
                   created_at, updated_at
            FROM bookings
            WHERE tenant_id = ?1 AND id = ?2
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(booking)
    }

    /// Counts bookings that hold the room for an overlapping date range.
    ///
    /// Half-open intervals: `existing.check_in < new.check_out AND
    /// existing.check_out > new.check_in`. Same-day back-to-back turnover
    /// does not count as overlap. Only confirmed/checked-in bookings hold
    /// inventory.
    ///
    /// ## Arguments
    /// * `exclude_booking_id` - ignored booking (the modify path's own row)
    pub async fn overlapping_count_tx(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        room_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        exclude_booking_id: Option<&str>,
    ) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM bookings
            WHERE tenant_id = ?1
              AND room_id = ?2
              AND status IN ('confirmed', 'checked_in')
              AND check_in < ?3
              AND check_out > ?4
              AND (?5 IS NULL OR id <> ?5)
            "#,
        )
        .bind(tenant_id)
        .bind(room_id)
        .bind(check_out)
        .bind(check_in)
        .bind(exclude_booking_id)
        .fetch_one(conn)
        .await?;

        Ok(count)
    }

    /// Inserts a booking inside a transaction.
    pub async fn insert_tx(conn: &mut SqliteConnection, booking: &Booking) -> DbResult<()> {
        debug!(id = %booking.id, room_id = %booking.room_id, "Inserting booking");

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, tenant_id, guest_id, room_id, room_type_id,
                check_in, check_out, checked_in_at, checked_out_at,
                adults, children,
                rate_per_night_paise, nights, room_charge_paise,
                extra_charges_paise, cgst_paise, sgst_paise, tax_slab_bps,
                grand_total_paise, paid_paise, balance_paise,
                status, source, created_by, cancel_reason,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9,
                ?10, ?11,
                ?12, ?13, ?14,
                ?15, ?16, ?17, ?18,
                ?19, ?20, ?21,
                ?22, ?23, ?24, ?25,
                ?26, ?27
            )
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.tenant_id)
        .bind(&booking.guest_id)
        .bind(&booking.room_id)
        .bind(&booking.room_type_id)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(booking.checked_in_at)
        .bind(booking.checked_out_at)
        .bind(booking.adults)
        .bind(booking.children)
        .bind(booking.rate_per_night_paise)
        .bind(booking.nights)
        .bind(booking.room_charge_paise)
        .bind(booking.extra_charges_paise)
        .bind(booking.cgst_paise)
        .bind(booking.sgst_paise)
        .bind(booking.tax_slab_bps)
        .bind(booking.grand_total_paise)
        .bind(booking.paid_paise)
        .bind(booking.balance_paise)
        .bind(booking.status)
        .bind(booking.source)
        .bind(&booking.created_by)
        .bind(&booking.cancel_reason)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Writes back the mutable columns of a booking inside a transaction.
    ///
    /// The identity and snapshot columns (dates, rate, slab, room charge,
    /// nights) never change after creation and are not touched here.
    pub async fn update_tx(conn: &mut SqliteConnection, booking: &Booking) -> DbResult<()> {
        debug!(id = %booking.id, status = ?booking.status, "Updating booking");

        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                checked_in_at = ?3,
                checked_out_at = ?4,
                extra_charges_paise = ?5,
                cgst_paise = ?6,
                sgst_paise = ?7,
                grand_total_paise = ?8,
                paid_paise = ?9,
                balance_paise = ?10,
                status = ?11,
                cancel_reason = ?12,
                updated_at = ?13
            WHERE tenant_id = ?1 AND id = ?2
            "#,
        )
        .bind(&booking.tenant_id)
        .bind(&booking.id)
        .bind(booking.checked_in_at)
        .bind(booking.checked_out_at)
        .bind(booking.extra_charges_paise)
        .bind(booking.cgst_paise)
        .bind(booking.sgst_paise)
        .bind(booking.grand_total_paise)
        .bind(booking.paid_paise)
        .bind(booking.balance_paise)
        .bind(booking.status)
        .bind(&booking.cancel_reason)
        .bind(booking.updated_at)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", &booking.id));
        }

        Ok(())
    }
}
