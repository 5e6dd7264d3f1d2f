//! # frontdesk-db: Database Layer for the Front-Desk Engine
//!
//! This crate provides database access for the front-desk engine.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (room, booking, ...)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use frontdesk_db::{Database, DbConfig};
//!
//! // Create database with default config (runs migrations)
//! let db = Database::new(DbConfig::new("path/to/frontdesk.db")).await?;
//!
//! // Pool reads go through repository handles
//! let booking = db.bookings().fetch(tenant_id, booking_id).await?;
//!
//! // Read-then-write units compose repository calls in one transaction
//! let mut tx = db.begin().await?;
//! let count = BookingRepository::overlapping_count_tx(
//!     &mut tx, tenant_id, room_id, check_in, check_out, None,
//! ).await?;
//! // ... insert, then tx.commit().await?
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::booking::BookingRepository;
pub use repository::room::RoomRepository;
pub use repository::shift::ShiftRepository;
pub use repository::transaction::TransactionRepository;

// =============================================================================
// Integration Tests (in-memory SQLite)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use frontdesk_core::{
        Booking, BookingSource, BookingStatus, CashLedgerEntry, LedgerEntryType, LedgerType,
        PaymentMode, Room, RoomStatus, Shift, ShiftStatus, Transaction,
    };
    use uuid::Uuid;

    const TENANT: &str = "tenant-1";

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn room_row(room_number: &str) -> Room {
        let now = Utc::now();
        Room {
            id: Uuid::new_v4().to_string(),
            tenant_id: TENANT.to_string(),
            room_number: room_number.to_string(),
            room_type_id: "standard".to_string(),
            status: RoomStatus::Available,
            needs_housekeeping: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn booking_row(room_id: &str, check_in: NaiveDate, check_out: NaiveDate) -> Booking {
        let now = Utc::now();
        let nights = (check_out - check_in).num_days().max(1);
        let room_charge = 200000 * nights;
        Booking {
            id: Uuid::new_v4().to_string(),
            tenant_id: TENANT.to_string(),
            guest_id: "guest-1".to_string(),
            room_id: room_id.to_string(),
            room_type_id: "standard".to_string(),
            check_in,
            check_out,
            checked_in_at: None,
            checked_out_at: None,
            adults: 2,
            children: 0,
            rate_per_night_paise: 200000,
            nights,
            room_charge_paise: room_charge,
            extra_charges_paise: 0,
            cgst_paise: room_charge * 6 / 100,
            sgst_paise: room_charge * 6 / 100,
            tax_slab_bps: 1200,
            grand_total_paise: room_charge + room_charge * 12 / 100,
            paid_paise: 0,
            balance_paise: room_charge + room_charge * 12 / 100,
            status: BookingStatus::Confirmed,
            source: BookingSource::WalkIn,
            created_by: "staff-1".to_string(),
            cancel_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn shift_row(staff_id: &str, opening_paise: i64) -> Shift {
        Shift {
            id: Uuid::new_v4().to_string(),
            tenant_id: TENANT.to_string(),
            staff_id: staff_id.to_string(),
            started_at: Utc::now(),
            ended_at: None,
            opening_cash_paise: opening_paise,
            closing_cash_paise: None,
            expected_cash_paise: None,
            variance_paise: None,
            handover_to: None,
            notes: None,
            status: ShiftStatus::Open,
        }
    }

    #[tokio::test]
    async fn test_room_insert_fetch_and_status_update() {
        let db = test_db().await;
        let room = room_row("101");
        db.rooms().insert(&room).await.unwrap();

        let fetched = db.rooms().fetch(TENANT, &room.id).await.unwrap().unwrap();
        assert_eq!(fetched.room_number, "101");
        assert_eq!(fetched.status, RoomStatus::Available);

        let mut tx = db.begin().await.unwrap();
        RoomRepository::set_status_tx(
            &mut tx,
            TENANT,
            &room.id,
            RoomStatus::Occupied,
            Some(false),
            Utc::now(),
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let fetched = db.rooms().fetch(TENANT, &room.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, RoomStatus::Occupied);
    }

    #[tokio::test]
    async fn test_booking_roundtrip_preserves_every_column() {
        let db = test_db().await;
        let room = room_row("102");
        db.rooms().insert(&room).await.unwrap();

        let booking = booking_row(&room.id, date(2026, 1, 10), date(2026, 1, 12));
        let mut tx = db.begin().await.unwrap();
        BookingRepository::insert_tx(&mut tx, &booking).await.unwrap();
        tx.commit().await.unwrap();

        let fetched = db.bookings().fetch(TENANT, &booking.id).await.unwrap().unwrap();
        assert_eq!(fetched.check_in, booking.check_in);
        assert_eq!(fetched.check_out, booking.check_out);
        assert_eq!(fetched.nights, 2);
        assert_eq!(fetched.tax_slab_bps, 1200);
        assert_eq!(fetched.status, BookingStatus::Confirmed);
        assert_eq!(fetched.source, BookingSource::WalkIn);
        assert!(fetched.totals_balance());
    }

    #[tokio::test]
    async fn test_overlap_count_half_open_intervals() {
        let db = test_db().await;
        let room = room_row("103");
        db.rooms().insert(&room).await.unwrap();

        let booking = booking_row(&room.id, date(2026, 1, 11), date(2026, 1, 13));
        let mut tx = db.begin().await.unwrap();
        BookingRepository::insert_tx(&mut tx, &booking).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = db.begin().await.unwrap();
        // Jan 10-12 overlaps Jan 11-13
        let overlapping = BookingRepository::overlapping_count_tx(
            &mut tx,
            TENANT,
            &room.id,
            date(2026, 1, 10),
            date(2026, 1, 12),
            None,
        )
        .await
        .unwrap();
        assert_eq!(overlapping, 1);

        // Jan 10-11 is adjacent: same-day turnover allowed
        let adjacent = BookingRepository::overlapping_count_tx(
            &mut tx,
            TENANT,
            &room.id,
            date(2026, 1, 10),
            date(2026, 1, 11),
            None,
        )
        .await
        .unwrap();
        assert_eq!(adjacent, 0);

        // Excluding the booking's own id ignores it
        let excluded = BookingRepository::overlapping_count_tx(
            &mut tx,
            TENANT,
            &room.id,
            date(2026, 1, 11),
            date(2026, 1, 13),
            Some(&booking.id),
        )
        .await
        .unwrap();
        assert_eq!(excluded, 0);
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_overlap_count_is_tenant_scoped() {
        let db = test_db().await;
        let room = room_row("104");
        db.rooms().insert(&room).await.unwrap();

        let booking = booking_row(&room.id, date(2026, 1, 11), date(2026, 1, 13));
        let mut tx = db.begin().await.unwrap();
        BookingRepository::insert_tx(&mut tx, &booking).await.unwrap();

        let other_tenant = BookingRepository::overlapping_count_tx(
            &mut tx,
            "tenant-2",
            &room.id,
            date(2026, 1, 11),
            date(2026, 1, 13),
            None,
        )
        .await
        .unwrap();
        assert_eq!(other_tenant, 0);
        tx.commit().await.unwrap();

        // Cross-tenant fetch sees nothing
        assert!(db.bookings().fetch("tenant-2", &booking.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_shift_close_is_first_writer_wins() {
        let db = test_db().await;
        let mut shift = shift_row("staff-1", 100000);
        let mut tx = db.begin().await.unwrap();
        ShiftRepository::insert_tx(&mut tx, &shift).await.unwrap();
        tx.commit().await.unwrap();

        shift.ended_at = Some(Utc::now());
        shift.closing_cash_paise = Some(140000);
        shift.expected_cash_paise = Some(140000);
        shift.variance_paise = Some(0);
        shift.status = ShiftStatus::Closed;

        let mut tx = db.begin().await.unwrap();
        assert!(ShiftRepository::close_tx(&mut tx, &shift).await.unwrap());
        tx.commit().await.unwrap();

        // Second close matches no open row
        let mut tx = db.begin().await.unwrap();
        assert!(!ShiftRepository::close_tx(&mut tx, &shift).await.unwrap());
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_open_shift_unique_index_backstop() {
        let db = test_db().await;
        let first = shift_row("staff-1", 100000);
        let second = shift_row("staff-1", 50000);

        let mut tx = db.begin().await.unwrap();
        ShiftRepository::insert_tx(&mut tx, &first).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = db.begin().await.unwrap();
        let err = ShiftRepository::insert_tx(&mut tx, &second).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_cash_sums_filter_ledger_type_and_staff() {
        let db = test_db().await;
        let room = room_row("105");
        db.rooms().insert(&room).await.unwrap();
        let booking = booking_row(&room.id, date(2026, 1, 10), date(2026, 1, 11));
        let shift = shift_row("staff-1", 100000);

        let mut tx = db.begin().await.unwrap();
        BookingRepository::insert_tx(&mut tx, &booking).await.unwrap();
        ShiftRepository::insert_tx(&mut tx, &shift).await.unwrap();

        let txn = |amount: i64, mode: PaymentMode, ledger: LedgerType, staff: &str| Transaction {
            id: Uuid::new_v4().to_string(),
            tenant_id: TENANT.to_string(),
            booking_id: booking.id.clone(),
            shift_id: Some(shift.id.clone()),
            amount_paise: amount,
            mode,
            ledger_type: ledger,
            collected_by: staff.to_string(),
            collected_at: Utc::now(),
            paid_after_paise: amount,
            balance_after_paise: booking.balance_paise - amount,
        };

        TransactionRepository::insert_tx(
            &mut tx,
            &txn(50000, PaymentMode::Cash, LedgerType::CashDrawer, "staff-1"),
        )
        .await
        .unwrap();
        // Bank-ledger collection must not count toward the drawer
        TransactionRepository::insert_tx(
            &mut tx,
            &txn(30000, PaymentMode::Upi, LedgerType::Bank, "staff-1"),
        )
        .await
        .unwrap();
        // Another staff member's cash must not count either
        TransactionRepository::insert_tx(
            &mut tx,
            &txn(20000, PaymentMode::Cash, LedgerType::CashDrawer, "staff-2"),
        )
        .await
        .unwrap();

        let total = TransactionRepository::cash_total_for_shift_tx(
            &mut tx,
            TENANT,
            &shift.id,
            "staff-1",
            shift.started_at,
        )
        .await
        .unwrap();
        assert_eq!(total, 50000);
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_ledger_totals_split_by_entry_type() {
        let db = test_db().await;
        let shift = shift_row("staff-1", 100000);
        let mut tx = db.begin().await.unwrap();
        ShiftRepository::insert_tx(&mut tx, &shift).await.unwrap();

        let entry = |entry_type: LedgerEntryType, amount: i64| CashLedgerEntry {
            id: Uuid::new_v4().to_string(),
            tenant_id: TENANT.to_string(),
            shift_id: shift.id.clone(),
            entry_type,
            amount_paise: amount,
            category: "misc".to_string(),
            description: None,
            created_at: Utc::now(),
        };

        ShiftRepository::ledger_insert_tx(&mut tx, &entry(LedgerEntryType::Expense, 15000))
            .await
            .unwrap();
        ShiftRepository::ledger_insert_tx(&mut tx, &entry(LedgerEntryType::Addition, 5000))
            .await
            .unwrap();

        let (additions, expenses) = ShiftRepository::ledger_totals_tx(&mut tx, TENANT, &shift.id)
            .await
            .unwrap();
        assert_eq!(additions, 5000);
        assert_eq!(expenses, 15000);
        tx.commit().await.unwrap();

        let entries = db.shifts().ledger_entries(TENANT, &shift.id).await.unwrap();
        assert_eq!(entries.len(), 2);
    }
}
