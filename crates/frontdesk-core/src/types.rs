//! # Domain Types
//!
//! Core domain types for the front-desk engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Room       │   │     Booking     │   │   Transaction   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  room_number    │   │  status         │   │  booking_id     │       │
//! │  │  status         │   │  stay dates     │   │  mode / ledger  │       │
//! │  └─────────────────┘   │  money columns  │   │  amount_paise   │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │     Shift       │   │ CashLedgerEntry │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  opening_cash   │   │  expense /      │                             │
//! │  │  variance       │   │  addition       │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists (room_number) - human-readable
//!
//! ## Snapshot Columns
//! A booking freezes the nightly rate and tax slab at creation. Tariff
//! changes after confirmation never move an existing booking's numbers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1200 bps = 12% (the low GST slab), 1800 bps = 18% (the high slab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Room
// =============================================================================

/// Physical status of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// Ready to sell.
    Available,
    /// A guest is checked in.
    Occupied,
    /// Held by a confirmed booking that has not arrived yet.
    Reserved,
    /// Blocked by engineering; not sellable regardless of bookings.
    Maintenance,
}

/// A physical room.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Room {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tenant (property) this room belongs to.
    pub tenant_id: String,

    /// Door number - business identifier, unique per tenant.
    pub room_number: String,

    /// Room type reference (tariff category).
    pub room_type_id: String,

    /// Physical status.
    pub status: RoomStatus,

    /// Set when the room needs housekeeping before resale.
    pub needs_housekeeping: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Whether new bookings may be taken for this room at all.
    #[inline]
    pub fn is_sellable(&self) -> bool {
        self.status != RoomStatus::Maintenance
    }
}

// =============================================================================
// Booking
// =============================================================================

/// The lifecycle state of a booking.
///
/// `draft → confirmed → checked_in → {checked_out, cancelled}`
/// `draft` and `confirmed` may also go to `cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Draft,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl BookingStatus {
    /// Statuses that hold room inventory: an overlapping booking in one of
    /// these states makes the room unavailable for the dates.
    #[inline]
    pub fn blocks_room(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::CheckedIn)
    }

    /// Terminal states permit no further mutation.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::CheckedOut | BookingStatus::Cancelled)
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Draft
    }
}

/// Where the booking came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BookingSource {
    /// Guest at the desk, no prior reservation.
    WalkIn,
    /// Online travel agency channel.
    Ota,
    /// Hotel website / phone.
    Direct,
}

/// A room reservation through its whole lifecycle.
///
/// ## Money Columns
/// All amounts are integer paise. The derived columns obey two invariants
/// at every point in the lifecycle:
///
/// ```text
/// grand_total = room_charge + extra_charges + cgst + sgst
/// balance     = grand_total - paid
/// ```
///
/// `rate_per_night_paise` and `tax_slab_bps` are frozen at creation; the
/// slab never re-derives from later charges.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Booking {
    pub id: String,
    pub tenant_id: String,
    pub guest_id: String,
    pub room_id: String,
    /// Room type at time of booking (frozen).
    pub room_type_id: String,

    /// Arrival date (inclusive).
    #[ts(as = "String")]
    pub check_in: NaiveDate,
    /// Departure date (exclusive); same-day turnover is allowed.
    #[ts(as = "String")]
    pub check_out: NaiveDate,
    /// Stamped on actual arrival.
    #[ts(as = "Option<String>")]
    pub checked_in_at: Option<DateTime<Utc>>,
    /// Stamped on actual departure.
    #[ts(as = "Option<String>")]
    pub checked_out_at: Option<DateTime<Utc>>,

    pub adults: i64,
    pub children: i64,

    /// Nightly rate at time of booking (frozen).
    pub rate_per_night_paise: i64,
    /// Chargeable nights, minimum 1.
    pub nights: i64,
    /// rate × nights, fixed at creation.
    pub room_charge_paise: i64,
    /// Accumulated in-stay charges plus checkout extras and late fee.
    pub extra_charges_paise: i64,
    pub cgst_paise: i64,
    pub sgst_paise: i64,
    /// GST slab selected from the nightly rate at creation (frozen).
    pub tax_slab_bps: u32,
    pub grand_total_paise: i64,
    pub paid_paise: i64,
    pub balance_paise: i64,

    pub status: BookingStatus,
    pub source: BookingSource,
    /// Staff member who took the booking.
    pub created_by: String,
    pub cancel_reason: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Returns the frozen nightly rate.
    #[inline]
    pub fn rate_per_night(&self) -> Money {
        Money::from_paise(self.rate_per_night_paise)
    }

    /// Returns the frozen tax slab.
    #[inline]
    pub fn tax_slab(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_slab_bps)
    }

    #[inline]
    pub fn room_charge(&self) -> Money {
        Money::from_paise(self.room_charge_paise)
    }

    #[inline]
    pub fn extra_charges(&self) -> Money {
        Money::from_paise(self.extra_charges_paise)
    }

    #[inline]
    pub fn grand_total(&self) -> Money {
        Money::from_paise(self.grand_total_paise)
    }

    #[inline]
    pub fn paid(&self) -> Money {
        Money::from_paise(self.paid_paise)
    }

    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_paise(self.balance_paise)
    }

    /// Checks the two money invariants that must hold after every mutation.
    pub fn totals_balance(&self) -> bool {
        self.grand_total_paise
            == self.room_charge_paise
                + self.extra_charges_paise
                + self.cgst_paise
                + self.sgst_paise
            && self.balance_paise == self.grand_total_paise - self.paid_paise
    }
}

// =============================================================================
// Payment Mode & Ledger
// =============================================================================

/// How a payment was tendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Cash,
    Upi,
    Card,
    BankTransfer,
    Cheque,
    /// Collected by the OTA and remitted later.
    OtaGateway,
}

/// Which ledger a collected amount lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LedgerType {
    /// Physical cash with the staff member's drawer; counted at shift close.
    CashDrawer,
    /// Settled electronically into the bank account.
    Bank,
    /// Receivable from the OTA, cleared on remittance.
    OtaReceivable,
    /// Corporate city-ledger postings recorded by the back office.
    CreditLedger,
}

impl PaymentMode {
    /// Maps a tender mode onto the ledger the amount belongs to.
    pub fn ledger_type(&self) -> LedgerType {
        match self {
            PaymentMode::Cash => LedgerType::CashDrawer,
            PaymentMode::Upi | PaymentMode::Card | PaymentMode::BankTransfer | PaymentMode::Cheque => {
                LedgerType::Bank
            }
            PaymentMode::OtaGateway => LedgerType::OtaReceivable,
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A collected payment against a booking.
///
/// Transactions are **append-only**: once written they are never updated or
/// deleted. The repository exposes no mutation path, so the running
/// paid/balance snapshots taken at collection time stay trustworthy for
/// audit and shift reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub tenant_id: String,
    pub booking_id: String,
    /// Shift whose drawer (for cash) this collection belongs to.
    pub shift_id: Option<String>,
    pub amount_paise: i64,
    pub mode: PaymentMode,
    pub ledger_type: LedgerType,
    pub collected_by: String,
    #[ts(as = "String")]
    pub collected_at: DateTime<Utc>,
    /// Booking paid total immediately after this collection.
    pub paid_after_paise: i64,
    /// Booking balance immediately after this collection.
    pub balance_after_paise: i64,
}

impl Transaction {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_paise(self.amount_paise)
    }
}

// =============================================================================
// Shift
// =============================================================================

/// Lifecycle state of a cash shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    Open,
    Closed,
}

/// A bounded period during which one staff member is accountable for the
/// physical cash drawer.
///
/// A staff member has at most one open shift at a time. `opening_cash` is
/// fixed at creation. Once closed, every field is immutable; the variance
/// (counted cash minus expected cash) is recorded, never corrected.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Shift {
    pub id: String,
    pub tenant_id: String,
    pub staff_id: String,
    #[ts(as = "String")]
    pub started_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub ended_at: Option<DateTime<Utc>>,
    pub opening_cash_paise: i64,
    /// Counted cash at close; NULL while open.
    pub closing_cash_paise: Option<i64>,
    /// System-computed drawer total at close; NULL while open.
    pub expected_cash_paise: Option<i64>,
    /// closing − expected; NULL while open.
    pub variance_paise: Option<i64>,
    /// Staff member the drawer was handed over to, if any.
    pub handover_to: Option<String>,
    pub notes: Option<String>,
    pub status: ShiftStatus,
}

impl Shift {
    #[inline]
    pub fn opening_cash(&self) -> Money {
        Money::from_paise(self.opening_cash_paise)
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == ShiftStatus::Open
    }

    #[inline]
    pub fn variance(&self) -> Option<Money> {
        self.variance_paise.map(Money::from_paise)
    }
}

// =============================================================================
// Cash Ledger Entry
// =============================================================================

/// Direction of a petty-cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryType {
    /// Cash taken out of the drawer (supplies, refreshments, ...).
    Expense,
    /// Cash put into the drawer outside of guest payments.
    Addition,
}

/// A manual petty-cash movement recorded against an open shift.
///
/// Append-only; contributes to the shift's expected-cash calculation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CashLedgerEntry {
    pub id: String,
    pub tenant_id: String,
    pub shift_id: String,
    pub entry_type: LedgerEntryType,
    pub amount_paise: i64,
    pub category: String,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl CashLedgerEntry {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_paise(self.amount_paise)
    }

    /// Signed contribution to expected drawer cash.
    pub fn signed_amount(&self) -> Money {
        match self.entry_type {
            LedgerEntryType::Expense => Money::from_paise(-self.amount_paise),
            LedgerEntryType::Addition => Money::from_paise(self.amount_paise),
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

    fn booking_fixture() -> Booking {
        let now = Utc::now();
        Booking {
            id: "b-1".into(),
            tenant_id: "t-1".into(),
            guest_id: "g-1".into(),
            room_id: "r-101".into(),
            room_type_id: "deluxe".into(),
            check_in: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 1, 11).unwrap(),
            checked_in_at: None,
            checked_out_at: None,
            adults: 2,
            children: 0,
            rate_per_night_paise: 200000,
            nights: 1,
            room_charge_paise: 200000,
            extra_charges_paise: 0,
            cgst_paise: 12000,
            sgst_paise: 12000,
            tax_slab_bps: 1200,
            grand_total_paise: 224000,
            paid_paise: 50000,
            balance_paise: 174000,
            status: BookingStatus::Confirmed,
            source: BookingSource::WalkIn,
            created_by: "staff-1".into(),
            cancel_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_booking_totals_balance() {
        let mut booking = booking_fixture();
        assert!(booking.totals_balance());

        booking.grand_total_paise += 1;
        assert!(!booking.totals_balance());
    }

    #[test]
    fn test_status_blocks_room() {
        assert!(BookingStatus::Confirmed.blocks_room());
        assert!(BookingStatus::CheckedIn.blocks_room());
        assert!(!BookingStatus::Draft.blocks_room());
        assert!(!BookingStatus::CheckedOut.blocks_room());
        assert!(!BookingStatus::Cancelled.blocks_room());
    }

    #[test]
    fn test_status_terminal() {
        assert!(BookingStatus::CheckedOut.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(!BookingStatus::CheckedIn.is_terminal());
    }

    #[test]
    fn test_mode_to_ledger_mapping() {
        assert_eq!(PaymentMode::Cash.ledger_type(), LedgerType::CashDrawer);
        assert_eq!(PaymentMode::Upi.ledger_type(), LedgerType::Bank);
        assert_eq!(PaymentMode::Card.ledger_type(), LedgerType::Bank);
        assert_eq!(PaymentMode::BankTransfer.ledger_type(), LedgerType::Bank);
        assert_eq!(PaymentMode::Cheque.ledger_type(), LedgerType::Bank);
        assert_eq!(PaymentMode::OtaGateway.ledger_type(), LedgerType::OtaReceivable);
    }

    #[test]
    fn test_ledger_entry_signed_amount() {
        let now = Utc::now();
        let mut entry = CashLedgerEntry {
            id: "e-1".into(),
            tenant_id: "t-1".into(),
            shift_id: "s-1".into(),
            entry_type: LedgerEntryType::Expense,
            amount_paise: 15000,
            category: "supplies".into(),
            description: None,
            created_at: now,
        };
        assert_eq!(entry.signed_amount().paise(), -15000);

        entry.entry_type = LedgerEntryType::Addition;
        assert_eq!(entry.signed_amount().paise(), 15000);
    }

    #[test]
    fn test_maintenance_room_not_sellable() {
        let now = Utc::now();
        let mut room = Room {
            id: "r-101".into(),
            tenant_id: "t-1".into(),
            room_number: "101".into(),
            room_type_id: "deluxe".into(),
            status: RoomStatus::Available,
            needs_housekeeping: false,
            created_at: now,
            updated_at: now,
        };
        assert!(room.is_sellable());

        room.status = RoomStatus::Maintenance;
        assert!(!room.is_sellable());
    }
}
