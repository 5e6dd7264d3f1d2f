//! # Error Types
//!
//! Domain-specific error types for the front-desk engine.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  frontdesk-core errors (this file)                                     │
//! │  └── DomainError      - Business rule violations                       │
//! │                                                                         │
//! │  frontdesk-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  frontdesk-engine errors (separate crate)                              │
//! │  └── EngineError      - Domain errors + opaque persistence failures    │
//! │                                                                         │
//! │  Flow: DomainError ──► EngineError ──► request layer                   │
//! │        DbError ───────► EngineError (message logged, never forwarded)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (booking id, amounts, dates)
//! 3. Errors are enum variants, never String
//! 4. Money mismatches are reported, never auto-corrected

use chrono::NaiveDate;
use thiserror::Error;

use crate::context::Capability;
use crate::types::BookingStatus;

// =============================================================================
// Domain Error
// =============================================================================

/// Business rule violations.
///
/// Every operation on the engine returns these as typed results to the
/// request layer; none are silently swallowed.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Departure must come strictly after arrival.
    #[error("invalid date range: check-out {check_out} must be after check-in {check_in}")]
    InvalidDateRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    /// The room has an overlapping confirmed/checked-in booking, or is
    /// blocked for maintenance.
    #[error("room {room_id} is not available for the requested dates")]
    RoomUnavailable { room_id: String },

    /// A rate, advance, charge, or payment amount failed validation.
    #[error("invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// The booking is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Check-in on anything but a confirmed booking
    /// - Extra charge outside the in-house window
    /// - Cancel after check-in
    #[error("booking is {status:?}, cannot {action}")]
    InvalidTransition {
        status: BookingStatus,
        action: &'static str,
    },

    /// Checkout called on a booking that has already been checked out.
    #[error("booking {booking_id} is already settled")]
    AlreadySettled { booking_id: String },

    /// The staff member already has an open shift.
    #[error("staff {staff_id} already has an open shift")]
    ShiftAlreadyOpen { staff_id: String },

    /// The shift is not open (close called twice, or on a stale id).
    #[error("shift {shift_id} is not open")]
    ShiftNotOpen { shift_id: String },

    /// A ledger entry was submitted against a closed shift.
    #[error("shift {shift_id} is closed; ledger entries are no longer accepted")]
    ShiftClosed { shift_id: String },

    /// A drawer cannot be handed over to the staff member closing it.
    #[error("shift handover loops back to the closing staff member {staff_id}")]
    ShiftHandoverLoop { staff_id: String },

    /// Collection would overshoot the booking balance beyond the
    /// configured rounding tolerance.
    #[error("amount {amount_paise} exceeds outstanding balance {balance_paise}")]
    AmountExceedsBalance {
        amount_paise: i64,
        balance_paise: i64,
    },

    /// A row resolved by id belongs to a different tenant.
    #[error("{entity} belongs to a different tenant")]
    TenantMismatch { entity: &'static str },

    /// The caller's capability set does not permit the operation.
    #[error("operation requires the {capability:?} capability")]
    Forbidden { capability: Capability },

    /// Entity cannot be found within the caller's tenant.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl DomainError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates an InvalidAmount error with a reason.
    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        DomainError::InvalidAmount {
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results with DomainError.
pub type DomainResult<T> = Result<T, DomainError>;

// =============================================================================
// Unit Tests
// =============================================================================
