//! Domain events for the audit collaborator.
//!
//! Every lifecycle transition emits one event carrying before/after
//! snapshots of the affected entity. The engine hands events to an
//! [`AuditSink`] after the owning transaction commits; what the sink does
//! with them (persist, forward, log) is outside the core.

use serde::Serialize;

use crate::types::{Booking, Shift, Transaction};

/// A committed state change, with snapshots.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    BookingConfirmed {
        after: Booking,
    },
    BookingCheckedIn {
        before: Booking,
        after: Booking,
    },
    ExtraChargeAdded {
        before: Booking,
        after: Booking,
    },
    BookingCheckedOut {
        before: Booking,
        after: Booking,
    },
    BookingCancelled {
        before: Booking,
        after: Booking,
    },
    PaymentCollected {
        transaction: Transaction,
    },
    ShiftOpened {
        after: Shift,
    },
    ShiftClosed {
        before: Shift,
        after: Shift,
    },
}

impl DomainEvent {
    /// Dotted event name used by the audit log.
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::BookingConfirmed { .. } => "booking.confirmed",
            DomainEvent::BookingCheckedIn { .. } => "booking.checked_in",
            DomainEvent::ExtraChargeAdded { .. } => "booking.extra_charge_added",
            DomainEvent::BookingCheckedOut { .. } => "booking.checked_out",
            DomainEvent::BookingCancelled { .. } => "booking.cancelled",
            DomainEvent::PaymentCollected { .. } => "payment.collected",
            DomainEvent::ShiftOpened { .. } => "shift.opened",
            DomainEvent::ShiftClosed { .. } => "shift.closed",
        }
    }
}

/// Receiver for committed domain events.
///
/// Implementations must not fail the calling operation: the transaction
/// has already committed by the time the sink sees the event.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: &DomainEvent);
}

/// Sink that drops every event. Useful in tests that assert elsewhere.
#[derive(Debug, Default)]
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn record(&self, _event: &DomainEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentMode, LedgerType};
    use chrono::Utc;

    #[test]
    fn test_event_names() {
        let txn = Transaction {
            id: "tx-1".into(),
            tenant_id: "t-1".into(),
            booking_id: "b-1".into(),
            shift_id: None,
            amount_paise: 50000,
            mode: PaymentMode::Cash,
            ledger_type: LedgerType::CashDrawer,
            collected_by: "staff-1".into(),
            collected_at: Utc::now(),
            paid_after_paise: 50000,
            balance_after_paise: 174000,
        };
        let event = DomainEvent::PaymentCollected { transaction: txn };
        assert_eq!(event.name(), "payment.collected");
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let txn = Transaction {
            id: "tx-1".into(),
            tenant_id: "t-1".into(),
            booking_id: "b-1".into(),
            shift_id: Some("s-1".into()),
            amount_paise: 50000,
            mode: PaymentMode::Cash,
            ledger_type: LedgerType::CashDrawer,
            collected_by: "staff-1".into(),
            collected_at: Utc::now(),
            paid_after_paise: 50000,
            balance_after_paise: 174000,
        };
        let json = serde_json::to_value(DomainEvent::PaymentCollected { transaction: txn }).unwrap();
        assert_eq!(json["event"], "payment_collected");
        assert_eq!(json["transaction"]["amount_paise"], 50000);
    }
}
