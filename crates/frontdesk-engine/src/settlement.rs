//! # Settlement Coordinator
//!
//! Collects payments against bookings and orchestrates checkout.
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  collect_payment(amount, mode, shift)                                   │
//! │       │                                                                 │
//! │       ├── amount > balance + ε ?  → AmountExceedsBalance                │
//! │       │   (ε absorbs rounding on a cash handover, default ₹1.00)        │
//! │       │                                                                 │
//! │       ├── mode → ledger:  cash → cash_drawer                            │
//! │       │                   upi/card/bank_transfer/cheque → bank          │
//! │       │                   ota_gateway → ota_receivable                  │
//! │       │                                                                 │
//! │       ├── append immutable Transaction (running paid/balance snapshot)  │
//! │       └── booking.paid / booking.balance move in the same transaction   │
//! │                                                                         │
//! │  Cash collections become visible to the shift's expected-cash total     │
//! │  the moment they commit.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! At checkout the coordinator calls the booking state machine for the
//! final totals, then collects the settlement payment, and returns the
//! combined invoice the notification collaborator renders.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use frontdesk_core::validation::validate_payment_amount;
use frontdesk_core::{
    Booking, BookingStatus, Capability, DomainError, DomainEvent, Money, PaymentMode,
    TenantContext, Transaction,
};
use frontdesk_db::{BookingRepository, ShiftRepository, TransactionRepository};

use crate::booking::BookingService;
use crate::error::EngineResult;
use crate::EngineInner;

// =============================================================================
// Requests & Responses
// =============================================================================

/// The settlement payment taken at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementPayment {
    pub amount: Money,
    pub mode: PaymentMode,
    /// Drawer shift a cash settlement belongs to.
    pub shift_id: Option<String>,
}

/// The final invoice handed to the notification collaborator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub booking: Booking,
    /// Every payment collected over the booking's lifetime, in order.
    pub transactions: Vec<Transaction>,
    pub grand_total: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub paid: Money,
    pub balance: Money,
}

// =============================================================================
// Settlement Service
// =============================================================================

/// The settlement coordinator.
#[derive(Clone)]
pub struct SettlementService {
    inner: Arc<EngineInner>,
}

impl SettlementService {
    pub(crate) fn new(inner: Arc<EngineInner>) -> Self {
        SettlementService { inner }
    }

    /// Collects a payment against a booking.
    ///
    /// Appends an immutable transaction with running paid/balance
    /// snapshots and moves the booking's paid/balance in the same database
    /// transaction, so the two can never drift apart.
    ///
    /// ## Errors
    /// - `AmountExceedsBalance` beyond the configured tolerance
    /// - `ShiftClosed` when the named drawer shift is no longer open
    /// - `InvalidTransition` on draft or cancelled bookings
    pub async fn collect_payment(
        &self,
        ctx: &TenantContext,
        booking_id: &str,
        amount: Money,
        mode: PaymentMode,
        shift_id: Option<&str>,
    ) -> EngineResult<Transaction> {
        ctx.require(Capability::CollectPayments)?;
        validate_payment_amount(amount)?;

        let _guard = self.inner.write_lock.lock().await;
        let mut tx = self.inner.db.begin().await?;

        let mut booking = BookingRepository::fetch_tx(&mut tx, ctx.tenant_id(), booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))?;
        ctx.ensure_tenant(&booking.tenant_id, "Booking")?;

        match booking.status {
            BookingStatus::Confirmed | BookingStatus::CheckedIn | BookingStatus::CheckedOut => {}
            status => {
                return Err(DomainError::InvalidTransition {
                    status,
                    action: "collect payment",
                }
                .into())
            }
        }

        if amount > booking.balance() + self.inner.config.settle_epsilon {
            return Err(DomainError::AmountExceedsBalance {
                amount_paise: amount.paise(),
                balance_paise: booking.balance_paise,
            }
            .into());
        }

        if let Some(shift_id) = shift_id {
            let shift = ShiftRepository::fetch_tx(&mut tx, ctx.tenant_id(), shift_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Shift", shift_id))?;
            ctx.ensure_tenant(&shift.tenant_id, "Shift")?;
            if !shift.is_open() {
                return Err(DomainError::ShiftClosed {
                    shift_id: shift_id.to_string(),
                }
                .into());
            }
        }

        let now = Utc::now();
        booking.paid_paise += amount.paise();
        booking.balance_paise = booking.grand_total_paise - booking.paid_paise;
        booking.updated_at = now;

        let txn = Transaction {
            id: Uuid::new_v4().to_string(),
            tenant_id: ctx.tenant_id().to_string(),
            booking_id: booking_id.to_string(),
            shift_id: shift_id.map(str::to_string),
            amount_paise: amount.paise(),
            mode,
            ledger_type: mode.ledger_type(),
            collected_by: ctx.staff_id().to_string(),
            collected_at: now,
            paid_after_paise: booking.paid_paise,
            balance_after_paise: booking.balance_paise,
        };

        debug_assert!(booking.totals_balance());

        TransactionRepository::insert_tx(&mut tx, &txn).await?;
        BookingRepository::update_tx(&mut tx, &booking).await?;
        tx.commit().await?;

        info!(
            booking_id = %booking_id,
            amount = %amount,
            mode = ?mode,
            ledger = ?txn.ledger_type,
            balance = %booking.balance(),
            "Payment collected"
        );
        self.inner.audit.record(&DomainEvent::PaymentCollected {
            transaction: txn.clone(),
        });

        Ok(txn)
    }

    /// Checks the guest out and settles in one call.
    ///
    /// Orchestrates the booking state machine's checkout for the final
    /// totals, collects the settlement payment when one is supplied, and
    /// returns the combined invoice.
    pub async fn checkout(
        &self,
        ctx: &TenantContext,
        booking_id: &str,
        extra_charges: Money,
        late_fee: Money,
        payment: Option<SettlementPayment>,
    ) -> EngineResult<Invoice> {
        let bookings = BookingService::new(Arc::clone(&self.inner));

        bookings
            .check_out(ctx, booking_id, extra_charges, late_fee)
            .await?;

        if let Some(payment) = payment {
            self.collect_payment(
                ctx,
                booking_id,
                payment.amount,
                payment.mode,
                payment.shift_id.as_deref(),
            )
            .await?;
        }

        let booking = bookings.get(ctx, booking_id).await?;
        let transactions = self
            .inner
            .db
            .transactions()
            .list_for_booking(ctx.tenant_id(), booking_id)
            .await?;

        info!(
            booking_id = %booking_id,
            grand_total = %booking.grand_total(),
            balance = %booking.balance(),
            "Checkout settled"
        );

        Ok(Invoice {
            grand_total: booking.grand_total(),
            cgst: Money::from_paise(booking.cgst_paise),
            sgst: Money::from_paise(booking.sgst_paise),
            paid: booking.paid(),
            balance: booking.balance(),
            booking,
            transactions,
        })
    }

    /// Lists every payment collected against a booking, in order.
    pub async fn payments(
        &self,
        ctx: &TenantContext,
        booking_id: &str,
    ) -> EngineResult<Vec<Transaction>> {
        Ok(self
            .inner
            .db
            .transactions()
            .list_for_booking(ctx.tenant_id(), booking_id)
            .await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
