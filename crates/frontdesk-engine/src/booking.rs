//! # Booking State Machine
//!
//! Owns the booking lifecycle and the room status that moves with it.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   draft ──► confirmed ──► checked_in ──► checked_out   (terminal)       │
//! │     │           │                                                       │
//! │     └───────────┴──────► cancelled                     (terminal)       │
//! │                                                                         │
//! │   create()            → confirmed, room reserved, advance recorded      │
//! │   check_in()          → checked_in, room occupied                       │
//! │   add_extra_charge()  → in-stay only; totals move, slab stays           │
//! │   check_out()         → checked_out, room available + housekeeping      │
//! │   cancel()            → cancelled, room hold released                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Availability is evaluated inside the same transaction as the booking
//! insert, so two concurrent creates cannot both see the room as free.
//! The GST slab is selected from the per-night rate at creation and never
//! re-derived; checkout recomputes tax *amounts* from that frozen slab
//! against the final taxable base.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use frontdesk_core::availability::stay_nights;
use frontdesk_core::validation::{
    validate_non_negative, validate_occupancy, validate_rate, validate_stay,
};
use frontdesk_core::{
    Booking, BookingSource, BookingStatus, Capability, DomainError, DomainEvent, Money,
    PaymentMode, RoomStatus, TenantContext, Transaction,
};
use frontdesk_db::{BookingRepository, RoomRepository, ShiftRepository, TransactionRepository};

use crate::error::EngineResult;
use crate::EngineInner;

// =============================================================================
// Requests & Responses
// =============================================================================

/// Input for creating a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub guest_id: String,
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub rate_per_night: Money,
    pub adults: i64,
    pub children: i64,
    /// Amount collected up front; zero for none.
    pub advance: Money,
    /// How the advance was tendered; required when `advance` is positive.
    pub advance_mode: Option<PaymentMode>,
    /// Drawer shift a cash advance belongs to.
    pub shift_id: Option<String>,
    pub source: BookingSource,
}

/// Final figures returned by checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutTotals {
    pub booking_id: String,
    pub grand_total: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub paid: Money,
    pub balance: Money,
}

// =============================================================================
// Booking Service
// =============================================================================

/// The booking state machine.
#[derive(Clone)]
pub struct BookingService {
    inner: Arc<EngineInner>,
}

impl BookingService {
    pub(crate) fn new(inner: Arc<EngineInner>) -> Self {
        BookingService { inner }
    }

    /// Creates a booking and confirms it.
    ///
    /// ## What This Does
    /// 1. Validates dates, rate, advance, and occupancy
    /// 2. Checks availability inside the booking transaction
    /// 3. Computes nights (min 1), room charge, and the GST breakdown;
    ///    the slab comes from the per-night rate, not the stay total
    /// 4. Records an initial payment transaction when an advance is given
    /// 5. Reserves the room
    ///
    /// ## Errors
    /// - `InvalidDateRange` when check-out is not after check-in
    /// - `InvalidAmount` on negative rate/advance or a missing advance mode
    /// - `RoomUnavailable` on overlap or a maintenance-blocked room
    pub async fn create(&self, ctx: &TenantContext, input: NewBooking) -> EngineResult<Booking> {
        ctx.require(Capability::ManageBookings)?;
        validate_stay(input.check_in, input.check_out)?;
        validate_rate(input.rate_per_night)?;
        validate_non_negative(input.advance, "advance")?;
        validate_occupancy(input.adults, input.children)?;
        if input.advance.is_positive() && input.advance_mode.is_none() {
            return Err(
                DomainError::invalid_amount("advance payment requires a payment mode").into(),
            );
        }

        let _guard = self.inner.write_lock.lock().await;
        let mut tx = self.inner.db.begin().await?;

        let room = RoomRepository::fetch_tx(&mut tx, ctx.tenant_id(), &input.room_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Room", &input.room_id))?;
        ctx.ensure_tenant(&room.tenant_id, "Room")?;

        if !room.is_sellable() {
            return Err(DomainError::RoomUnavailable {
                room_id: input.room_id.clone(),
            }
            .into());
        }

        let overlapping = BookingRepository::overlapping_count_tx(
            &mut tx,
            ctx.tenant_id(),
            &input.room_id,
            input.check_in,
            input.check_out,
            None,
        )
        .await?;
        if overlapping > 0 {
            return Err(DomainError::RoomUnavailable {
                room_id: input.room_id.clone(),
            }
            .into());
        }

        if input.advance.is_positive() {
            if let Some(shift_id) = &input.shift_id {
                let shift = ShiftRepository::fetch_tx(&mut tx, ctx.tenant_id(), shift_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Shift", shift_id))?;
                ctx.ensure_tenant(&shift.tenant_id, "Shift")?;
                if !shift.is_open() {
                    return Err(DomainError::ShiftClosed {
                        shift_id: shift_id.clone(),
                    }
                    .into());
                }
            }
        }

        let now = Utc::now();
        let nights = stay_nights(input.check_in, input.check_out);
        let room_charge = input.rate_per_night.multiply_count(nights);
        let slab = self.inner.config.gst.slab_for(input.rate_per_night);
        let gst = self.inner.config.gst.breakdown(room_charge, slab);
        let grand_total = room_charge + gst.total();

        if input.advance > grand_total + self.inner.config.settle_epsilon {
            return Err(DomainError::AmountExceedsBalance {
                amount_paise: input.advance.paise(),
                balance_paise: grand_total.paise(),
            }
            .into());
        }

        let mut booking = Booking {
            id: Uuid::new_v4().to_string(),
            tenant_id: ctx.tenant_id().to_string(),
            guest_id: input.guest_id.clone(),
            room_id: input.room_id.clone(),
            room_type_id: room.room_type_id.clone(),
            check_in: input.check_in,
            check_out: input.check_out,
            checked_in_at: None,
            checked_out_at: None,
            adults: input.adults,
            children: input.children,
            rate_per_night_paise: input.rate_per_night.paise(),
            nights,
            room_charge_paise: room_charge.paise(),
            extra_charges_paise: 0,
            cgst_paise: gst.cgst.paise(),
            sgst_paise: gst.sgst.paise(),
            tax_slab_bps: slab.bps(),
            grand_total_paise: grand_total.paise(),
            paid_paise: 0,
            balance_paise: grand_total.paise(),
            status: BookingStatus::Confirmed,
            source: input.source,
            created_by: ctx.staff_id().to_string(),
            cancel_reason: None,
            created_at: now,
            updated_at: now,
        };

        let advance_txn = if let (true, Some(mode)) = (input.advance.is_positive(), input.advance_mode) {
            booking.paid_paise = input.advance.paise();
            booking.balance_paise = grand_total.paise() - input.advance.paise();
            Some(Transaction {
                id: Uuid::new_v4().to_string(),
                tenant_id: ctx.tenant_id().to_string(),
                booking_id: booking.id.clone(),
                shift_id: input.shift_id.clone(),
                amount_paise: input.advance.paise(),
                mode,
                ledger_type: mode.ledger_type(),
                collected_by: ctx.staff_id().to_string(),
                collected_at: now,
                paid_after_paise: booking.paid_paise,
                balance_after_paise: booking.balance_paise,
            })
        } else {
            None
        };

        debug_assert!(booking.totals_balance());

        BookingRepository::insert_tx(&mut tx, &booking).await?;
        if let Some(txn) = &advance_txn {
            TransactionRepository::insert_tx(&mut tx, txn).await?;
        }
        RoomRepository::set_status_tx(
            &mut tx,
            ctx.tenant_id(),
            &input.room_id,
            RoomStatus::Reserved,
            None,
            now,
        )
        .await?;

        tx.commit().await?;

        info!(
            booking_id = %booking.id,
            room_id = %booking.room_id,
            nights,
            grand_total = %grand_total,
            "Booking confirmed"
        );
        self.inner.audit.record(&DomainEvent::BookingConfirmed {
            after: booking.clone(),
        });
        if let Some(txn) = advance_txn {
            self.inner
                .audit
                .record(&DomainEvent::PaymentCollected { transaction: txn });
        }

        Ok(booking)
    }

    /// Checks a guest in. Allowed only from `confirmed`.
    pub async fn check_in(&self, ctx: &TenantContext, booking_id: &str) -> EngineResult<Booking> {
        ctx.require(Capability::ManageBookings)?;

        let _guard = self.inner.write_lock.lock().await;
        let mut tx = self.inner.db.begin().await?;

        let mut booking = BookingRepository::fetch_tx(&mut tx, ctx.tenant_id(), booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))?;
        ctx.ensure_tenant(&booking.tenant_id, "Booking")?;

        if booking.status != BookingStatus::Confirmed {
            return Err(DomainError::InvalidTransition {
                status: booking.status,
                action: "check in",
            }
            .into());
        }

        let before = booking.clone();
        let now = Utc::now();
        booking.status = BookingStatus::CheckedIn;
        booking.checked_in_at = Some(now);
        booking.updated_at = now;

        BookingRepository::update_tx(&mut tx, &booking).await?;
        RoomRepository::set_status_tx(
            &mut tx,
            ctx.tenant_id(),
            &booking.room_id,
            RoomStatus::Occupied,
            None,
            now,
        )
        .await?;

        tx.commit().await?;

        info!(booking_id = %booking.id, room_id = %booking.room_id, "Guest checked in");
        self.inner.audit.record(&DomainEvent::BookingCheckedIn {
            before,
            after: booking.clone(),
        });

        Ok(booking)
    }

    /// Adds an in-stay charge (room service, laundry, minibar).
    ///
    /// Allowed only while the guest is checked in. Tax does not move here
    /// unless the tenant policy marks extras taxable; either way the grand
    /// total and balance are re-derived so the money invariants hold.
    pub async fn add_extra_charge(
        &self,
        ctx: &TenantContext,
        booking_id: &str,
        amount: Money,
        description: &str,
    ) -> EngineResult<Booking> {
        ctx.require(Capability::ManageBookings)?;
        if !amount.is_positive() {
            return Err(DomainError::invalid_amount("extra charge must be positive").into());
        }

        let _guard = self.inner.write_lock.lock().await;
        let mut tx = self.inner.db.begin().await?;

        let mut booking = BookingRepository::fetch_tx(&mut tx, ctx.tenant_id(), booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))?;
        ctx.ensure_tenant(&booking.tenant_id, "Booking")?;

        if booking.status != BookingStatus::CheckedIn {
            return Err(DomainError::InvalidTransition {
                status: booking.status,
                action: "add extra charge",
            }
            .into());
        }

        let before = booking.clone();
        booking.extra_charges_paise += amount.paise();
        self.apply_totals(&mut booking);
        booking.updated_at = Utc::now();

        BookingRepository::update_tx(&mut tx, &booking).await?;
        tx.commit().await?;

        info!(
            booking_id = %booking.id,
            amount = %amount,
            description,
            "Extra charge added"
        );
        self.inner.audit.record(&DomainEvent::ExtraChargeAdded {
            before,
            after: booking.clone(),
        });

        Ok(booking)
    }

    /// Checks a guest out and finalizes the folio.
    ///
    /// Room charge stays as fixed at creation; accumulated in-stay charges,
    /// the passed-in extras, and the late fee are summed; tax amounts are
    /// re-derived from the slab frozen at creation. The room returns to
    /// `available` flagged for housekeeping.
    ///
    /// ## Errors
    /// - `AlreadySettled` when the booking is already checked out
    /// - `InvalidTransition` from any state other than `checked_in`
    pub async fn check_out(
        &self,
        ctx: &TenantContext,
        booking_id: &str,
        extra_charges: Money,
        late_fee: Money,
    ) -> EngineResult<CheckoutTotals> {
        ctx.require(Capability::ManageBookings)?;
        validate_non_negative(extra_charges, "extra charges")?;
        validate_non_negative(late_fee, "late fee")?;

        let _guard = self.inner.write_lock.lock().await;
        let mut tx = self.inner.db.begin().await?;

        let mut booking = BookingRepository::fetch_tx(&mut tx, ctx.tenant_id(), booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))?;
        ctx.ensure_tenant(&booking.tenant_id, "Booking")?;

        match booking.status {
            BookingStatus::CheckedIn => {}
            BookingStatus::CheckedOut => {
                return Err(DomainError::AlreadySettled {
                    booking_id: booking_id.to_string(),
                }
                .into())
            }
            status => {
                return Err(DomainError::InvalidTransition {
                    status,
                    action: "check out",
                }
                .into())
            }
        }

        let before = booking.clone();
        let now = Utc::now();
        booking.extra_charges_paise += extra_charges.paise() + late_fee.paise();
        self.apply_totals(&mut booking);
        booking.status = BookingStatus::CheckedOut;
        booking.checked_out_at = Some(now);
        booking.updated_at = now;

        debug_assert!(booking.totals_balance());

        BookingRepository::update_tx(&mut tx, &booking).await?;
        RoomRepository::set_status_tx(
            &mut tx,
            ctx.tenant_id(),
            &booking.room_id,
            RoomStatus::Available,
            Some(true),
            now,
        )
        .await?;

        tx.commit().await?;

        let totals = CheckoutTotals {
            booking_id: booking.id.clone(),
            grand_total: booking.grand_total(),
            cgst: Money::from_paise(booking.cgst_paise),
            sgst: Money::from_paise(booking.sgst_paise),
            paid: booking.paid(),
            balance: booking.balance(),
        };

        info!(
            booking_id = %booking.id,
            grand_total = %totals.grand_total,
            balance = %totals.balance,
            "Guest checked out"
        );
        self.inner.audit.record(&DomainEvent::BookingCheckedOut {
            before,
            after: booking,
        });

        Ok(totals)
    }

    /// Cancels a booking. Allowed from `draft` and `confirmed`; releases
    /// the room hold.
    pub async fn cancel(
        &self,
        ctx: &TenantContext,
        booking_id: &str,
        reason: &str,
    ) -> EngineResult<Booking> {
        ctx.require(Capability::ManageBookings)?;

        let _guard = self.inner.write_lock.lock().await;
        let mut tx = self.inner.db.begin().await?;

        let mut booking = BookingRepository::fetch_tx(&mut tx, ctx.tenant_id(), booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))?;
        ctx.ensure_tenant(&booking.tenant_id, "Booking")?;

        if !matches!(
            booking.status,
            BookingStatus::Draft | BookingStatus::Confirmed
        ) {
            return Err(DomainError::InvalidTransition {
                status: booking.status,
                action: "cancel",
            }
            .into());
        }

        let before = booking.clone();
        let now = Utc::now();
        booking.status = BookingStatus::Cancelled;
        booking.cancel_reason = Some(reason.to_string());
        booking.updated_at = now;

        BookingRepository::update_tx(&mut tx, &booking).await?;
        RoomRepository::set_status_tx(
            &mut tx,
            ctx.tenant_id(),
            &booking.room_id,
            RoomStatus::Available,
            None,
            now,
        )
        .await?;

        tx.commit().await?;

        info!(booking_id = %booking.id, reason, "Booking cancelled");
        self.inner.audit.record(&DomainEvent::BookingCancelled {
            before,
            after: booking.clone(),
        });

        Ok(booking)
    }

    /// Fetches a booking within the caller's tenant.
    pub async fn get(&self, ctx: &TenantContext, booking_id: &str) -> EngineResult<Booking> {
        let booking = self
            .inner
            .db
            .bookings()
            .fetch(ctx.tenant_id(), booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))?;
        ctx.ensure_tenant(&booking.tenant_id, "Booking")?;
        Ok(booking)
    }

    /// Lists the tenant's bookings in a given status, newest first.
    pub async fn list_by_status(
        &self,
        ctx: &TenantContext,
        status: BookingStatus,
    ) -> EngineResult<Vec<Booking>> {
        Ok(self
            .inner
            .db
            .bookings()
            .list_by_status(ctx.tenant_id(), status)
            .await?)
    }

    /// Re-derives tax, grand total, and balance from the booking's frozen
    /// slab and current charges.
    fn apply_totals(&self, booking: &mut Booking) {
        let taxable = if self.inner.config.gst.extras_taxable {
            booking.room_charge() + booking.extra_charges()
        } else {
            booking.room_charge()
        };
        let gst = self.inner.config.gst.breakdown(taxable, booking.tax_slab());
        booking.cgst_paise = gst.cgst.paise();
        booking.sgst_paise = gst.sgst.paise();
        booking.grand_total_paise = booking.room_charge_paise
            + booking.extra_charges_paise
            + booking.cgst_paise
            + booking.sgst_paise;
        booking.balance_paise = booking.grand_total_paise - booking.paid_paise;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
