//! # Cash Shift Ledger
//!
//! Owns the per-staff shift lifecycle and the petty-cash ledger.
//!
//! ## Shift Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   none ──► OPEN ──► CLOSED            (CLOSED is terminal per shift;    │
//! │                                        a new shift starts fresh)        │
//! │                                                                         │
//! │   start_shift()       → one open shift per staff member, ever           │
//! │   add_ledger_entry()  → petty cash against the OPEN shift only          │
//! │   end_shift()         → expected cash computed, variance recorded       │
//! │                                                                         │
//! │   expected = opening + cash collections + additions − expenses          │
//! │   variance = counted closing cash − expected                            │
//! │                                                                         │
//! │   The variance is recorded for reconciliation, never corrected.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only `cash_drawer` collections count toward expected cash: electronic
//! and OTA settlements never pass through the physical drawer.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use frontdesk_core::validation::validate_non_negative;
use frontdesk_core::{
    Capability, CashLedgerEntry, DomainError, DomainEvent, LedgerEntryType, Money, Shift,
    ShiftStatus, TenantContext,
};
use frontdesk_db::{ShiftRepository, TransactionRepository};

use crate::error::EngineResult;
use crate::EngineInner;

/// The cash shift ledger.
#[derive(Clone)]
pub struct ShiftService {
    inner: Arc<EngineInner>,
}

impl ShiftService {
    pub(crate) fn new(inner: Arc<EngineInner>) -> Self {
        ShiftService { inner }
    }

    /// Opens a shift for the calling staff member.
    ///
    /// The no-open-shift check and the insert share one transaction; a
    /// partial unique index backstops the race at the storage layer.
    ///
    /// ## Errors
    /// - `ShiftAlreadyOpen` when the staff member already has an open shift
    /// - `InvalidAmount` on negative opening cash
    pub async fn start_shift(&self, ctx: &TenantContext, opening_cash: Money) -> EngineResult<Shift> {
        ctx.require(Capability::ManageShifts)?;
        validate_non_negative(opening_cash, "opening cash")?;

        let _guard = self.inner.write_lock.lock().await;
        let mut tx = self.inner.db.begin().await?;

        if ShiftRepository::open_for_staff_tx(&mut tx, ctx.tenant_id(), ctx.staff_id())
            .await?
            .is_some()
        {
            return Err(DomainError::ShiftAlreadyOpen {
                staff_id: ctx.staff_id().to_string(),
            }
            .into());
        }

        let shift = Shift {
            id: Uuid::new_v4().to_string(),
            tenant_id: ctx.tenant_id().to_string(),
            staff_id: ctx.staff_id().to_string(),
            started_at: Utc::now(),
            ended_at: None,
            opening_cash_paise: opening_cash.paise(),
            closing_cash_paise: None,
            expected_cash_paise: None,
            variance_paise: None,
            handover_to: None,
            notes: None,
            status: ShiftStatus::Open,
        };

        ShiftRepository::insert_tx(&mut tx, &shift).await?;
        tx.commit().await?;

        info!(
            shift_id = %shift.id,
            staff_id = %shift.staff_id,
            opening_cash = %opening_cash,
            "Shift opened"
        );
        self.inner.audit.record(&DomainEvent::ShiftOpened {
            after: shift.clone(),
        });

        Ok(shift)
    }

    /// Records a petty-cash movement against an open shift.
    ///
    /// ## Errors
    /// - `ShiftClosed` when the shift is no longer open
    /// - `InvalidAmount` on a non-positive amount
    pub async fn add_ledger_entry(
        &self,
        ctx: &TenantContext,
        shift_id: &str,
        entry_type: LedgerEntryType,
        amount: Money,
        category: &str,
        description: Option<String>,
    ) -> EngineResult<CashLedgerEntry> {
        ctx.require(Capability::ManageShifts)?;
        if !amount.is_positive() {
            return Err(DomainError::invalid_amount("ledger entry amount must be positive").into());
        }

        let _guard = self.inner.write_lock.lock().await;
        let mut tx = self.inner.db.begin().await?;

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

        let entry = CashLedgerEntry {
            id: Uuid::new_v4().to_string(),
            tenant_id: ctx.tenant_id().to_string(),
            shift_id: shift_id.to_string(),
            entry_type,
            amount_paise: amount.paise(),
            category: category.to_string(),
            description,
            created_at: Utc::now(),
        };

        ShiftRepository::ledger_insert_tx(&mut tx, &entry).await?;
        tx.commit().await?;

        info!(
            shift_id = %shift_id,
            entry_type = ?entry_type,
            amount = %amount,
            category,
            "Cash ledger entry recorded"
        );

        Ok(entry)
    }

    /// Computes the system-expected drawer cash for a shift:
    /// `opening + Σ cash collections + Σ additions − Σ expenses`.
    ///
    /// Order-independent: the same set of collections and ledger entries
    /// yields the same total however they were recorded.
    pub async fn expected_cash(&self, ctx: &TenantContext, shift_id: &str) -> EngineResult<Money> {
        let mut conn = self.inner.db.pool().acquire().await?;

        let shift = ShiftRepository::fetch_tx(&mut conn, ctx.tenant_id(), shift_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Shift", shift_id))?;
        ctx.ensure_tenant(&shift.tenant_id, "Shift")?;

        Self::expected_cash_within(&mut conn, &shift).await
    }

    /// Closes a shift: computes expected cash, records the variance, and
    /// seals every field.
    ///
    /// ## Errors
    /// - `ShiftNotOpen` when the shift is already closed (double close is
    ///   first-writer-wins; the loser sees this error)
    /// - `ShiftHandoverLoop` when the drawer is handed to the closing
    ///   staff member themselves
    /// - `InvalidAmount` on negative closing cash
    pub async fn end_shift(
        &self,
        ctx: &TenantContext,
        shift_id: &str,
        closing_cash: Money,
        handover_to: Option<String>,
        notes: Option<String>,
    ) -> EngineResult<Shift> {
        ctx.require(Capability::ManageShifts)?;
        validate_non_negative(closing_cash, "closing cash")?;

        let _guard = self.inner.write_lock.lock().await;
        let mut tx = self.inner.db.begin().await?;

        let shift = ShiftRepository::fetch_tx(&mut tx, ctx.tenant_id(), shift_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Shift", shift_id))?;
        ctx.ensure_tenant(&shift.tenant_id, "Shift")?;

        if !shift.is_open() {
            return Err(DomainError::ShiftNotOpen {
                shift_id: shift_id.to_string(),
            }
            .into());
        }
        if handover_to.as_deref() == Some(shift.staff_id.as_str()) {
            return Err(DomainError::ShiftHandoverLoop {
                staff_id: shift.staff_id.clone(),
            }
            .into());
        }

        let expected = Self::expected_cash_within(&mut tx, &shift).await?;
        let variance = closing_cash - expected;

        let before = shift.clone();
        let mut closed = shift;
        closed.ended_at = Some(Utc::now());
        closed.closing_cash_paise = Some(closing_cash.paise());
        closed.expected_cash_paise = Some(expected.paise());
        closed.variance_paise = Some(variance.paise());
        closed.handover_to = handover_to;
        closed.notes = notes;
        closed.status = ShiftStatus::Closed;

        if !ShiftRepository::close_tx(&mut tx, &closed).await? {
            return Err(DomainError::ShiftNotOpen {
                shift_id: shift_id.to_string(),
            }
            .into());
        }
        tx.commit().await?;

        info!(
            shift_id = %closed.id,
            staff_id = %closed.staff_id,
            expected = %expected,
            closing = %closing_cash,
            variance = %variance,
            "Shift closed"
        );
        self.inner.audit.record(&DomainEvent::ShiftClosed {
            before,
            after: closed.clone(),
        });

        Ok(closed)
    }

    /// The calling staff member's open shift, if any.
    ///
    /// The session collaborator uses this as the logout guard: staff with
    /// an open shift are blocked from ending their session.
    pub async fn current_shift(&self, ctx: &TenantContext) -> EngineResult<Option<Shift>> {
        Ok(self
            .inner
            .db
            .shifts()
            .open_for_staff(ctx.tenant_id(), ctx.staff_id())
            .await?)
    }

    /// Lists the petty-cash entries recorded against a shift.
    pub async fn ledger_entries(
        &self,
        ctx: &TenantContext,
        shift_id: &str,
    ) -> EngineResult<Vec<CashLedgerEntry>> {
        Ok(self
            .inner
            .db
            .shifts()
            .ledger_entries(ctx.tenant_id(), shift_id)
            .await?)
    }

    /// The expected-cash formula against one connection (shared by the
    /// standalone read and the close path so both see identical numbers).
    async fn expected_cash_within(
        conn: &mut sqlx::SqliteConnection,
        shift: &Shift,
    ) -> EngineResult<Money> {
        let cash_collected = TransactionRepository::cash_total_for_shift_tx(
            conn,
            &shift.tenant_id,
            &shift.id,
            &shift.staff_id,
            shift.started_at,
        )
        .await?;
        let (additions, expenses) =
            ShiftRepository::ledger_totals_tx(conn, &shift.tenant_id, &shift.id).await?;

        Ok(Money::from_paise(
            shift.opening_cash_paise + cash_collected + additions - expenses,
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::NewBooking;
    use crate::error::EngineError;
    use crate::testutil::{ctx, date, front_desk, seed_room, STAFF, TENANT};
    use crate::FrontDesk;
    use frontdesk_core::{BookingSource, PaymentMode};

    fn assert_domain(err: EngineError, check: impl FnOnce(&DomainError) -> bool) {
        match &err {
            EngineError::Domain(domain) => assert!(check(domain), "unexpected error: {domain:?}"),
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    /// Books a room with no advance and returns the booking id.
    async fn seed_booking(desk: &FrontDesk) -> String {
        let room = seed_room(desk, "101").await;
        let booking = desk
            .bookings()
            .create(
                &ctx(),
                NewBooking {
                    guest_id: "guest-1".to_string(),
                    room_id: room.id,
                    check_in: date(2026, 1, 10),
                    check_out: date(2026, 1, 11),
                    rate_per_night: Money::from_rupees(2000, 0),
                    adults: 2,
                    children: 0,
                    advance: Money::zero(),
                    advance_mode: None,
                    shift_id: None,
                    source: BookingSource::WalkIn,
                },
            )
            .await
            .unwrap();
        booking.id
    }

    #[tokio::test]
    async fn test_expected_cash_formula() {
        let desk = front_desk().await;
        let booking_id = seed_booking(&desk).await;

        // opening 1000, expense 150, addition 50, cash collection 500
        let shift = desk
            .shifts()
            .start_shift(&ctx(), Money::from_rupees(1000, 0))
            .await
            .unwrap();
        desk.shifts()
            .add_ledger_entry(
                &ctx(),
                &shift.id,
                LedgerEntryType::Expense,
                Money::from_rupees(150, 0),
                "supplies",
                None,
            )
            .await
            .unwrap();
        desk.shifts()
            .add_ledger_entry(
                &ctx(),
                &shift.id,
                LedgerEntryType::Addition,
                Money::from_rupees(50, 0),
                "change float",
                None,
            )
            .await
            .unwrap();
        desk.settlement()
            .collect_payment(
                &ctx(),
                &booking_id,
                Money::from_rupees(500, 0),
                PaymentMode::Cash,
                Some(&shift.id),
            )
            .await
            .unwrap();

        let expected = desk.shifts().expected_cash(&ctx(), &shift.id).await.unwrap();
        assert_eq!(expected, Money::from_rupees(1400, 0));
    }

    #[tokio::test]
    async fn test_expected_cash_is_order_independent() {
        // Same collections and entries, two different recording orders
        let mut results = Vec::new();
        for steps in [
            ["expense", "addition", "payment"],
            ["payment", "addition", "expense"],
        ] {
            let desk = front_desk().await;
            let booking_id = seed_booking(&desk).await;
            let shift = desk
                .shifts()
                .start_shift(&ctx(), Money::from_rupees(1000, 0))
                .await
                .unwrap();

            for step in steps {
                match step {
                    "expense" => {
                        desk.shifts()
                            .add_ledger_entry(
                                &ctx(),
                                &shift.id,
                                LedgerEntryType::Expense,
                                Money::from_rupees(150, 0),
                                "supplies",
                                None,
                            )
                            .await
                            .unwrap();
                    }
                    "addition" => {
                        desk.shifts()
                            .add_ledger_entry(
                                &ctx(),
                                &shift.id,
                                LedgerEntryType::Addition,
                                Money::from_rupees(50, 0),
                                "change float",
                                None,
                            )
                            .await
                            .unwrap();
                    }
                    _ => {
                        desk.settlement()
                            .collect_payment(
                                &ctx(),
                                &booking_id,
                                Money::from_rupees(500, 0),
                                PaymentMode::Cash,
                                Some(&shift.id),
                            )
                            .await
                            .unwrap();
                    }
                }
            }

            results.push(desk.shifts().expected_cash(&ctx(), &shift.id).await.unwrap());
        }
        assert_eq!(results[0], results[1]);
        assert_eq!(results[0], Money::from_rupees(1400, 0));
    }

    #[tokio::test]
    async fn test_second_open_shift_rejected() {
        let desk = front_desk().await;
        desk.shifts()
            .start_shift(&ctx(), Money::from_rupees(1000, 0))
            .await
            .unwrap();

        assert_domain(
            desk.shifts()
                .start_shift(&ctx(), Money::from_rupees(500, 0))
                .await
                .unwrap_err(),
            |e| matches!(e, DomainError::ShiftAlreadyOpen { .. }),
        );
    }

    #[tokio::test]
    async fn test_close_records_variance_and_seals_shift() {
        let desk = front_desk().await;
        let shift = desk
            .shifts()
            .start_shift(&ctx(), Money::from_rupees(1000, 0))
            .await
            .unwrap();

        // Drawer counted 50 short of the expected 1000
        let closed = desk
            .shifts()
            .end_shift(
                &ctx(),
                &shift.id,
                Money::from_rupees(950, 0),
                Some("staff-2".to_string()),
                Some("evening handover".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(closed.status, ShiftStatus::Closed);
        assert_eq!(closed.expected_cash_paise, Some(100000));
        assert_eq!(closed.closing_cash_paise, Some(95000));
        assert_eq!(closed.variance_paise, Some(-5000));
        assert_eq!(closed.handover_to.as_deref(), Some("staff-2"));
        assert!(closed.ended_at.is_some());

        // Double close reports the shift as no longer open
        assert_domain(
            desk.shifts()
                .end_shift(&ctx(), &shift.id, Money::from_rupees(950, 0), None, None)
                .await
                .unwrap_err(),
            |e| matches!(e, DomainError::ShiftNotOpen { .. }),
        );

        // A fresh shift can open once the old one is closed
        assert!(desk
            .shifts()
            .start_shift(&ctx(), Money::from_rupees(950, 0))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_ledger_entry_rejected_on_closed_shift() {
        let desk = front_desk().await;
        let shift = desk
            .shifts()
            .start_shift(&ctx(), Money::from_rupees(1000, 0))
            .await
            .unwrap();
        desk.shifts()
            .end_shift(&ctx(), &shift.id, Money::from_rupees(1000, 0), None, None)
            .await
            .unwrap();

        assert_domain(
            desk.shifts()
                .add_ledger_entry(
                    &ctx(),
                    &shift.id,
                    LedgerEntryType::Expense,
                    Money::from_rupees(10, 0),
                    "supplies",
                    None,
                )
                .await
                .unwrap_err(),
            |e| matches!(e, DomainError::ShiftClosed { .. }),
        );
    }

    #[tokio::test]
    async fn test_self_handover_rejected() {
        let desk = front_desk().await;
        let shift = desk
            .shifts()
            .start_shift(&ctx(), Money::from_rupees(1000, 0))
            .await
            .unwrap();

        assert_domain(
            desk.shifts()
                .end_shift(
                    &ctx(),
                    &shift.id,
                    Money::from_rupees(1000, 0),
                    Some(STAFF.to_string()),
                    None,
                )
                .await
                .unwrap_err(),
            |e| matches!(e, DomainError::ShiftHandoverLoop { .. }),
        );

        // The failed close left the shift open
        assert!(desk.shifts().current_shift(&ctx()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_logout_guard_current_shift() {
        let desk = front_desk().await;
        assert!(desk.shifts().current_shift(&ctx()).await.unwrap().is_none());

        let shift = desk
            .shifts()
            .start_shift(&ctx(), Money::from_rupees(1000, 0))
            .await
            .unwrap();
        let current = desk.shifts().current_shift(&ctx()).await.unwrap().unwrap();
        assert_eq!(current.id, shift.id);

        desk.shifts()
            .end_shift(&ctx(), &shift.id, Money::from_rupees(1000, 0), None, None)
            .await
            .unwrap();
        assert!(desk.shifts().current_shift(&ctx()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_amounts_rejected() {
        let desk = front_desk().await;

        assert_domain(
            desk.shifts()
                .start_shift(&ctx(), Money::from_paise(-1))
                .await
                .unwrap_err(),
            |e| matches!(e, DomainError::InvalidAmount { .. }),
        );

        let shift = desk
            .shifts()
            .start_shift(&ctx(), Money::from_rupees(1000, 0))
            .await
            .unwrap();
        assert_domain(
            desk.shifts()
                .add_ledger_entry(
                    &ctx(),
                    &shift.id,
                    LedgerEntryType::Expense,
                    Money::zero(),
                    "supplies",
                    None,
                )
                .await
                .unwrap_err(),
            |e| matches!(e, DomainError::InvalidAmount { .. }),
        );
    }

    #[tokio::test]
    async fn test_shift_requires_capability() {
        let desk = front_desk().await;
        let no_caps = frontdesk_core::TenantContext::new(TENANT, STAFF, []);

        assert_domain(
            desk.shifts()
                .start_shift(&no_caps, Money::from_rupees(1000, 0))
                .await
                .unwrap_err(),
            |e| matches!(e, DomainError::Forbidden { .. }),
        );
    }
}
