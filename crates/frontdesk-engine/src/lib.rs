//! # frontdesk-engine: Booking Lifecycle & Cash Settlement Services
//!
//! The services the request layer calls. Everything here follows the same
//! operation shape:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Capability check on the explicit TenantContext                      │
//! │  2. Input validation (pure, frontdesk-core)                             │
//! │  3. One database transaction for the whole read-then-write unit         │
//! │     (availability check + insert, open-shift check + insert,            │
//! │      expected-cash compute + close, balance check + payment append)     │
//! │  4. Commit, then audit event with before/after snapshots                │
//! │                                                                         │
//! │  An operation either fully commits or fully rolls back; partial        │
//! │  state (booking checked in but room not locked) is never observable.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Services
//!
//! - [`booking::BookingService`] - the booking state machine
//! - [`shift::ShiftService`] - the cash shift ledger
//! - [`settlement::SettlementService`] - payment collection and checkout
//!
//! ## Concurrency
//!
//! Operations are request-per-invocation; there are no background tasks.
//! Read-then-write units take the engine's write lock before opening their
//! transaction, which serializes conflicting writers in-process (two
//! creates racing for the same room, two closes of one shift, two payments
//! against one booking). SQLite's single-writer model plus the busy
//! timeout covers the storage side.

use std::sync::Arc;

use tokio::sync::Mutex;

use frontdesk_core::{AuditSink, GstPolicy, Money, SETTLE_EPSILON_PAISE};
use frontdesk_db::Database;

// =============================================================================
// Module Declarations
// =============================================================================

pub mod audit;
pub mod booking;
pub mod error;
pub mod settlement;
pub mod shift;

// =============================================================================
// Re-exports
// =============================================================================

pub use audit::TracingAuditSink;
pub use booking::{BookingService, CheckoutTotals, NewBooking};
pub use error::{EngineError, EngineResult};
pub use settlement::{Invoice, SettlementPayment, SettlementService};
pub use shift::ShiftService;

// =============================================================================
// Engine Configuration
// =============================================================================

/// Tenant-level policy knobs for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// GST slabs, threshold, and the extras-taxation flag.
    pub gst: GstPolicy,

    /// Tolerance absorbed when a settlement overshoots the balance,
    /// so a rounded-up cash handover does not bounce at the desk.
    pub settle_epsilon: Money,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            gst: GstPolicy::default(),
            settle_epsilon: Money::from_paise(SETTLE_EPSILON_PAISE),
        }
    }
}

// =============================================================================
// Front Desk (service factory)
// =============================================================================

/// Shared state behind every service handle.
pub(crate) struct EngineInner {
    pub(crate) db: Database,
    pub(crate) config: EngineConfig,
    pub(crate) audit: Arc<dyn AuditSink>,
    /// Serializes read-then-write units across services.
    pub(crate) write_lock: Mutex<()>,
}

/// Entry point for the engine: owns the shared state and hands out
/// service handles, the way the database handle hands out repositories.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("frontdesk.db")).await?;
/// let desk = FrontDesk::new(db);
///
/// let booking = desk.bookings().create(&ctx, new_booking).await?;
/// let invoice = desk.settlement().checkout(&ctx, &booking.id, extras, late_fee, payment).await?;
/// ```
#[derive(Clone)]
pub struct FrontDesk {
    inner: Arc<EngineInner>,
}

impl FrontDesk {
    /// Builds an engine with default policy and the tracing audit sink.
    pub fn new(db: Database) -> Self {
        FrontDesk::with(db, EngineConfig::default(), Arc::new(TracingAuditSink))
    }

    /// Builds an engine with explicit policy and audit sink.
    pub fn with(db: Database, config: EngineConfig, audit: Arc<dyn AuditSink>) -> Self {
        FrontDesk {
            inner: Arc::new(EngineInner {
                db,
                config,
                audit,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Returns the booking state machine.
    pub fn bookings(&self) -> BookingService {
        BookingService::new(Arc::clone(&self.inner))
    }

    /// Returns the cash shift ledger.
    pub fn shifts(&self) -> ShiftService {
        ShiftService::new(Arc::clone(&self.inner))
    }

    /// Returns the settlement coordinator.
    pub fn settlement(&self) -> SettlementService {
        SettlementService::new(Arc::clone(&self.inner))
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.inner.db
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================
