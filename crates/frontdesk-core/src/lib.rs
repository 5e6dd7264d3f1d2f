//! # frontdesk-core: Pure Business Logic for the Front-Desk Engine
//!
//! This crate is the **heart** of the front desk. It contains all business
//! logic as pure functions and types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Front Desk Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Request Layer (web/API, external)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    frontdesk-engine                             │   │
//! │  │    BookingService · ShiftService · SettlementService            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ frontdesk-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌──────────────┐  ┌──────────┐ │   │
//! │  │   │   types   │  │   money   │  │ availability │  │   tax    │ │   │
//! │  │   │  Booking  │  │   Money   │  │   overlap    │  │ GstPolicy│ │   │
//! │  │   │   Shift   │  │  split    │  │    rules     │  │  slabs   │ │   │
//! │  │   └───────────┘  └───────────┘  └──────────────┘  └──────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 frontdesk-db (Database Layer)                   │   │
//! │  │            SQLite queries, migrations, repositories             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Room, Booking, Transaction, Shift, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`tax`] - GST slab selection and CGST/SGST splitting
//! - [`availability`] - Stay-date overlap rules
//! - [`validation`] - Input validation
//! - [`context`] - Explicit tenant/caller context and capabilities
//! - [`events`] - Domain events for the audit collaborator
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//! 5. **Explicit Context**: Tenant and caller identity are parameters, never globals

// =============================================================================
// Module Declarations
// =============================================================================

pub mod availability;
pub mod context;
pub mod error;
pub mod events;
pub mod money;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use frontdesk_core::Money` instead of
// `use frontdesk_core::money::Money`

pub use context::{Capability, TenantContext};
pub use error::{DomainError, DomainResult};
pub use events::{AuditSink, DomainEvent, NullAuditSink};
pub use money::Money;
pub use tax::{GstBreakdown, GstPolicy};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tolerance absorbed when a settlement overshoots the balance.
///
/// Collections beyond `balance + SETTLE_EPSILON_PAISE` are rejected;
/// anything inside the window is accepted so a rounded-up cash handover
/// does not bounce at the desk. 100 paise = ₹1.00.
pub const SETTLE_EPSILON_PAISE: i64 = 100;
