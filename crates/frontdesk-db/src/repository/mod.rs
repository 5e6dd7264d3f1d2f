//! # Repository Module
//!
//! Database repository implementations for the front-desk engine.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Engine service                                                         │
//! │       │                                                                 │
//! │       │  db.bookings().fetch(tenant, id)          (pool reads)          │
//! │       │  BookingRepository::insert_tx(&mut tx, b) (inside a txn)        │
//! │       ▼                                                                 │
//! │  Repository ── SQL ──► SQLite                                           │
//! │                                                                         │
//! │  Every query filters by tenant_id. Mutations that belong to a          │
//! │  read-then-write unit are associated functions over a connection, so   │
//! │  the engine can compose several of them inside one transaction.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`room::RoomRepository`] - Room inventory and physical status
//! - [`booking::BookingRepository`] - Booking rows and the overlap query
//! - [`transaction::TransactionRepository`] - Append-only payment records
//! - [`shift::ShiftRepository`] - Cash shifts and the petty-cash ledger

pub mod booking;
pub mod room;
pub mod shift;
pub mod transaction;
