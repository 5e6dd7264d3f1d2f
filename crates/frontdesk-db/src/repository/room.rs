//! # Room Repository
//!
//! Database operations for physical rooms.
//!
//! Room status is mutated only through the booking lifecycle (reserve on
//! confirm, occupy on check-in, release on checkout/cancel) and by the
//! housekeeping collaborator.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use frontdesk_core::{Room, RoomStatus};

/// Repository for room database operations.
#[derive(Debug, Clone)]
pub struct RoomRepository {
    pool: SqlitePool,
}

impl RoomRepository {
    /// Creates a new RoomRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RoomRepository { pool }
    }

    /// Inserts a room (inventory setup).
    pub async fn insert(&self, room: &Room) -> DbResult<()> {
        debug!(id = %room.id, room_number = %room.room_number, "Inserting room");

        sqlx::query(
            r#"
            INSERT INTO rooms (
                id, tenant_id, room_number, room_type_id,
                status, needs_housekeeping, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&room.id)
        .bind(&room.tenant_id)
        .bind(&room.room_number)
        .bind(&room.room_type_id)
        .bind(room.status)
        .bind(room.needs_housekeeping)
        .bind(room.created_at)
        .bind(room.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a room by id within a tenant.
    pub async fn fetch(&self, tenant_id: &str, id: &str) -> DbResult<Option<Room>> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            SELECT id, tenant_id, room_number, room_type_id,
                   status, needs_housekeeping, created_at, updated_at
            FROM rooms
            WHERE tenant_id = ?1 AND id = ?2
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// Lists all rooms for a tenant, ordered by room number.
    pub async fn list(&self, tenant_id: &str) -> DbResult<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>(
            r#"
            SELECT id, tenant_id, room_number, room_type_id,
                   status, needs_housekeeping, created_at, updated_at
            FROM rooms
            WHERE tenant_id = ?1
            ORDER BY room_number
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    /// Transactional variant of [`RoomRepository::fetch`].
    pub async fn fetch_tx(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        id: &str,
    ) -> DbResult<Option<Room>> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            SELECT id, tenant_id, room_number, room_type_id,
                   status, needs_housekeeping, created_at, updated_at
            FROM rooms
            WHERE tenant_id = ?1 AND id = ?2
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(room)
    }

    /// Updates the physical status of a room inside a transaction.
    ///
    /// ## Arguments
    /// * `needs_housekeeping` - `Some` to set the flag, `None` to leave it
    pub async fn set_status_tx(
        conn: &mut SqliteConnection,
        tenant_id: &str,
        id: &str,
        status: RoomStatus,
        needs_housekeeping: Option<bool>,
        updated_at: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(id = %id, status = ?status, "Updating room status");

        let result = sqlx::query(
            r#"
            UPDATE rooms SET
                status = ?3,
                needs_housekeeping = COALESCE(?4, needs_housekeeping),
                updated_at = ?5
            WHERE tenant_id = ?1 AND id = ?2
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(status)
        .bind(needs_housekeeping)
        .bind(updated_at)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Room", id));
        }

        Ok(())
    }
}
