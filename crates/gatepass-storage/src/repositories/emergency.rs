#![allow(async_fn_in_trait)]

use crate::error::{StorageError, StorageResult};
use crate::models::EmergencyRow;
use gatepass_core::EmergencyId;
use gatepass_directory::EmergencyRecord;
use sqlx::SqlitePool;

/// Repository trait for emergency incident persistence.
///
/// Incidents are append-only in the domain; the upsert still replaces
/// the whole row so that status transitions are mirrored.
pub trait EmergencyRepository: Send + Sync {
    /// Insert or replace the row for this incident
    async fn upsert(&self, record: &EmergencyRecord) -> StorageResult<()>;

    /// Find an incident by id
    async fn find_by_id(&self, id: EmergencyId) -> StorageResult<EmergencyRecord>;

    /// All incidents, most recently reported first
    async fn find_all(&self) -> StorageResult<Vec<EmergencyRecord>>;

    /// Number of incidents still active
    async fn count_active(&self) -> StorageResult<i64>;
}

/// SQLite implementation of EmergencyRepository
#[derive(Debug, Clone)]
pub struct SqliteEmergencyRepository {
    pool: SqlitePool,
}

impl SqliteEmergencyRepository {
    /// Create a new SQLite emergency repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl EmergencyRepository for SqliteEmergencyRepository {
    async fn upsert(&self, record: &EmergencyRecord) -> StorageResult<()> {
        let row = EmergencyRow::try_from(record)?;
        sqlx::query(
            r#"
            INSERT INTO emergencies (
                id, incident_code, emergency_type, severity, status,
                details, description, location, reported_by,
                reported_at, resolved_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                status = excluded.status,
                details = excluded.details,
                description = excluded.description,
                location = excluded.location,
                resolved_at = excluded.resolved_at
            "#,
        )
        .bind(&row.id)
        .bind(&row.incident_code)
        .bind(&row.emergency_type)
        .bind(&row.severity)
        .bind(&row.status)
        .bind(&row.details)
        .bind(&row.description)
        .bind(&row.location)
        .bind(&row.reported_by)
        .bind(row.reported_at)
        .bind(row.resolved_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: EmergencyId) -> StorageResult<EmergencyRecord> {
        let row = sqlx::query_as::<_, EmergencyRow>(
            r#"
            SELECT id, incident_code, emergency_type, severity, status,
                   details, description, location, reported_by,
                   reported_at, resolved_at
            FROM emergencies
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::NotFound {
            entity: "emergencies",
            id: id.to_string(),
        })?;

        EmergencyRecord::try_from(row)
    }

    async fn find_all(&self) -> StorageResult<Vec<EmergencyRecord>> {
        let rows = sqlx::query_as::<_, EmergencyRow>(
            r#"
            SELECT id, incident_code, emergency_type, severity, status,
                   details, description, location, reported_by,
                   reported_at, resolved_at
            FROM emergencies
            ORDER BY reported_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(EmergencyRecord::try_from).collect()
    }

    async fn count_active(&self) -> StorageResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM emergencies WHERE status = 'Active'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
