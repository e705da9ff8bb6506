#![allow(async_fn_in_trait)]

use crate::error::{StorageError, StorageResult};
use crate::models::VisitRow;
use gatepass_core::VisitId;
use gatepass_directory::VisitRecord;
use sqlx::SqlitePool;

/// Repository trait for visit record persistence.
///
/// The in-memory store is the source of truth, so writes are upserts:
/// the same record id may be written repeatedly as a visit moves
/// through check-in, edits and check-out.
///
/// # Implementation Note
///
/// This trait uses native async trait methods (Edition 2024 feature),
/// eliminating the need for the async-trait crate while maintaining
/// full async/await support in trait methods.
pub trait VisitRepository: Send + Sync {
    /// Insert or replace the row for this record
    async fn upsert(&self, record: &VisitRecord) -> StorageResult<()>;

    /// Find a visit by id
    async fn find_by_id(&self, id: VisitId) -> StorageResult<VisitRecord>;

    /// All visits, most recent check-in first
    async fn find_all(&self) -> StorageResult<Vec<VisitRecord>>;

    /// Total number of stored visits
    async fn count(&self) -> StorageResult<i64>;
}

/// SQLite implementation of VisitRepository
#[derive(Debug, Clone)]
pub struct SqliteVisitRepository {
    pool: SqlitePool,
}

impl SqliteVisitRepository {
    /// Create a new SQLite visit repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl VisitRepository for SqliteVisitRepository {
    async fn upsert(&self, record: &VisitRecord) -> StorageResult<()> {
        let row = VisitRow::from(record);
        sqlx::query(
            r#"
            INSERT INTO visits (
                id, first_name, last_name, email, phone, company, purpose,
                location, is_vip, security_level, notes, photo,
                aadhaar_id, pan_id, passport_id, driving_license_id,
                check_in_time, check_out_time, status
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                email = excluded.email,
                phone = excluded.phone,
                company = excluded.company,
                purpose = excluded.purpose,
                location = excluded.location,
                is_vip = excluded.is_vip,
                security_level = excluded.security_level,
                notes = excluded.notes,
                photo = excluded.photo,
                aadhaar_id = excluded.aadhaar_id,
                pan_id = excluded.pan_id,
                passport_id = excluded.passport_id,
                driving_license_id = excluded.driving_license_id,
                check_in_time = excluded.check_in_time,
                check_out_time = excluded.check_out_time,
                status = excluded.status
            "#,
        )
        .bind(&row.id)
        .bind(&row.first_name)
        .bind(&row.last_name)
        .bind(&row.email)
        .bind(&row.phone)
        .bind(&row.company)
        .bind(&row.purpose)
        .bind(&row.location)
        .bind(row.is_vip)
        .bind(&row.security_level)
        .bind(&row.notes)
        .bind(&row.photo)
        .bind(&row.aadhaar_id)
        .bind(&row.pan_id)
        .bind(&row.passport_id)
        .bind(&row.driving_license_id)
        .bind(row.check_in_time)
        .bind(row.check_out_time)
        .bind(&row.status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: VisitId) -> StorageResult<VisitRecord> {
        let row = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT id, first_name, last_name, email, phone, company, purpose,
                   location, is_vip, security_level, notes, photo,
                   aadhaar_id, pan_id, passport_id, driving_license_id,
                   check_in_time, check_out_time, status
            FROM visits
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::NotFound {
            entity: "visits",
            id: id.to_string(),
        })?;

        VisitRecord::try_from(row)
    }

    async fn find_all(&self) -> StorageResult<Vec<VisitRecord>> {
        let rows = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT id, first_name, last_name, email, phone, company, purpose,
                   location, is_vip, security_level, notes, photo,
                   aadhaar_id, pan_id, passport_id, driving_license_id,
                   check_in_time, check_out_time, status
            FROM visits
            ORDER BY check_in_time DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(VisitRecord::try_from).collect()
    }

    async fn count(&self) -> StorageResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM visits")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
