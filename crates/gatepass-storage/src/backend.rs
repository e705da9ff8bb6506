//! [`PersistenceBackend`] implementation over SQLite.

use gatepass_directory::{BackendError, EmergencyRecord, PersistenceBackend, VisitRecord};

use crate::connection::Database;
use crate::repositories::{
    EmergencyRepository, SqliteEmergencyRepository, SqliteVisitRepository, VisitRepository,
};

/// SQLite mirror for the in-memory directory.
///
/// Holds its own repositories over one shared pool. All writes are
/// upserts keyed by record id, so the directory can replay a record at
/// any point in its lifecycle.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    db: Database,
    visits: SqliteVisitRepository,
    emergencies: SqliteEmergencyRepository,
}

impl SqliteBackend {
    pub fn new(db: Database) -> Self {
        let visits = SqliteVisitRepository::new(db.pool().clone());
        let emergencies = SqliteEmergencyRepository::new(db.pool().clone());
        Self {
            db,
            visits,
            emergencies,
        }
    }

    /// Direct access to the visit repository, for rehydration at startup.
    pub fn visits(&self) -> &SqliteVisitRepository {
        &self.visits
    }

    /// Direct access to the emergency repository.
    pub fn emergencies(&self) -> &SqliteEmergencyRepository {
        &self.emergencies
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl PersistenceBackend for SqliteBackend {
    async fn save_visit(&self, record: &VisitRecord) -> Result<(), BackendError> {
        self.visits
            .upsert(record)
            .await
            .map_err(|e| BackendError::new(e.to_string()))
    }

    async fn save_emergency(&self, record: &EmergencyRecord) -> Result<(), BackendError> {
        self.emergencies
            .upsert(record)
            .await
            .map_err(|e| BackendError::new(e.to_string()))
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        self.db
            .health_check()
            .await
            .map_err(|e| BackendError::new(e.to_string()))
    }
}
