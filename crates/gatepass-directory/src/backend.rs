//! Optional persistence backend seam.
//!
//! The in-memory stores are the source of truth; a backend only mirrors
//! mutations so that records survive a restart. Backend failures are
//! reported, never propagated: the front desk keeps working when the
//! database is down.

#![allow(async_fn_in_trait)]

use thiserror::Error;

use crate::emergency::EmergencyRecord;
use crate::record::VisitRecord;

/// Error surfaced by a persistence backend. Callers only log it.
#[derive(Debug, Error)]
#[error("persistence backend error: {0}")]
pub struct BackendError(String);

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Write-behind mirror for directory mutations.
///
/// Implementations upsert by record id, so replaying the same record is
/// harmless.
pub trait PersistenceBackend: Send + Sync {
    /// Persists the current state of a visit record.
    async fn save_visit(&self, record: &VisitRecord) -> Result<(), BackendError>;

    /// Persists the current state of an emergency record.
    async fn save_emergency(&self, record: &EmergencyRecord) -> Result<(), BackendError>;

    /// Cheap liveness probe, used at startup.
    async fn health_check(&self) -> Result<(), BackendError>;
}

/// Backend that persists nothing. Stands in when the service runs
/// purely in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBackend;

impl PersistenceBackend for NoopBackend {
    async fn save_visit(&self, _record: &VisitRecord) -> Result<(), BackendError> {
        Ok(())
    }

    async fn save_emergency(&self, _record: &EmergencyRecord) -> Result<(), BackendError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        Ok(())
    }
}
