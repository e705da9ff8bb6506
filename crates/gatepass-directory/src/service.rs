//! The directory facade.
//!
//! [`DirectoryService`] owns the visit store and the emergency log, runs
//! the duplicate-open-visit gate on check-in, and mirrors every mutation
//! to the persistence backend. The in-memory state is the source of
//! truth; a failing backend is logged and otherwise ignored.

use std::sync::Arc;

use chrono::NaiveDate;
use gatepass_core::{EmergencyId, Error, Result, VisitId};

use crate::backend::{NoopBackend, PersistenceBackend};
use crate::clock::{Clock, SystemClock};
use crate::emergency::{
    EmergencyFilter, EmergencyLog, EmergencyRecord, EmergencyStats, NewEmergency,
};
use crate::record::{NewVisit, VisitPatch, VisitRecord};
use crate::search::{self, ReturningLookup};
use crate::stats::{self, DashboardSnapshot};
use crate::store::{VisitFilter, VisitorStore};

/// Front-desk service over the in-memory directory.
#[derive(Debug)]
pub struct DirectoryService<B: PersistenceBackend = NoopBackend> {
    visits: VisitorStore,
    emergencies: EmergencyLog,
    backend: Option<B>,
    clock: Arc<dyn Clock>,
}

impl DirectoryService<NoopBackend> {
    /// Purely in-memory service; nothing survives a restart.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::in_memory_with_clock(Arc::new(SystemClock))
    }

    #[must_use]
    pub fn in_memory_with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            visits: VisitorStore::with_clock(Arc::clone(&clock)),
            emergencies: EmergencyLog::with_clock(Arc::clone(&clock)),
            backend: None,
            clock,
        }
    }
}

impl<B: PersistenceBackend> DirectoryService<B> {
    /// Service that mirrors mutations to `backend` on a best-effort
    /// basis.
    #[must_use]
    pub fn with_backend(backend: B) -> Self {
        Self::with_backend_and_clock(backend, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_backend_and_clock(backend: B, clock: Arc<dyn Clock>) -> Self {
        Self {
            visits: VisitorStore::with_clock(Arc::clone(&clock)),
            emergencies: EmergencyLog::with_clock(Arc::clone(&clock)),
            backend: Some(backend),
            clock,
        }
    }

    /// Whether the configured backend answers its liveness probe. A
    /// service without a backend is trivially healthy.
    pub async fn backend_healthy(&self) -> bool {
        match &self.backend {
            Some(backend) => match backend.health_check().await {
                Ok(()) => true,
                Err(error) => {
                    tracing::warn!(%error, "persistence backend health check failed");
                    false
                }
            },
            None => true,
        }
    }

    // ------------------------------------------------------------------
    // Visits
    // ------------------------------------------------------------------

    /// Checks a visitor in.
    ///
    /// Before creating the record, every identifier on the form (phone
    /// and identity documents) is checked against open visits; if one
    /// matches, the check-in is refused. The gate and the create run
    /// under the same borrow of the store, so no other mutation can
    /// interleave.
    ///
    /// # Errors
    /// `Error::DuplicateOpenVisit` when a matching visitor is still on
    /// site, plus everything [`VisitorStore::create`] returns.
    pub async fn check_in(&mut self, input: NewVisit) -> Result<VisitRecord> {
        for identifier in [
            Some(input.phone.as_str()),
            input.aadhaar_id.as_deref(),
            input.pan_id.as_deref(),
            input.passport_id.as_deref(),
        ]
        .into_iter()
        .flatten()
        {
            if let ReturningLookup::AlreadyCheckedIn(open) =
                search::returning_lookup(&self.visits, identifier)
            {
                return Err(Error::DuplicateOpenVisit {
                    id: open.id.to_string(),
                });
            }
        }

        let record = self.visits.create(input)?;
        self.mirror_visit(&record).await;
        Ok(record)
    }

    /// Edits a visit inside its one-hour window.
    ///
    /// # Errors
    /// See [`VisitorStore::update`].
    pub async fn update_visit(&mut self, id: VisitId, patch: &VisitPatch) -> Result<VisitRecord> {
        let record = self.visits.update(id, patch)?;
        self.mirror_visit(&record).await;
        Ok(record)
    }

    /// Checks a visitor out.
    ///
    /// # Errors
    /// See [`VisitorStore::checkout`].
    pub async fn check_out(&mut self, id: VisitId) -> Result<VisitRecord> {
        let record = self.visits.checkout(id)?;
        self.mirror_visit(&record).await;
        Ok(record)
    }

    /// # Errors
    /// `Error::NotFound` if no visit has this id.
    pub fn visit(&self, id: VisitId) -> Result<VisitRecord> {
        self.visits.get(id).cloned()
    }

    /// Visits matching the filter, most recent check-in first.
    #[must_use]
    pub fn visits(&self, filter: Option<&VisitFilter>) -> Vec<VisitRecord> {
        self.visits.list(filter)
    }

    /// Free-text directory search. See [`search::search`].
    #[must_use]
    pub fn search(&self, query: &str, filter: Option<&VisitFilter>) -> Vec<VisitRecord> {
        search::search(&self.visits, query, filter)
    }

    /// Exact identifier match, most recent visit preferred.
    #[must_use]
    pub fn find_by_identifier(&self, identifier: &str) -> Option<&VisitRecord> {
        search::find_by_identifier(&self.visits, identifier)
    }

    /// Returning-visitor gate for the check-in screen.
    #[must_use]
    pub fn returning_lookup(&self, identifier: &str) -> ReturningLookup<'_> {
        search::returning_lookup(&self.visits, identifier)
    }

    // ------------------------------------------------------------------
    // Emergencies
    // ------------------------------------------------------------------

    /// Logs a new incident.
    ///
    /// # Errors
    /// See [`EmergencyLog::report`].
    pub async fn report_emergency(&mut self, input: NewEmergency) -> Result<EmergencyRecord> {
        let record = self.emergencies.report(input)?;
        self.mirror_emergency(&record).await;
        Ok(record)
    }

    /// # Errors
    /// See [`EmergencyLog::resolve`].
    pub async fn resolve_emergency(&mut self, id: EmergencyId) -> Result<EmergencyRecord> {
        let record = self.emergencies.resolve(id)?;
        self.mirror_emergency(&record).await;
        Ok(record)
    }

    /// # Errors
    /// See [`EmergencyLog::cancel`].
    pub async fn cancel_emergency(&mut self, id: EmergencyId) -> Result<EmergencyRecord> {
        let record = self.emergencies.cancel(id)?;
        self.mirror_emergency(&record).await;
        Ok(record)
    }

    /// # Errors
    /// `Error::NotFound` if no incident has this id.
    pub fn emergency(&self, id: EmergencyId) -> Result<EmergencyRecord> {
        self.emergencies.get(id).cloned()
    }

    /// Incidents matching the filter, most recent first.
    #[must_use]
    pub fn emergencies(&self, filter: Option<&EmergencyFilter>) -> Vec<EmergencyRecord> {
        self.emergencies.list(filter)
    }

    #[must_use]
    pub fn emergency_stats(&self) -> EmergencyStats {
        self.emergencies.stats()
    }

    // ------------------------------------------------------------------
    // Dashboard
    // ------------------------------------------------------------------

    /// Current dashboard snapshot.
    #[must_use]
    pub fn dashboard(&self) -> DashboardSnapshot {
        stats::dashboard(
            &self.visits.list(None),
            &self.emergencies.list(None),
            self.clock.now(),
        )
    }

    /// Visits that checked in on the given UTC day.
    #[must_use]
    pub fn visits_on(&self, day: NaiveDate) -> Vec<VisitRecord> {
        let filter = VisitFilter {
            check_in_day: Some(day),
            ..Default::default()
        };
        self.visits.list(Some(&filter))
    }

    async fn mirror_visit(&self, record: &VisitRecord) {
        if let Some(backend) = &self.backend {
            if let Err(error) = backend.save_visit(record).await {
                tracing::warn!(
                    %error,
                    visit_id = %record.id,
                    "backend write failed, record kept in memory only"
                );
            }
        }
    }

    async fn mirror_emergency(&self, record: &EmergencyRecord) {
        if let Some(backend) = &self.backend {
            if let Err(error) = backend.save_emergency(record).await {
                tracing::warn!(
                    %error,
                    incident = %record.incident_code,
                    "backend write failed, record kept in memory only"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use crate::clock::ManualClock;
    use chrono::{TimeZone, Utc};
    use gatepass_core::Severity;
    use std::sync::Mutex;

    /// Backend that remembers every write, optionally failing them all.
    #[derive(Debug, Default)]
    struct RecordingBackend {
        fail: bool,
        visits: Mutex<Vec<VisitId>>,
        emergencies: Mutex<Vec<EmergencyId>>,
    }

    impl PersistenceBackend for RecordingBackend {
        async fn save_visit(&self, record: &VisitRecord) -> std::result::Result<(), BackendError> {
            if self.fail {
                return Err(BackendError::new("disk on fire"));
            }
            self.visits.lock().unwrap().push(record.id);
            Ok(())
        }

        async fn save_emergency(
            &self,
            record: &EmergencyRecord,
        ) -> std::result::Result<(), BackendError> {
            if self.fail {
                return Err(BackendError::new("disk on fire"));
            }
            self.emergencies.lock().unwrap().push(record.id);
            Ok(())
        }

        async fn health_check(&self) -> std::result::Result<(), BackendError> {
            if self.fail {
                Err(BackendError::new("disk on fire"))
            } else {
                Ok(())
            }
        }
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        ))
    }

    fn jane() -> NewVisit {
        NewVisit {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            phone: "9876543210".into(),
            aadhaar_id: Some("123456789012".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn check_in_refuses_open_duplicate() {
        let mut svc = DirectoryService::in_memory_with_clock(clock());
        svc.check_in(jane()).await.unwrap();

        // Same person, same Aadhaar but a different phone: still gated.
        let retry = NewVisit {
            phone: "9123456780".into(),
            ..jane()
        };
        assert!(matches!(
            svc.check_in(retry).await,
            Err(Error::DuplicateOpenVisit { .. })
        ));
        assert_eq!(svc.visits(None).len(), 1);
    }

    #[tokio::test]
    async fn check_in_allowed_again_after_checkout() {
        let mut svc = DirectoryService::in_memory_with_clock(clock());
        let id = svc.check_in(jane()).await.unwrap().id;
        svc.check_out(id).await.unwrap();

        let second = svc.check_in(jane()).await.unwrap();
        assert_ne!(second.id, id);
        assert_eq!(svc.visits(None).len(), 2);
    }

    #[tokio::test]
    async fn mutations_mirror_to_backend() {
        let mut svc =
            DirectoryService::with_backend_and_clock(RecordingBackend::default(), clock());
        let id = svc.check_in(jane()).await.unwrap().id;
        svc.check_out(id).await.unwrap();

        let incident = svc
            .report_emergency(NewEmergency {
                severity: Severity::Low,
                details: crate::emergency::EmergencyDetails::Visitor {
                    first_name: "Jane".into(),
                    last_name: "Doe".into(),
                    phone: "9876543210".into(),
                },
                description: None,
                location: None,
                reported_by: None,
            })
            .await
            .unwrap();
        svc.resolve_emergency(incident.id).await.unwrap();

        let backend = svc.backend.as_ref().unwrap();
        // Check-in and check-out each mirror the visit.
        assert_eq!(backend.visits.lock().unwrap().as_slice(), &[id, id]);
        assert_eq!(
            backend.emergencies.lock().unwrap().as_slice(),
            &[incident.id, incident.id]
        );
        assert!(svc.backend_healthy().await);
    }

    #[tokio::test]
    async fn backend_failure_does_not_lose_the_record() {
        let backend = RecordingBackend {
            fail: true,
            ..Default::default()
        };
        let mut svc = DirectoryService::with_backend_and_clock(backend, clock());

        let record = svc.check_in(jane()).await.unwrap();
        assert_eq!(svc.visit(record.id).unwrap().id, record.id);
        assert!(!svc.backend_healthy().await);
    }

    #[tokio::test]
    async fn dashboard_reads_through_the_service() {
        let mut svc = DirectoryService::in_memory_with_clock(clock());
        svc.check_in(jane()).await.unwrap();

        let snap = svc.dashboard();
        assert_eq!(snap.current_visitors, 1);
        assert_eq!(snap.recent_activity[0].name, "Jane Doe");
    }
}
