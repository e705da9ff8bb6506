//! In-memory visitor directory for front-desk operations.
//!
//! This crate owns the live state of a visitor management deployment:
//! the visit record store with its one-hour edit window, identifier
//! matching and free-text search, the append-only emergency log, and
//! derived dashboard statistics. [`DirectoryService`] ties the pieces
//! together and optionally mirrors mutations to a persistence backend
//! on a best-effort basis.

pub mod backend;
pub mod clock;
pub mod emergency;
pub mod record;
pub mod search;
pub mod service;
pub mod stats;
pub mod store;

pub use backend::{BackendError, NoopBackend, PersistenceBackend};
pub use clock::{Clock, ManualClock, SystemClock};
pub use emergency::{
    EmergencyDetails, EmergencyFilter, EmergencyLog, EmergencyRecord, EmergencyStats, NewEmergency,
};
pub use record::{NewVisit, VisitPatch, VisitRecord};
pub use search::{
    IdentifierKind, ReturningLookup, classify_identifier, find_by_identifier, returning_lookup,
    search,
};
pub use service::DirectoryService;
pub use stats::{ActivityEntry, DashboardSnapshot, DepartmentCount, dashboard};
pub use store::{VisitFilter, VisitorStore};
