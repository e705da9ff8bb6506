//! Repository traits and their SQLite implementations.

pub mod emergency;
pub mod visit;

pub use emergency::{EmergencyRepository, SqliteEmergencyRepository};
pub use visit::{SqliteVisitRepository, VisitRepository};
