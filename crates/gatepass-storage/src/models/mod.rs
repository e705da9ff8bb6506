//! Row types mapping the SQLite schema onto directory records.

pub mod emergency_row;
pub mod visit_row;

pub use emergency_row::EmergencyRow;
pub use visit_row::VisitRow;
