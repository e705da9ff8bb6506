//! SQLite persistence for the visitor directory.
//!
//! The in-memory directory is the source of truth; this crate mirrors
//! it so records survive a restart. It provides:
//!
//! - [`Database`] - Connection pool manager with automatic migrations
//! - [`VisitRepository`], [`EmergencyRepository`] - Data access traits
//!   with SQLite implementations
//! - [`SqliteBackend`] - The [`PersistenceBackend`] adapter the
//!   directory service writes through
//!
//! # Repository Pattern
//!
//! All data access goes through repository traits, enabling easy
//! mocking for unit tests and keeping SQL out of the directory crate.
//! Writes are upserts keyed by record UUID, so replaying a record at
//! any point in its lifecycle is harmless.
//!
//! # Examples
//!
//! ```no_run
//! use gatepass_directory::{DirectoryService, NewVisit};
//! use gatepass_storage::{Database, DatabaseConfig, SqliteBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatabaseConfig::new("gatepass.db")
//!     .max_connections(10)
//!     .auto_migrate(true);
//! let db = Database::new(config).await?;
//!
//! let mut service = DirectoryService::with_backend(SqliteBackend::new(db));
//! let record = service.check_in(NewVisit {
//!     first_name: "Jane".into(),
//!     last_name: "Doe".into(),
//!     phone: "9876543210".into(),
//!     aadhaar_id: Some("123456789012".into()),
//!     ..Default::default()
//! }).await?;
//! println!("checked in {}", record.full_name());
//! # Ok(())
//! # }
//! ```
//!
//! [`PersistenceBackend`]: gatepass_directory::PersistenceBackend

pub mod backend;
pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;

pub use backend::SqliteBackend;
pub use connection::{Database, DatabaseConfig};
pub use error::{StorageError, StorageResult};
pub use models::{EmergencyRow, VisitRow};
pub use repositories::{
    EmergencyRepository, SqliteEmergencyRepository, SqliteVisitRepository, VisitRepository,
};
