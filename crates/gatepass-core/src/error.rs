use thiserror::Error;

/// Error taxonomy for the visitor directory service.
///
/// Every variant is an expected, recoverable business condition the caller
/// branches on; none of them indicates a bug. Operations return these as
/// values, never by panicking.
#[derive(Error, Debug)]
pub enum Error {
    // Field-level validation
    #[error("Validation failed for {field}: {rule}")]
    Validation {
        field: &'static str,
        rule: &'static str,
    },

    #[error("At least one identity document is required")]
    MissingIdentityDocument,

    // Store lookups
    #[error("Record not found: {id}")]
    NotFound { id: String },

    // Visit lifecycle
    #[error("Edit window expired for visit {id}")]
    EditWindowExpired { id: String },

    #[error("Visit {id} is already checked out")]
    AlreadyCheckedOut { id: String },

    /// A matching visitor still has an open visit; they must check out
    /// before checking in again.
    #[error("Visitor already checked in (open visit {id})")]
    DuplicateOpenVisit { id: String },

    // Emergency lifecycle
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    // Typed-constructor failures (malformed ids, incident codes)
    #[error("Invalid field format: {0}")]
    InvalidFieldFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
