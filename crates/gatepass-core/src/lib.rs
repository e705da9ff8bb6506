pub mod constants;
pub mod error;
pub mod types;
pub mod validation;

pub use error::{Error, Result};
pub use types::*;
pub use validation::FieldMessages;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
