//! Domain constants for the visitor directory service.
//!
//! Field limits follow the identity-document formats accepted at the front
//! desk (Aadhaar, PAN, passport, driving license) plus the name/contact rules
//! the check-in form enforces. Window lengths govern the record lifecycle:
//! how long a checked-in record stays editable and when an open visit is
//! flagged as overdue on the dashboard.

// ============================================================================
// Name and contact limits
// ============================================================================

/// Minimum visitor name length (characters).
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum visitor name length (characters).
pub const MAX_NAME_LENGTH: usize = 50;

/// Minimum phone length after stripping non-digit characters.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Maximum phone length after stripping non-digit characters.
pub const MAX_PHONE_DIGITS: usize = 15;

// ============================================================================
// Identity document formats
// ============================================================================

/// Aadhaar numbers are exactly 12 digits.
pub const AADHAAR_LENGTH: usize = 12;

/// PAN is 10 characters: five letters, four digits, one letter.
pub const PAN_LENGTH: usize = 10;

/// Passport numbers are 8 characters: one letter plus seven digits.
pub const PASSPORT_LENGTH: usize = 8;

/// Minimum driving license length (alphanumeric).
pub const MIN_DRIVING_LICENSE_LENGTH: usize = 10;

/// Maximum driving license length (alphanumeric).
pub const MAX_DRIVING_LICENSE_LENGTH: usize = 20;

// ============================================================================
// Lifecycle windows
// ============================================================================

/// Edit window after check-in (seconds).
///
/// A checked-in record may be amended only while the elapsed time since
/// `check_in_time` is at most this value. After the window closes the record
/// is immutable except for the checkout transition.
pub const EDIT_WINDOW_SECS: i64 = 3600;

/// Hours after which an open visit counts as overdue on the dashboard.
pub const OVERDUE_AFTER_HOURS: i64 = 4;

// ============================================================================
// Emergency log
// ============================================================================

/// Contact phones on emergency reports are exactly 10 digits.
pub const EMERGENCY_PHONE_DIGITS: usize = 10;

/// Prefix for generated incident codes (`EMG-YYYYMMDD-HHMMSS-XXXX`).
pub const INCIDENT_CODE_PREFIX: &str = "EMG";

/// Length of the random suffix in an incident code.
pub const INCIDENT_SUFFIX_LENGTH: usize = 4;
