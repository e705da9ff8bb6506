//! Stateless field validation for visitor identity data.
//!
//! Each validator comes in two shapes: a `validate_*` predicate returning
//! `bool`, for UI callers that mark fields inline, and a `check_*` variant
//! returning `Result<()>` carrying the field name and its fixed rule string,
//! for the store's fail-fast validation chain. Validators never mutate input
//! and never panic; an empty optional field (email, any single ID document)
//! is valid on its own.
//!
//! # Examples
//!
//! ```
//! use gatepass_core::validation::{validate_name, validate_aadhaar, check_pan};
//!
//! assert!(validate_name("Jane O'Brien"));
//! assert!(validate_aadhaar("123456789012"));
//! assert!(check_pan("ABCDE1234F").is_ok());
//! assert!(check_pan("AB1234").is_err());
//! ```

use crate::constants::{MAX_PHONE_DIGITS, MIN_PHONE_DIGITS};
use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z .'\-]{2,50}$").expect("valid name pattern"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[A-Za-z]{2,24}$").expect("valid email pattern"));

static AADHAAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("valid aadhaar pattern"));

static PAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("valid PAN pattern"));

static PASSPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][0-9]{7}$").expect("valid passport pattern"));

static DRIVING_LICENSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{10,20}$").expect("valid license pattern"));

// Indian mobile numbers: 10 digits starting 6-9. Used only for identifier
// classification, not for rejecting stored phone numbers.
static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("valid mobile pattern"));

/// Fixed human-readable rule strings, one per validated field.
///
/// These are the exact strings the check-in form shows under a failed field.
/// The store embeds them in `Error::Validation` so the UI can surface them
/// without its own message catalog.
pub struct FieldMessages;

impl FieldMessages {
    /// Name rule: letters, spaces, periods, hyphens, apostrophes; 2-50 chars.
    pub const NAME: &'static str = "Only letters, spaces, .' - (2-50 chars)";

    /// Email rule: `local@domain.tld`; empty is allowed (email is optional).
    pub const EMAIL: &'static str = "Invalid email";

    /// Phone rule: 10-15 digits after stripping formatting.
    pub const PHONE: &'static str = "Enter 10-15 digits";

    /// Aadhaar rule.
    pub const AADHAAR: &'static str = "Aadhaar must be exactly 12 digits";

    /// PAN rule.
    pub const PAN: &'static str = "PAN must be 10 chars (AAAAA9999A)";

    /// Passport rule.
    pub const PASSPORT: &'static str = "Passport must be 1 letter + 7 digits";

    /// Driving license rule.
    pub const DRIVING_LICENSE: &'static str = "DL must be 10-20 alphanumeric chars";

    /// Identity-document presence rule (create only).
    pub const MISSING_ID: &'static str = "At least one ID document must be provided";

    /// Emergency contact phone rule (visitor phone and departmental POC).
    pub const EMERGENCY_PHONE: &'static str = "Phone must be exactly 10 digits";

    /// Shown when a mandatory free-text field is left blank.
    pub const REQUIRED: &'static str = "This field is required";

    /// Shown when a departmental emergency reports fewer than one person.
    pub const HEADCOUNT: &'static str = "Headcount must be at least 1";
}

/// Strip every non-digit character from a string.
#[must_use]
pub fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Validate a first or last name: letters, spaces, `.`, `'`, `-`, 2-50 chars.
#[must_use]
pub fn validate_name(s: &str) -> bool {
    NAME_RE.is_match(s.trim())
}

/// Validate an email address. Empty input is valid (email is optional).
#[must_use]
pub fn validate_email(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || EMAIL_RE.is_match(s)
}

/// Validate a phone number: 10-15 digits after stripping formatting.
#[must_use]
pub fn validate_phone(s: &str) -> bool {
    let digits = digits_only(s);
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len())
}

/// Validate an Aadhaar number: exactly 12 digits.
#[must_use]
pub fn validate_aadhaar(s: &str) -> bool {
    AADHAAR_RE.is_match(s.trim())
}

/// Validate a PAN: five letters, four digits, one letter, uppercased first.
#[must_use]
pub fn validate_pan(s: &str) -> bool {
    PAN_RE.is_match(&s.trim().to_uppercase())
}

/// Validate a passport number: one letter plus seven digits, uppercased first.
#[must_use]
pub fn validate_passport(s: &str) -> bool {
    PASSPORT_RE.is_match(&s.trim().to_uppercase())
}

/// Validate a driving license: 10-20 alphanumeric characters, uppercased first.
#[must_use]
pub fn validate_driving_license(s: &str) -> bool {
    DRIVING_LICENSE_RE.is_match(&s.trim().to_uppercase())
}

/// Whether a raw string looks like an Indian mobile number (10 digits, 6-9
/// leading). This drives identifier classification only.
#[must_use]
pub fn looks_like_mobile(s: &str) -> bool {
    MOBILE_RE.is_match(s.trim())
}

/// True iff at least one of the four identity documents is present and
/// non-empty. Enforced at record creation.
#[must_use]
pub fn has_at_least_one_id(
    aadhaar: Option<&str>,
    pan: Option<&str>,
    passport: Option<&str>,
    driving_license: Option<&str>,
) -> bool {
    [aadhaar, pan, passport, driving_license]
        .into_iter()
        .any(|id| id.is_some_and(|s| !s.trim().is_empty()))
}

fn check(ok: bool, field: &'static str, rule: &'static str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::Validation { field, rule })
    }
}

/// Validate a name field, reporting it under the given field name
/// (`firstName` or `lastName`).
pub fn check_name(field: &'static str, s: &str) -> Result<()> {
    check(validate_name(s), field, FieldMessages::NAME)
}

/// Validate the optional email field.
pub fn check_email(s: &str) -> Result<()> {
    check(validate_email(s), "email", FieldMessages::EMAIL)
}

/// Validate the phone field.
pub fn check_phone(s: &str) -> Result<()> {
    check(validate_phone(s), "phone", FieldMessages::PHONE)
}

/// Validate the Aadhaar field.
pub fn check_aadhaar(s: &str) -> Result<()> {
    check(validate_aadhaar(s), "aadhaarId", FieldMessages::AADHAAR)
}

/// Validate the PAN field.
pub fn check_pan(s: &str) -> Result<()> {
    check(validate_pan(s), "panId", FieldMessages::PAN)
}

/// Validate the passport field.
pub fn check_passport(s: &str) -> Result<()> {
    check(validate_passport(s), "passportId", FieldMessages::PASSPORT)
}

/// Validate the driving license field.
pub fn check_driving_license(s: &str) -> Result<()> {
    check(
        validate_driving_license(s),
        "drivingLicenseId",
        FieldMessages::DRIVING_LICENSE,
    )
}

/// Validate that a mandatory free-text field is non-blank.
pub fn check_required(field: &'static str, s: &str) -> Result<()> {
    check(!s.trim().is_empty(), field, FieldMessages::REQUIRED)
}

/// Validate an emergency contact phone: exactly 10 digits, no formatting.
pub fn check_emergency_phone(field: &'static str, s: &str) -> Result<()> {
    let s = s.trim();
    let ok = s.len() == crate::constants::EMERGENCY_PHONE_DIGITS
        && s.chars().all(|c| c.is_ascii_digit());
    check(ok, field, FieldMessages::EMERGENCY_PHONE)
}
