use crate::{
    Result,
    constants::{INCIDENT_CODE_PREFIX, INCIDENT_SUFFIX_LENGTH},
    error::Error,
    validation,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Opaque visit record identifier.
///
/// Assigned once at creation, globally unique, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisitId(Uuid);

impl VisitId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        VisitId(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for VisitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VisitId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for VisitId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let id = Uuid::parse_str(s)
            .map_err(|_| Error::InvalidFieldFormat(format!("Invalid visit id: {s}")))?;
        Ok(VisitId(id))
    }
}

/// Opaque emergency record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmergencyId(Uuid);

impl EmergencyId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        EmergencyId(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EmergencyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EmergencyId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EmergencyId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let id = Uuid::parse_str(s)
            .map_err(|_| Error::InvalidFieldFormat(format!("Invalid emergency id: {s}")))?;
        Ok(EmergencyId(id))
    }
}

/// Phone number stored as its digit string (10-15 digits).
///
/// Formatting characters are stripped at construction, so two differently
/// formatted inputs for the same number compare equal.
///
/// # Security
/// Comparison is constant-time: phone numbers act as lookup credentials in
/// the returning-visitor flow.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Create a phone number, stripping non-digits before validation.
    ///
    /// # Errors
    /// Returns `Error::Validation` if fewer than 10 or more than 15 digits
    /// remain after stripping.
    pub fn new(raw: &str) -> Result<Self> {
        validation::check_phone(raw)?;
        Ok(PhoneNumber(validation::digits_only(raw)))
    }

    /// Get the normalized digit string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PhoneNumber::new(s)
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

macro_rules! document_newtype {
    ($(#[$meta:meta])* $name:ident, $checker:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Eq, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Create the document, normalizing (trim + uppercase) before
            /// validation.
            ///
            /// # Errors
            /// Returns `Error::Validation` naming the field and its fixed
            /// rule string if the value does not match the document format.
            pub fn new(raw: &str) -> Result<Self> {
                let normalized = raw.trim().to_uppercase();
                $checker(&normalized)?;
                Ok($name(normalized))
            }

            /// Get the normalized document string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                $name::new(s)
            }
        }

        // Constant-time comparison: identity documents are credentials in
        // the returning-visitor lookup, same treatment as phone numbers.
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
            }
        }

        impl std::hash::Hash for $name {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }
    };
}

document_newtype!(
    /// Aadhaar number (exactly 12 digits).
    AadhaarId,
    validation::check_aadhaar
);

document_newtype!(
    /// PAN (`AAAAA9999A`).
    PanId,
    validation::check_pan
);

document_newtype!(
    /// Passport number (one letter plus seven digits).
    PassportId,
    validation::check_passport
);

document_newtype!(
    /// Driving license number (10-20 alphanumeric characters).
    DrivingLicenseId,
    validation::check_driving_license
);

/// Purpose of visit: the fixed set of departments a visitor can be signed
/// in to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purpose {
    #[serde(rename = "Anti-Human Trafficking Unit")]
    AntiHumanTraffickingUnit,
    #[serde(rename = "Antiterrorism Squad")]
    AntiterrorismSquad,
    #[serde(rename = "Application Branch")]
    ApplicationBranch,
    #[serde(rename = "Control Room")]
    ControlRoom,
    #[serde(rename = "Cyber Police Station")]
    CyberPoliceStation,
    #[serde(rename = "District Special Branch")]
    DistrictSpecialBranch,
    #[serde(rename = "Economic Offences Wing")]
    EconomicOffencesWing,
    #[serde(rename = "Local Crime Branch")]
    LocalCrimeBranch,
    #[serde(rename = "Mahila Cell")]
    MahilaCell,
    #[serde(rename = "Security Branch")]
    SecurityBranch,
    #[serde(rename = "Welfare Branch")]
    WelfareBranch,
    #[serde(rename = "Superintendent of Police (SP)")]
    SuperintendentOfPolice,
    #[serde(rename = "Additional Superintendent of Police (Additional SP)")]
    AdditionalSuperintendentOfPolice,
}

impl Purpose {
    /// All purposes, in display order.
    pub const ALL: [Purpose; 13] = [
        Purpose::AntiHumanTraffickingUnit,
        Purpose::AntiterrorismSquad,
        Purpose::ApplicationBranch,
        Purpose::ControlRoom,
        Purpose::CyberPoliceStation,
        Purpose::DistrictSpecialBranch,
        Purpose::EconomicOffencesWing,
        Purpose::LocalCrimeBranch,
        Purpose::MahilaCell,
        Purpose::SecurityBranch,
        Purpose::WelfareBranch,
        Purpose::SuperintendentOfPolice,
        Purpose::AdditionalSuperintendentOfPolice,
    ];

    /// The department name as shown in the UI.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::AntiHumanTraffickingUnit => "Anti-Human Trafficking Unit",
            Purpose::AntiterrorismSquad => "Antiterrorism Squad",
            Purpose::ApplicationBranch => "Application Branch",
            Purpose::ControlRoom => "Control Room",
            Purpose::CyberPoliceStation => "Cyber Police Station",
            Purpose::DistrictSpecialBranch => "District Special Branch",
            Purpose::EconomicOffencesWing => "Economic Offences Wing",
            Purpose::LocalCrimeBranch => "Local Crime Branch",
            Purpose::MahilaCell => "Mahila Cell",
            Purpose::SecurityBranch => "Security Branch",
            Purpose::WelfareBranch => "Welfare Branch",
            Purpose::SuperintendentOfPolice => "Superintendent of Police (SP)",
            Purpose::AdditionalSuperintendentOfPolice => {
                "Additional Superintendent of Police (Additional SP)"
            }
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Purpose {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Purpose::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::InvalidFieldFormat(format!("Unknown purpose: {s}")))
    }
}

/// Visit lifecycle status.
///
/// Stored redundantly with `check_out_time` for query convenience; the store
/// keeps the two in agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisitStatus {
    #[serde(rename = "Checked In")]
    CheckedIn,
    #[serde(rename = "Checked Out")]
    CheckedOut,
}

impl VisitStatus {
    /// Returns `true` for an open visit.
    #[inline]
    #[must_use]
    pub fn is_checked_in(self) -> bool {
        matches!(self, VisitStatus::CheckedIn)
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VisitStatus::CheckedIn => write!(f, "Checked In"),
            VisitStatus::CheckedOut => write!(f, "Checked Out"),
        }
    }
}

impl std::str::FromStr for VisitStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Checked In" => Ok(VisitStatus::CheckedIn),
            "Checked Out" => Ok(VisitStatus::CheckedOut),
            other => Err(Error::InvalidFieldFormat(format!(
                "Unknown visit status '{other}'"
            ))),
        }
    }
}

/// Security level assigned to a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SecurityLevel::Low => write!(f, "Low"),
            SecurityLevel::Medium => write!(f, "Medium"),
            SecurityLevel::High => write!(f, "High"),
        }
    }
}

impl std::str::FromStr for SecurityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Low" => Ok(SecurityLevel::Low),
            "Medium" => Ok(SecurityLevel::Medium),
            "High" => Ok(SecurityLevel::High),
            other => Err(Error::InvalidFieldFormat(format!(
                "Unknown security level '{other}'"
            ))),
        }
    }
}

/// Emergency incident category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmergencyType {
    Visitor,
    Departmental,
}

impl fmt::Display for EmergencyType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EmergencyType::Visitor => write!(f, "Visitor"),
            EmergencyType::Departmental => write!(f, "Departmental"),
        }
    }
}

impl std::str::FromStr for EmergencyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Visitor" => Ok(EmergencyType::Visitor),
            "Departmental" => Ok(EmergencyType::Departmental),
            other => Err(Error::InvalidFieldFormat(format!(
                "Unknown emergency type '{other}'"
            ))),
        }
    }
}

/// Emergency severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Low" => Ok(Severity::Low),
            "Medium" => Ok(Severity::Medium),
            "High" => Ok(Severity::High),
            other => Err(Error::InvalidFieldFormat(format!(
                "Unknown severity '{other}'"
            ))),
        }
    }
}

/// Emergency lifecycle status.
///
/// `Active` is the only non-terminal state; `Resolved` and `Cancelled` are
/// both terminal and neither transitions back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmergencyStatus {
    Active,
    Resolved,
    Cancelled,
}

impl EmergencyStatus {
    /// Returns `true` once the incident can no longer change state.
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, EmergencyStatus::Active)
    }
}

impl fmt::Display for EmergencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EmergencyStatus::Active => write!(f, "Active"),
            EmergencyStatus::Resolved => write!(f, "Resolved"),
            EmergencyStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl std::str::FromStr for EmergencyStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Active" => Ok(EmergencyStatus::Active),
            "Resolved" => Ok(EmergencyStatus::Resolved),
            "Cancelled" => Ok(EmergencyStatus::Cancelled),
            other => Err(Error::InvalidFieldFormat(format!(
                "Unknown emergency status '{other}'"
            ))),
        }
    }
}

/// Human-readable unique incident code: `EMG-YYYYMMDD-HHMMSS-XXXX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IncidentCode(String);

impl IncidentCode {
    /// Build a code from the report timestamp and a 4-character uppercase
    /// alphanumeric suffix.
    ///
    /// # Errors
    /// Returns `Error::InvalidFieldFormat` if the suffix is not 4 uppercase
    /// alphanumeric characters.
    pub fn from_parts(reported_at: DateTime<Utc>, suffix: &str) -> Result<Self> {
        if suffix.len() != INCIDENT_SUFFIX_LENGTH
            || !suffix.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(Error::InvalidFieldFormat(format!(
                "Incident suffix must be {INCIDENT_SUFFIX_LENGTH} uppercase alphanumeric chars, got '{suffix}'"
            )));
        }
        Ok(IncidentCode(format!(
            "{INCIDENT_CODE_PREFIX}-{}-{suffix}",
            reported_at.format("%Y%m%d-%H%M%S")
        )))
    }

    /// Parse and validate an existing code string.
    ///
    /// # Errors
    /// Returns `Error::InvalidFieldFormat` if the string does not follow
    /// `EMG-YYYYMMDD-HHMMSS-XXXX`.
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('-').collect();
        let well_formed = parts.len() == 4
            && parts[0] == INCIDENT_CODE_PREFIX
            && parts[1].len() == 8
            && parts[1].chars().all(|c| c.is_ascii_digit())
            && parts[2].len() == 6
            && parts[2].chars().all(|c| c.is_ascii_digit())
            && parts[3].len() == INCIDENT_SUFFIX_LENGTH
            && parts[3].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if !well_formed {
            return Err(Error::InvalidFieldFormat(format!("Invalid incident code: {s}")));
        }
        Ok(IncidentCode(s.to_string()))
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IncidentCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[test]
    fn test_visit_id_unique() {
        assert_ne!(VisitId::new(), VisitId::new());
    }

    #[test]
    fn test_visit_id_round_trip() {
        let id = VisitId::new();
        let parsed: VisitId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[rstest]
    #[case("9876543210", "9876543210")]
    #[case("(987) 654-3210", "9876543210")]
    #[case("+91 98765 43210", "919876543210")]
    fn test_phone_normalization(#[case] input: &str, #[case] expected: &str) {
        let phone = PhoneNumber::new(input).unwrap();
        assert_eq!(phone.as_str(), expected);
    }

    #[test]
    fn test_phone_formatted_inputs_compare_equal() {
        let a = PhoneNumber::new("9876543210").unwrap();
        let b = PhoneNumber::new("(987) 654-3210").unwrap();
        assert_eq!(a, b);
    }

    #[rstest]
    #[case("987654321")] // too short
    #[case("9876543210123456")] // too long
    fn test_phone_invalid(#[case] input: &str) {
        assert!(PhoneNumber::new(input).is_err());
    }

    #[test]
    fn test_document_normalization() {
        let pan = PanId::new(" abcde1234f ").unwrap();
        assert_eq!(pan.as_str(), "ABCDE1234F");
        assert!(PanId::new("AB1234").is_err());

        let passport = PassportId::new("a1234567").unwrap();
        assert_eq!(passport.as_str(), "A1234567");

        let dl = DrivingLicenseId::new("mh0120230001").unwrap();
        assert_eq!(dl.as_str(), "MH0120230001");
    }

    #[test]
    fn test_aadhaar_rejects_short() {
        let err = AadhaarId::new("12345").unwrap_err();
        assert!(matches!(
            err,
            Error::Validation { field: "aadhaarId", .. }
        ));
    }

    #[test]
    fn test_purpose_round_trip() {
        for purpose in Purpose::ALL {
            let parsed: Purpose = purpose.as_str().parse().unwrap();
            assert_eq!(parsed, purpose);
        }
        assert!("Unknown Department".parse::<Purpose>().is_err());
    }

    #[test]
    fn test_purpose_serde_uses_display_names() {
        let json = serde_json::to_string(&Purpose::CyberPoliceStation).unwrap();
        assert_eq!(json, "\"Cyber Police Station\"");
    }

    #[test]
    fn test_visit_status_serde() {
        let json = serde_json::to_string(&VisitStatus::CheckedIn).unwrap();
        assert_eq!(json, "\"Checked In\"");
    }

    #[test]
    fn test_emergency_status_terminal() {
        assert!(!EmergencyStatus::Active.is_terminal());
        assert!(EmergencyStatus::Resolved.is_terminal());
        assert!(EmergencyStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_incident_code_from_parts() {
        let ts = Utc.with_ymd_and_hms(2025, 11, 9, 14, 30, 36).unwrap();
        let code = IncidentCode::from_parts(ts, "ABCD").unwrap();
        assert_eq!(code.as_str(), "EMG-20251109-143036-ABCD");
    }

    #[rstest]
    #[case("EMG-20251109-143036-ABCD", true)]
    #[case("EMG-20251109-143036-AB1D", true)]
    #[case("EMG-20251109-143036-abcd", false)]
    #[case("EMG-20251109-143036", false)]
    #[case("XXX-20251109-143036-ABCD", false)]
    #[case("EMG-2025119-143036-ABCD", false)]
    fn test_incident_code_parse(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(IncidentCode::parse(input).is_ok(), expected);
    }

    #[test]
    fn test_incident_code_rejects_bad_suffix() {
        let ts = Utc.with_ymd_and_hms(2025, 11, 9, 14, 30, 36).unwrap();
        assert!(IncidentCode::from_parts(ts, "abcd").is_err());
        assert!(IncidentCode::from_parts(ts, "ABCDE").is_err());
    }
}
