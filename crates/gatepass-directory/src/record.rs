//! Visit record and its input shapes.

use chrono::{DateTime, Duration, Utc};
use gatepass_core::{
    AadhaarId, DrivingLicenseId, PanId, PassportId, PhoneNumber, Purpose, SecurityLevel, VisitId,
    VisitStatus,
};
use serde::{Deserialize, Serialize};

/// A single visit from check-in to check-out.
///
/// `status` and `check_out_time` move together: a record is `CheckedIn`
/// exactly while `check_out_time` is `None`. The store is the only writer
/// and maintains that pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub id: VisitId,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: PhoneNumber,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub purpose: Purpose,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub is_vip: bool,
    pub security_level: SecurityLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Opaque reference to a captured photo (data URL or object key).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aadhaar_id: Option<AadhaarId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan_id: Option<PanId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passport_id: Option<PassportId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driving_license_id: Option<DrivingLicenseId>,
    pub check_in_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_time: Option<DateTime<Utc>>,
    pub status: VisitStatus,
}

impl VisitRecord {
    #[must_use]
    pub fn is_checked_in(&self) -> bool {
        self.status.is_checked_in()
    }

    /// "First Last" for display and name search.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Time spent on site so far, or the final visit length once
    /// checked out.
    #[must_use]
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        self.check_out_time.unwrap_or(now) - self.check_in_time
    }

    /// Whether `status` agrees with `check_out_time`. Exercised by the
    /// store's tests; always true for records it hands out.
    #[must_use]
    pub fn status_consistent(&self) -> bool {
        self.status.is_checked_in() == self.check_out_time.is_none()
    }
}

/// Raw check-in form input. Field values are validated and normalized by
/// [`VisitorStore::create`](crate::store::VisitorStore::create); nothing
/// here is trusted yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVisit {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub company: Option<String>,
    pub purpose: Purpose,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_vip: bool,
    pub security_level: SecurityLevel,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub aadhaar_id: Option<String>,
    #[serde(default)]
    pub pan_id: Option<String>,
    #[serde(default)]
    pub passport_id: Option<String>,
    #[serde(default)]
    pub driving_license_id: Option<String>,
}

impl Default for NewVisit {
    /// Mirrors the blank check-in form: Cyber Police Station, Low
    /// security, not a VIP.
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: None,
            phone: String::new(),
            company: None,
            purpose: Purpose::CyberPoliceStation,
            location: None,
            is_vip: false,
            security_level: SecurityLevel::Low,
            notes: None,
            photo: None,
            aadhaar_id: None,
            pan_id: None,
            passport_id: None,
            driving_license_id: None,
        }
    }
}

/// Partial update applied inside the edit window.
///
/// `None` leaves a field untouched. For the optional text fields an empty
/// string clears the value; identity documents are add-or-replace only,
/// so a blank document entry is ignored rather than stripping the ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitPatch {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub purpose: Option<Purpose>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub aadhaar_id: Option<String>,
    #[serde(default)]
    pub pan_id: Option<String>,
    #[serde(default)]
    pub passport_id: Option<String>,
    #[serde(default)]
    pub driving_license_id: Option<String>,
}

impl VisitPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.company.is_none()
            && self.purpose.is_none()
            && self.notes.is_none()
            && self.aadhaar_id.is_none()
            && self.pan_id.is_none()
            && self.passport_id.is_none()
            && self.driving_license_id.is_none()
    }
}
