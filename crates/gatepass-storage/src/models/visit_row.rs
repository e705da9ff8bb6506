use chrono::{DateTime, Utc};
use gatepass_directory::VisitRecord;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// One row of the `visits` table.
///
/// Everything typed in the domain (ids, phone, documents, enums) is
/// stored as its canonical string form; [`TryFrom`] re-validates on the
/// way back out, so a hand-edited database cannot smuggle malformed
/// values into the directory.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VisitRow {
    /// Visit UUID
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    /// Digits-only phone number
    pub phone: String,
    pub company: Option<String>,
    /// Department display name, e.g. "Control Room"
    pub purpose: String,
    pub location: Option<String>,
    pub is_vip: bool,
    pub security_level: String,
    pub notes: Option<String>,
    pub photo: Option<String>,
    pub aadhaar_id: Option<String>,
    pub pan_id: Option<String>,
    pub passport_id: Option<String>,
    pub driving_license_id: Option<String>,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
    /// "Checked In" or "Checked Out"
    pub status: String,
}

impl From<&VisitRecord> for VisitRow {
    fn from(record: &VisitRecord) -> Self {
        Self {
            id: record.id.to_string(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            phone: record.phone.as_str().to_owned(),
            company: record.company.clone(),
            purpose: record.purpose.to_string(),
            location: record.location.clone(),
            is_vip: record.is_vip,
            security_level: record.security_level.to_string(),
            notes: record.notes.clone(),
            photo: record.photo.clone(),
            aadhaar_id: record.aadhaar_id.as_ref().map(|v| v.as_str().to_owned()),
            pan_id: record.pan_id.as_ref().map(|v| v.as_str().to_owned()),
            passport_id: record.passport_id.as_ref().map(|v| v.as_str().to_owned()),
            driving_license_id: record
                .driving_license_id
                .as_ref()
                .map(|v| v.as_str().to_owned()),
            check_in_time: record.check_in_time,
            check_out_time: record.check_out_time,
            status: record.status.to_string(),
        }
    }
}

impl TryFrom<VisitRow> for VisitRecord {
    type Error = StorageError;

    fn try_from(row: VisitRow) -> Result<Self, Self::Error> {
        let corrupt = |e: gatepass_core::Error| StorageError::corrupt("visits", e);
        Ok(VisitRecord {
            id: row.id.parse().map_err(corrupt)?,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone.parse().map_err(corrupt)?,
            company: row.company,
            purpose: row.purpose.parse().map_err(corrupt)?,
            location: row.location,
            is_vip: row.is_vip,
            security_level: row.security_level.parse().map_err(corrupt)?,
            notes: row.notes,
            photo: row.photo,
            aadhaar_id: parse_optional(row.aadhaar_id).map_err(corrupt)?,
            pan_id: parse_optional(row.pan_id).map_err(corrupt)?,
            passport_id: parse_optional(row.passport_id).map_err(corrupt)?,
            driving_license_id: parse_optional(row.driving_license_id).map_err(corrupt)?,
            check_in_time: row.check_in_time,
            check_out_time: row.check_out_time,
            status: row.status.parse().map_err(corrupt)?,
        })
    }
}

fn parse_optional<T: std::str::FromStr<Err = gatepass_core::Error>>(
    value: Option<String>,
) -> Result<Option<T>, gatepass_core::Error> {
    value.map(|s| s.parse()).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gatepass_core::{PhoneNumber, Purpose, SecurityLevel, VisitId, VisitStatus};
    use rstest::rstest;

    fn record() -> VisitRecord {
        VisitRecord {
            id: VisitId::new(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: Some("jane@example.com".into()),
            phone: PhoneNumber::new("9876543210").unwrap(),
            company: None,
            purpose: Purpose::ControlRoom,
            location: None,
            is_vip: false,
            security_level: SecurityLevel::Low,
            notes: None,
            photo: None,
            aadhaar_id: Some("123456789012".parse().unwrap()),
            pan_id: None,
            passport_id: None,
            driving_license_id: None,
            check_in_time: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
            check_out_time: None,
            status: VisitStatus::CheckedIn,
        }
    }

    #[test]
    fn row_round_trips_to_record() {
        let original = record();
        let row = VisitRow::from(&original);
        assert_eq!(row.purpose, "Control Room");
        assert_eq!(row.status, "Checked In");

        let restored = VisitRecord::try_from(row).unwrap();
        assert_eq!(restored, original);
    }

    fn corrupt(mutate: impl FnOnce(&mut VisitRow)) -> VisitRow {
        let mut row = VisitRow::from(&record());
        mutate(&mut row);
        row
    }

    #[rstest]
    #[case::bad_status(corrupt(|r| r.status = "Lost".into()))]
    #[case::bad_id(corrupt(|r| r.id = "not-a-uuid".into()))]
    #[case::bad_purpose(corrupt(|r| r.purpose = "Cafeteria".into()))]
    #[case::bad_phone(corrupt(|r| r.phone = "12".into()))]
    #[case::bad_aadhaar(corrupt(|r| r.aadhaar_id = Some("12345".into())))]
    fn corrupt_row_is_rejected(#[case] row: VisitRow) {
        assert!(matches!(
            VisitRecord::try_from(row),
            Err(StorageError::CorruptRow { entity: "visits", .. })
        ));
    }
}
