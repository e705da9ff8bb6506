use chrono::{DateTime, Utc};
use gatepass_core::IncidentCode;
use gatepass_directory::{EmergencyDetails, EmergencyRecord};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// One row of the `emergencies` table.
///
/// The who-is-affected payload differs between visitor and departmental
/// incidents, so `details` holds it as tagged JSON; the remaining
/// columns are flat for filtering.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmergencyRow {
    /// Emergency UUID
    pub id: String,
    /// `EMG-YYYYMMDD-HHMMSS-XXXX`
    pub incident_code: String,
    /// "Visitor" or "Departmental"
    pub emergency_type: String,
    pub severity: String,
    pub status: String,
    /// Tagged JSON payload of [`EmergencyDetails`]
    pub details: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub reported_by: Option<String>,
    pub reported_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl TryFrom<&EmergencyRecord> for EmergencyRow {
    type Error = StorageError;

    fn try_from(record: &EmergencyRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id.to_string(),
            incident_code: record.incident_code.as_str().to_owned(),
            emergency_type: record.emergency_type.to_string(),
            severity: record.severity.to_string(),
            status: record.status.to_string(),
            details: serde_json::to_string(&record.details)?,
            description: record.description.clone(),
            location: record.location.clone(),
            reported_by: record.reported_by.clone(),
            reported_at: record.reported_at,
            resolved_at: record.resolved_at,
        })
    }
}

impl TryFrom<EmergencyRow> for EmergencyRecord {
    type Error = StorageError;

    fn try_from(row: EmergencyRow) -> Result<Self, Self::Error> {
        let corrupt = |e: gatepass_core::Error| StorageError::corrupt("emergencies", e);
        let details: EmergencyDetails = serde_json::from_str(&row.details)?;
        Ok(EmergencyRecord {
            id: row.id.parse().map_err(corrupt)?,
            incident_code: IncidentCode::parse(&row.incident_code).map_err(corrupt)?,
            emergency_type: row.emergency_type.parse().map_err(corrupt)?,
            severity: row.severity.parse().map_err(corrupt)?,
            status: row.status.parse().map_err(corrupt)?,
            details,
            description: row.description,
            location: row.location,
            reported_by: row.reported_by,
            reported_at: row.reported_at,
            resolved_at: row.resolved_at,
        })
    }
}
