//! Append-only emergency incident log.
//!
//! Incidents are reported, then either resolved or cancelled; both are
//! terminal. Records are never deleted, so the log doubles as the audit
//! trail for drills and real events alike.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use gatepass_core::constants::INCIDENT_SUFFIX_LENGTH;
use gatepass_core::validation::{check_emergency_phone, check_required};
use gatepass_core::{
    EmergencyId, EmergencyStatus, EmergencyType, Error, FieldMessages, IncidentCode, Result,
    Severity,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};

const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Who or what the incident concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EmergencyDetails {
    /// A specific visitor needs attention.
    #[serde(rename_all = "camelCase")]
    Visitor {
        first_name: String,
        last_name: String,
        /// Contact number, exactly 10 digits.
        phone: String,
    },
    /// A whole department is affected.
    #[serde(rename_all = "camelCase")]
    Departmental {
        department: String,
        poc_name: String,
        /// Point-of-contact number, exactly 10 digits.
        poc_phone: String,
        /// People affected, at least 1.
        headcount: u32,
    },
}

impl EmergencyDetails {
    /// Which incident category these details imply.
    #[must_use]
    pub fn emergency_type(&self) -> EmergencyType {
        match self {
            EmergencyDetails::Visitor { .. } => EmergencyType::Visitor,
            EmergencyDetails::Departmental { .. } => EmergencyType::Departmental,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            EmergencyDetails::Visitor {
                first_name,
                last_name,
                phone,
            } => {
                check_required("firstName", first_name)?;
                check_required("lastName", last_name)?;
                check_emergency_phone("phone", phone)
            }
            EmergencyDetails::Departmental {
                department,
                poc_name,
                poc_phone,
                headcount,
            } => {
                check_required("department", department)?;
                check_required("pocName", poc_name)?;
                check_emergency_phone("pocPhone", poc_phone)?;
                if *headcount < 1 {
                    return Err(Error::Validation {
                        field: "headcount",
                        rule: FieldMessages::HEADCOUNT,
                    });
                }
                Ok(())
            }
        }
    }
}

/// One logged incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyRecord {
    pub id: EmergencyId,
    pub incident_code: IncidentCode,
    #[serde(rename = "type")]
    pub emergency_type: EmergencyType,
    pub severity: Severity,
    pub status: EmergencyStatus,
    pub details: EmergencyDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_by: Option<String>,
    pub reported_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl EmergencyRecord {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == EmergencyStatus::Active
    }
}

/// Raw emergency report form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmergency {
    pub severity: Severity,
    pub details: EmergencyDetails,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub reported_by: Option<String>,
}

/// Filter for [`EmergencyLog::list`]. All present criteria must match.
#[derive(Debug, Clone, Default)]
pub struct EmergencyFilter {
    pub status: Option<EmergencyStatus>,
    pub emergency_type: Option<EmergencyType>,
    /// Case-insensitive substring against description and location.
    pub text: Option<String>,
}

impl EmergencyFilter {
    #[must_use]
    pub fn matches(&self, record: &EmergencyRecord) -> bool {
        if self.status.is_some_and(|s| s != record.status) {
            return false;
        }
        if self
            .emergency_type
            .is_some_and(|t| t != record.emergency_type)
        {
            return false;
        }
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let hit = record
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
                || record
                    .location
                    .as_deref()
                    .is_some_and(|l| l.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Counts shown on the emergency dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyStats {
    pub total: usize,
    pub active: usize,
    pub resolved: usize,
    pub cancelled: usize,
    pub high_severity_active: usize,
}

/// Append-only log of emergency incidents.
#[derive(Debug)]
pub struct EmergencyLog {
    records: Vec<EmergencyRecord>,
    index: HashMap<EmergencyId, usize>,
    codes: HashSet<IncidentCode>,
    clock: Arc<dyn Clock>,
}

impl Default for EmergencyLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EmergencyLog {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            codes: HashSet::new(),
            clock,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read-only view of all incidents in report order, oldest first.
    #[must_use]
    pub fn records(&self) -> &[EmergencyRecord] {
        &self.records
    }

    /// Validates and logs a new incident as `Active`, assigning a unique
    /// incident code stamped with the report time.
    ///
    /// # Errors
    /// `Error::Validation` when the details are malformed.
    pub fn report(&mut self, input: NewEmergency) -> Result<EmergencyRecord> {
        input.details.validate()?;

        let reported_at = self.clock.now();
        let incident_code = self.unique_code(reported_at)?;

        let record = EmergencyRecord {
            id: EmergencyId::new(),
            incident_code,
            emergency_type: input.details.emergency_type(),
            severity: input.severity,
            status: EmergencyStatus::Active,
            details: input.details,
            description: input.description,
            location: input.location,
            reported_by: input.reported_by,
            reported_at,
            resolved_at: None,
        };

        tracing::info!(
            incident = %record.incident_code,
            severity = %record.severity,
            kind = %record.emergency_type,
            "emergency reported"
        );
        self.codes.insert(record.incident_code.clone());
        self.index.insert(record.id, self.records.len());
        self.records.push(record.clone());
        Ok(record)
    }

    /// Marks an active incident resolved, stamping the resolution time.
    ///
    /// # Errors
    /// `Error::NotFound`, or `Error::InvalidTransition` when the incident
    /// is already terminal.
    pub fn resolve(&mut self, id: EmergencyId) -> Result<EmergencyRecord> {
        self.transition(id, EmergencyStatus::Resolved)
    }

    /// Cancels an active incident (false alarm). No resolution time is
    /// recorded.
    ///
    /// # Errors
    /// `Error::NotFound`, or `Error::InvalidTransition` when the incident
    /// is already terminal.
    pub fn cancel(&mut self, id: EmergencyId) -> Result<EmergencyRecord> {
        self.transition(id, EmergencyStatus::Cancelled)
    }

    /// Looks an incident up by id.
    ///
    /// # Errors
    /// `Error::NotFound` if no incident has this id.
    pub fn get(&self, id: EmergencyId) -> Result<&EmergencyRecord> {
        self.index
            .get(&id)
            .map(|&pos| &self.records[pos])
            .ok_or_else(|| Error::NotFound { id: id.to_string() })
    }

    /// Snapshot of incidents matching the filter, most recent first.
    #[must_use]
    pub fn list(&self, filter: Option<&EmergencyFilter>) -> Vec<EmergencyRecord> {
        let mut out: Vec<EmergencyRecord> = self
            .records
            .iter()
            .filter(|r| filter.is_none_or(|f| f.matches(r)))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
        out
    }

    /// Dashboard counts over the whole log.
    #[must_use]
    pub fn stats(&self) -> EmergencyStats {
        let mut stats = EmergencyStats {
            total: self.records.len(),
            ..Default::default()
        };
        for record in &self.records {
            match record.status {
                EmergencyStatus::Active => {
                    stats.active += 1;
                    if record.severity == Severity::High {
                        stats.high_severity_active += 1;
                    }
                }
                EmergencyStatus::Resolved => stats.resolved += 1,
                EmergencyStatus::Cancelled => stats.cancelled += 1,
            }
        }
        stats
    }

    fn transition(&mut self, id: EmergencyId, to: EmergencyStatus) -> Result<EmergencyRecord> {
        let now = self.clock.now();
        let pos = *self
            .index
            .get(&id)
            .ok_or_else(|| Error::NotFound { id: id.to_string() })?;
        let record = &mut self.records[pos];

        if record.status.is_terminal() {
            return Err(Error::InvalidTransition {
                from: record.status.to_string(),
                to: to.to_string(),
            });
        }

        record.status = to;
        if to == EmergencyStatus::Resolved {
            record.resolved_at = Some(now);
        }

        tracing::info!(incident = %record.incident_code, status = %to, "emergency closed");
        Ok(record.clone())
    }

    /// Same-second reports share a timestamp, so retry the random suffix
    /// until the code is unique within this log.
    fn unique_code(&self, reported_at: DateTime<Utc>) -> Result<IncidentCode> {
        let mut rng = rand::thread_rng();
        loop {
            let suffix: String = (0..INCIDENT_SUFFIX_LENGTH)
                .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
                .collect();
            let code = IncidentCode::from_parts(reported_at, &suffix)?;
            if !self.codes.contains(&code) {
                return Ok(code);
            }
        }
    }
}
