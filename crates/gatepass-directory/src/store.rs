//! The visit record store.
//!
//! Owns every [`VisitRecord`] for the deployment and is the only code
//! allowed to mutate one. All input validation happens here at the
//! mutation boundary, so a record that made it into the store is
//! well-formed by construction.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use gatepass_core::constants::EDIT_WINDOW_SECS;
use gatepass_core::validation::{check_email, check_name, has_at_least_one_id};
use gatepass_core::{
    AadhaarId, DrivingLicenseId, Error, PanId, PassportId, PhoneNumber, Purpose, Result,
    VisitId, VisitStatus,
};

use crate::clock::{Clock, SystemClock};
use crate::record::{NewVisit, VisitPatch, VisitRecord};

/// Structured filter applied to [`VisitorStore::list`]. All present
/// criteria must match.
#[derive(Debug, Clone, Default)]
pub struct VisitFilter {
    pub status: Option<VisitStatus>,
    pub purpose: Option<Purpose>,
    /// Calendar day of the check-in, in UTC.
    pub check_in_day: Option<NaiveDate>,
}

impl VisitFilter {
    #[must_use]
    pub fn matches(&self, record: &VisitRecord) -> bool {
        if self.status.is_some_and(|s| s != record.status) {
            return false;
        }
        if self.purpose.is_some_and(|p| p != record.purpose) {
            return false;
        }
        if self
            .check_in_day
            .is_some_and(|d| record.check_in_time.date_naive() != d)
        {
            return false;
        }
        true
    }
}

/// In-memory store of visit records.
#[derive(Debug)]
pub struct VisitorStore {
    /// Records in creation order; `index` maps id to position here.
    records: Vec<VisitRecord>,
    index: HashMap<VisitId, usize>,
    clock: Arc<dyn Clock>,
}

impl Default for VisitorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitorStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
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

    /// Read-only view of all records in creation order, oldest first.
    /// Used by the search engine; mutation stays behind the store API.
    #[must_use]
    pub fn records(&self) -> &[VisitRecord] {
        &self.records
    }

    #[must_use]
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Validates the check-in form and creates a new `CheckedIn` record
    /// stamped with the current time.
    ///
    /// # Errors
    /// `Error::Validation` for any malformed field,
    /// `Error::MissingIdentityDocument` when no identity document was
    /// supplied.
    pub fn create(&mut self, input: NewVisit) -> Result<VisitRecord> {
        check_name("firstName", &input.first_name)?;
        check_name("lastName", &input.last_name)?;
        if let Some(email) = &input.email {
            check_email(email)?;
        }
        let phone = PhoneNumber::new(&input.phone)?;

        if !has_at_least_one_id(
            input.aadhaar_id.as_deref(),
            input.pan_id.as_deref(),
            input.passport_id.as_deref(),
            input.driving_license_id.as_deref(),
        ) {
            return Err(Error::MissingIdentityDocument);
        }

        let aadhaar_id = parse_optional(&input.aadhaar_id, AadhaarId::new)?;
        let pan_id = parse_optional(&input.pan_id, PanId::new)?;
        let passport_id = parse_optional(&input.passport_id, PassportId::new)?;
        let driving_license_id = parse_optional(&input.driving_license_id, DrivingLicenseId::new)?;

        let id = VisitId::new();
        debug_assert!(!self.index.contains_key(&id), "visit id collision");

        let record = VisitRecord {
            id,
            first_name: input.first_name.trim().to_owned(),
            last_name: input.last_name.trim().to_owned(),
            email: non_blank(input.email),
            phone,
            company: non_blank(input.company),
            purpose: input.purpose,
            location: non_blank(input.location),
            is_vip: input.is_vip,
            security_level: input.security_level,
            notes: non_blank(input.notes),
            photo: input.photo,
            aadhaar_id,
            pan_id,
            passport_id,
            driving_license_id,
            check_in_time: self.clock.now(),
            check_out_time: None,
            status: VisitStatus::CheckedIn,
        };

        tracing::debug!(visit_id = %record.id, name = %record.full_name(), "visit checked in");
        self.index.insert(record.id, self.records.len());
        self.records.push(record.clone());
        Ok(record)
    }

    /// Looks a record up by id.
    ///
    /// # Errors
    /// `Error::NotFound` if no record has this id.
    pub fn get(&self, id: VisitId) -> Result<&VisitRecord> {
        self.index
            .get(&id)
            .map(|&pos| &self.records[pos])
            .ok_or_else(|| Error::NotFound { id: id.to_string() })
    }

    /// Applies a patch to a record that is still inside its edit window.
    ///
    /// Edits are allowed while the record is `CheckedIn` and no more than
    /// one hour has passed since check-in. `id`, `check_in_time` and
    /// `status` are never patched.
    ///
    /// # Errors
    /// `Error::NotFound`, `Error::EditWindowExpired` (also returned once
    /// the record is checked out), or `Error::Validation` for a malformed
    /// patch field. On a validation error the record is left untouched.
    pub fn update(&mut self, id: VisitId, patch: &VisitPatch) -> Result<VisitRecord> {
        let now = self.clock.now();
        let pos = *self
            .index
            .get(&id)
            .ok_or_else(|| Error::NotFound { id: id.to_string() })?;

        {
            let record = &self.records[pos];
            let elapsed = now - record.check_in_time;
            if !record.is_checked_in() || elapsed.num_seconds() > EDIT_WINDOW_SECS {
                return Err(Error::EditWindowExpired { id: id.to_string() });
            }
        }

        // Validate every changed field before touching the record.
        if let Some(first) = &patch.first_name {
            check_name("firstName", first)?;
        }
        if let Some(last) = &patch.last_name {
            check_name("lastName", last)?;
        }
        if let Some(email) = &patch.email {
            // A blank email clears the field rather than failing validation.
            if !email.trim().is_empty() {
                check_email(email)?;
            }
        }
        let phone = match &patch.phone {
            Some(raw) => Some(PhoneNumber::new(raw)?),
            None => None,
        };
        let aadhaar_id = parse_optional(&patch.aadhaar_id, AadhaarId::new)?;
        let pan_id = parse_optional(&patch.pan_id, PanId::new)?;
        let passport_id = parse_optional(&patch.passport_id, PassportId::new)?;
        let driving_license_id = parse_optional(&patch.driving_license_id, DrivingLicenseId::new)?;

        let record = &mut self.records[pos];
        if let Some(first) = &patch.first_name {
            record.first_name = first.trim().to_owned();
        }
        if let Some(last) = &patch.last_name {
            record.last_name = last.trim().to_owned();
        }
        if let Some(email) = &patch.email {
            record.email = non_blank(Some(email.clone()));
        }
        if let Some(phone) = phone {
            record.phone = phone;
        }
        if let Some(company) = &patch.company {
            record.company = non_blank(Some(company.clone()));
        }
        if let Some(purpose) = patch.purpose {
            record.purpose = purpose;
        }
        if let Some(notes) = &patch.notes {
            record.notes = non_blank(Some(notes.clone()));
        }
        if let Some(v) = aadhaar_id {
            record.aadhaar_id = Some(v);
        }
        if let Some(v) = pan_id {
            record.pan_id = Some(v);
        }
        if let Some(v) = passport_id {
            record.passport_id = Some(v);
        }
        if let Some(v) = driving_license_id {
            record.driving_license_id = Some(v);
        }

        tracing::debug!(visit_id = %record.id, "visit updated");
        Ok(record.clone())
    }

    /// Checks a visitor out, stamping the current time. One-way: a
    /// checked-out record never returns to `CheckedIn`.
    ///
    /// # Errors
    /// `Error::NotFound` or `Error::AlreadyCheckedOut`.
    pub fn checkout(&mut self, id: VisitId) -> Result<VisitRecord> {
        let now = self.clock.now();
        let pos = *self
            .index
            .get(&id)
            .ok_or_else(|| Error::NotFound { id: id.to_string() })?;
        let record = &mut self.records[pos];

        if !record.is_checked_in() {
            return Err(Error::AlreadyCheckedOut { id: id.to_string() });
        }

        // checkOutTime never precedes checkInTime, even if the wall
        // clock stepped backwards between the two calls.
        record.check_out_time = Some(now.max(record.check_in_time));
        record.status = VisitStatus::CheckedOut;

        tracing::info!(visit_id = %record.id, name = %record.full_name(), "visitor checked out");
        Ok(record.clone())
    }

    /// Snapshot of records matching the filter, most recent check-in
    /// first.
    #[must_use]
    pub fn list(&self, filter: Option<&VisitFilter>) -> Vec<VisitRecord> {
        let mut out: Vec<VisitRecord> = self
            .records
            .iter()
            .filter(|r| filter.is_none_or(|f| f.matches(r)))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.check_in_time.cmp(&a.check_in_time));
        out
    }
}

fn parse_optional<T>(
    raw: &Option<String>,
    parse: impl Fn(&str) -> Result<T>,
) -> Result<Option<T>> {
    match raw.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => Ok(Some(parse(s)?)),
        _ => Ok(None),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}
