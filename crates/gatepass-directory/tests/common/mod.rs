//! Common test utilities for the directory integration tests.
//!
//! Provides check-in form builders with sensible defaults and a service
//! fixture driven by a manual clock, so tests can step through the edit
//! window and overdue thresholds without sleeping.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use gatepass_core::{Purpose, Severity};
use gatepass_directory::{
    DirectoryService, EmergencyDetails, ManualClock, NewEmergency, NewVisit,
};

/// Fixed start instant for every test: 2025-03-01 09:00:00 UTC.
pub fn start_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

/// A fresh in-memory service plus the clock that drives it.
pub fn service() -> (ManualClock, DirectoryService) {
    let clock = ManualClock::new(start_time());
    let svc = DirectoryService::in_memory_with_clock(Arc::new(clock.clone()));
    (clock, svc)
}

/// Valid check-in form for Jane Doe, Aadhaar on file.
pub fn jane_doe() -> NewVisit {
    NewVisit {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        email: Some("jane.doe@example.com".into()),
        phone: "987-654-3210".into(),
        company: Some("Acme Corp".into()),
        purpose: Purpose::ControlRoom,
        aadhaar_id: Some("123456789012".into()),
        ..Default::default()
    }
}

/// Valid check-in form for Ravi Kumar, PAN on file.
pub fn ravi_kumar() -> NewVisit {
    NewVisit {
        first_name: "Ravi".into(),
        last_name: "Kumar".into(),
        phone: "9123456780".into(),
        purpose: Purpose::EconomicOffencesWing,
        pan_id: Some("ABCDE1234F".into()),
        ..Default::default()
    }
}

/// Valid high-severity visitor emergency.
pub fn lobby_emergency() -> NewEmergency {
    NewEmergency {
        severity: Severity::High,
        details: EmergencyDetails::Visitor {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            phone: "9876543210".into(),
        },
        description: Some("Collapsed in the lobby".into()),
        location: Some("Main lobby".into()),
        reported_by: Some("Front desk".into()),
    }
}
