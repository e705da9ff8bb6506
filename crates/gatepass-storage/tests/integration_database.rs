//! Integration tests for the SQLite mirror.
//!
//! These run against an in-memory database and cover migrations,
//! repository round-trips, upsert replay and the backend adapter.
//!
//! Run with: cargo test --package gatepass-storage --test integration_database

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use gatepass_core::{EmergencyStatus, Severity, VisitStatus};
use gatepass_directory::{
    DirectoryService, EmergencyDetails, ManualClock, NewEmergency, NewVisit,
};
use gatepass_storage::{
    Database, EmergencyRepository, SqliteBackend, SqliteEmergencyRepository, SqliteVisitRepository,
    StorageError, VisitRepository,
};

fn jane() -> NewVisit {
    NewVisit {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        phone: "9876543210".into(),
        aadhaar_id: Some("123456789012".into()),
        ..Default::default()
    }
}

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
    ))
}

#[tokio::test]
async fn in_memory_database_migrates_and_answers() {
    let db = Database::in_memory().await.unwrap();
    db.health_check().await.unwrap();
    db.close().await;
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Database::in_memory().await.unwrap();
    // in_memory() already migrated once; a second run must be a no-op.
    db.migrate().await.unwrap();
    db.health_check().await.unwrap();
    db.close().await;
}

#[tokio::test]
async fn visit_rows_round_trip_through_the_repository() {
    let db = Database::in_memory().await.unwrap();
    let repo = SqliteVisitRepository::new(db.pool().clone());

    let mut svc = DirectoryService::in_memory_with_clock(clock());
    let record = svc.check_in(jane()).await.unwrap();

    repo.upsert(&record).await.unwrap();
    let loaded = repo.find_by_id(record.id).await.unwrap();
    assert_eq!(loaded, record);
    assert_eq!(repo.count().await.unwrap(), 1);

    db.close().await;
}

#[tokio::test]
async fn upsert_replays_the_same_visit() {
    let db = Database::in_memory().await.unwrap();
    let repo = SqliteVisitRepository::new(db.pool().clone());

    let c = clock();
    let mut svc = DirectoryService::in_memory_with_clock(c.clone());
    let record = svc.check_in(jane()).await.unwrap();
    repo.upsert(&record).await.unwrap();

    c.advance(Duration::minutes(40));
    let out = svc.check_out(record.id).await.unwrap();
    repo.upsert(&out).await.unwrap();

    // Still one row, now checked out.
    assert_eq!(repo.count().await.unwrap(), 1);
    let loaded = repo.find_by_id(record.id).await.unwrap();
    assert_eq!(loaded.status, VisitStatus::CheckedOut);
    assert_eq!(loaded.check_out_time, out.check_out_time);

    db.close().await;
}

#[tokio::test]
async fn missing_visit_is_not_found() {
    let db = Database::in_memory().await.unwrap();
    let repo = SqliteVisitRepository::new(db.pool().clone());

    let err = repo.find_by_id(gatepass_core::VisitId::new()).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { entity: "visits", .. }));

    db.close().await;
}

#[tokio::test]
async fn emergency_rows_round_trip_and_count_active() {
    let db = Database::in_memory().await.unwrap();
    let repo = SqliteEmergencyRepository::new(db.pool().clone());

    let mut svc = DirectoryService::in_memory_with_clock(clock());
    let incident = svc
        .report_emergency(NewEmergency {
            severity: Severity::High,
            details: EmergencyDetails::Visitor {
                first_name: "Jane".into(),
                last_name: "Doe".into(),
                phone: "9876543210".into(),
            },
            description: Some("Collapsed in the lobby".into()),
            location: Some("Main lobby".into()),
            reported_by: None,
        })
        .await
        .unwrap();
    repo.upsert(&incident).await.unwrap();
    assert_eq!(repo.count_active().await.unwrap(), 1);

    let resolved = svc.resolve_emergency(incident.id).await.unwrap();
    repo.upsert(&resolved).await.unwrap();

    let loaded = repo.find_by_id(incident.id).await.unwrap();
    assert_eq!(loaded.status, EmergencyStatus::Resolved);
    assert_eq!(loaded.resolved_at, resolved.resolved_at);
    assert_eq!(repo.count_active().await.unwrap(), 0);

    let all = repo.find_all().await.unwrap();
    assert_eq!(all.len(), 1);

    db.close().await;
}

#[tokio::test]
async fn sqlite_backend_mirrors_the_service() {
    let db = Database::in_memory().await.unwrap();
    let backend = SqliteBackend::new(db.clone());

    let mut svc = DirectoryService::with_backend_and_clock(backend.clone(), clock());
    assert!(svc.backend_healthy().await);

    let record = svc.check_in(jane()).await.unwrap();
    svc.check_out(record.id).await.unwrap();

    let mirrored = backend.visits().find_by_id(record.id).await.unwrap();
    assert_eq!(mirrored.status, VisitStatus::CheckedOut);

    db.close().await;
}

#[tokio::test]
async fn closed_database_fails_health_check_without_losing_records() {
    let db = Database::in_memory().await.unwrap();
    let backend = SqliteBackend::new(db.clone());
    let mut svc = DirectoryService::with_backend_and_clock(backend, clock());

    let record = svc.check_in(jane()).await.unwrap();
    db.close().await;

    // Writes now fail, but the in-memory record survives.
    let second = NewVisit {
        first_name: "Ravi".into(),
        last_name: "Kumar".into(),
        phone: "9123456780".into(),
        pan_id: Some("ABCDE1234F".into()),
        aadhaar_id: None,
        ..Default::default()
    };
    let ravi = svc.check_in(second).await.unwrap();

    assert!(!svc.backend_healthy().await);
    assert_eq!(svc.visit(record.id).unwrap().id, record.id);
    assert_eq!(svc.visit(ravi.id).unwrap().id, ravi.id);
}

#[tokio::test]
async fn file_database_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gatepass.db");
    let path = path.to_str().unwrap().to_owned();

    let record = {
        let db = Database::new(gatepass_storage::DatabaseConfig::new(&path))
            .await
            .unwrap();
        let backend = SqliteBackend::new(db.clone());
        let mut svc = DirectoryService::with_backend_and_clock(backend, clock());
        let record = svc.check_in(jane()).await.unwrap();
        db.close().await;
        record
    };

    let db = Database::new(gatepass_storage::DatabaseConfig::new(&path))
        .await
        .unwrap();
    let repo = SqliteVisitRepository::new(db.pool().clone());
    let loaded = repo.find_by_id(record.id).await.unwrap();
    assert_eq!(loaded, record);
    db.close().await;
}

#[tokio::test]
async fn concurrent_queries_share_the_pool() {
    let db = Database::in_memory().await.unwrap();

    const NUM_TASKS: usize = 8;
    let mut handles = vec![];
    for i in 0..NUM_TASKS {
        let db_clone = db.clone();
        handles.push(tokio::spawn(async move {
            let result: (i64,) = sqlx::query_as("SELECT ?")
                .bind(i as i64)
                .fetch_one(db_clone.pool())
                .await
                .unwrap();
            result.0
        }));
    }

    let results: Vec<_> = futures::future::join_all(handles).await;
    for (i, result) in results.into_iter().enumerate() {
        assert_eq!(result.unwrap(), i as i64);
    }

    db.close().await;
}
