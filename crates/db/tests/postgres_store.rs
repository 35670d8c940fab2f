//! Repository behaviour against the durable PostgreSQL backend.

use assert_matches::assert_matches;
use chrono::{Duration, TimeZone, Utc};
use fwhub_core::types::Timestamp;
use fwhub_db::models::build_log::{BuildLogFilter, CreateBuildLog, UpdateBuildLog};
use fwhub_db::models::generated_code::CreateGeneratedCode;
use fwhub_db::repositories::{BuildLogRepo, GeneratedCodeRepo};
use fwhub_db::store::postgres::PgDocumentStore;
use fwhub_db::store::{DocumentStore, StorageKind, StoreError};
use serde_json::{json, Map};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn at(minutes: i64) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
}

fn new_build_log(build_id: &str, status: &str, start: Timestamp) -> CreateBuildLog {
    let mut config = Map::new();
    config.insert("frameworkVersion".to_string(), json!("2.1"));
    CreateBuildLog {
        build_id: build_id.to_string(),
        build_type: "JTAF Framework".to_string(),
        status: status.to_string(),
        start_time: start,
        end_time: None,
        config,
        command: Some("run suite".to_string()),
        jenkins_job: None,
        output_log: None,
    }
}

fn new_code(n: i64) -> CreateGeneratedCode {
    CreateGeneratedCode {
        language: "python".to_string(),
        code_type: "script".to_string(),
        code: format!("print({n})"),
        description: format!("entry {n}"),
        created_at: Some(at(n)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_round_trip_and_ping(pool: PgPool) {
    let store = PgDocumentStore::new(pool);
    store.ping().await.unwrap();
    assert_eq!(store.kind(), StorageKind::Durable);

    let input = new_build_log("b-1", "running", at(0));
    let id = BuildLogRepo::create(&store, &input).await.unwrap();

    let fetched = BuildLogRepo::find_by_build_id(&store, "b-1").await.unwrap().unwrap();
    assert_eq!(fetched.id, id);
    assert_eq!(fetched.start_time, input.start_time);
    assert_eq!(fetched.config, input.config);
}

/// Unlike the volatile backend, the durable one enforces unique `build_id`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_build_id_rejected(pool: PgPool) {
    let store = PgDocumentStore::new(pool);
    BuildLogRepo::create(&store, &new_build_log("dup", "running", at(0)))
        .await
        .unwrap();

    let result = BuildLogRepo::create(&store, &new_build_log("dup", "failed", at(1))).await;

    assert_matches!(result, Err(StoreError::DuplicateKey { collection: "build_logs", .. }));
    assert_eq!(BuildLogRepo::count(&store, None, None).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_and_sorts(pool: PgPool) {
    let store = PgDocumentStore::new(pool);
    for (id, status, minute) in [("a", "completed", 1), ("b", "failed", 2), ("c", "completed", 3)] {
        BuildLogRepo::create(&store, &new_build_log(id, status, at(minute)))
            .await
            .unwrap();
    }

    let filter = BuildLogFilter {
        status: Some("completed".to_string()),
        build_type: None,
    };
    let logs = BuildLogRepo::list(&store, &filter, None, None).await.unwrap();
    let ids: Vec<&str> = logs.iter().map(|l| l.build_id.as_str()).collect();
    assert_eq!(ids, ["c", "a"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_update(pool: PgPool) {
    let store = PgDocumentStore::new(pool);
    let input = new_build_log("b-1", "running", at(0));
    BuildLogRepo::create(&store, &input).await.unwrap();

    let update = UpdateBuildLog {
        status: Some("completed".to_string()),
        end_time: Some(at(10)),
        output_log: None,
    };
    assert!(BuildLogRepo::update(&store, "b-1", &update).await.unwrap());
    assert!(!BuildLogRepo::update(&store, "missing", &update).await.unwrap());

    let fetched = BuildLogRepo::find_by_build_id(&store, "b-1").await.unwrap().unwrap();
    assert_eq!(fetched.status, "completed");
    assert_eq!(fetched.end_time, Some(at(10)));
    assert_eq!(fetched.command, input.command);
    assert_eq!(fetched.config, input.config);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bounded_insert_evicts_oldest(pool: PgPool) {
    let store = PgDocumentStore::new(pool);
    for n in 1..=11 {
        GeneratedCodeRepo::create(&store, new_code(n)).await.unwrap();
    }

    let listed = GeneratedCodeRepo::list(&store, None, None).await.unwrap();
    assert_eq!(listed.len(), 10);
    assert_eq!(listed[0].description, "entry 11");
    assert_eq!(listed[9].description, "entry 2");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_bounded_inserts_hold_capacity(pool: PgPool) {
    let store = PgDocumentStore::new(pool);

    let inserts = (0..25).map(|n| GeneratedCodeRepo::create(&store, new_code(n)));
    for result in futures::future::join_all(inserts).await {
        result.unwrap();
    }

    assert_eq!(GeneratedCodeRepo::count(&store).await.unwrap(), 10);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_one_and_all(pool: PgPool) {
    let store = PgDocumentStore::new(pool);
    for n in 0..3 {
        BuildLogRepo::create(&store, &new_build_log(&format!("b{n}"), "running", at(n)))
            .await
            .unwrap();
    }

    assert!(BuildLogRepo::delete(&store, "b0").await.unwrap());
    assert!(!BuildLogRepo::delete(&store, "b0").await.unwrap());
    assert_eq!(BuildLogRepo::delete_all(&store).await.unwrap(), 2);
    assert_eq!(BuildLogRepo::count(&store, None, None).await.unwrap(), 0);
}
