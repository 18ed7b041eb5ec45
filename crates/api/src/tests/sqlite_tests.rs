// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The same operations against the `SQLite` backend.

use diesel::{Connection, RunQueryDsl, SqliteConnection};
use roster_domain::{ContractType, SchedulingPolicy, Week};
use roster_store::SqliteStore;
use serde_json::json;

use super::helpers::{
    TODAY, count, create_test_application, create_test_worker, put_application, put_worker, read,
    set_capacity, test_now,
};
use crate::{
    AssignOneRequest, AssignOneResponse, Collection, ConsistencyResponse, LifecycleResponse,
    LoadedRoster, QuarantinedRecord, ShiftStatusRequest, UnassignOneRequest, assign_one,
    check_consistency, load_roster, run_lifecycle, unassign_one, update_shift_status,
};

#[tokio::test]
async fn test_lifecycle_is_idempotent_on_sqlite() {
    let store: SqliteStore = SqliteStore::new_in_memory().unwrap();
    let policy: SchedulingPolicy = SchedulingPolicy::default();

    let first: LifecycleResponse = run_lifecycle(&store, TODAY, test_now(), &policy)
        .await
        .unwrap();
    let second: LifecycleResponse = run_lifecycle(&store, TODAY, test_now(), &policy)
        .await
        .unwrap();

    assert_eq!(first.created_weeks.len(), 7);
    assert_eq!(second.batches_written, 0);
    assert_eq!(count(&store, "weeks").await, 7);
    assert_eq!(count(&store, "shifts").await, 49);
}

#[tokio::test]
async fn test_assign_and_unassign_on_sqlite() {
    let store: SqliteStore = SqliteStore::new_in_memory().unwrap();
    let policy: SchedulingPolicy = SchedulingPolicy::default();
    run_lifecycle(&store, TODAY, test_now(), &policy)
        .await
        .unwrap();
    set_capacity(&store, "2026-11-02", 1).await;
    put_worker(
        &store,
        &create_test_worker("stu-1", ContractType::HourCapped, 10.0, 0),
    )
    .await;
    put_application(
        &store,
        &create_test_application("a1", "2026-11-02", "stu-1", 1),
    )
    .await;

    let assigned: AssignOneResponse = assign_one(
        &store,
        &AssignOneRequest {
            shift_id: Some(String::from("2026-11-02")),
            application_id: Some(String::from("a1")),
        },
        test_now(),
        &policy,
    )
    .await
    .unwrap();
    assert_eq!(assigned.hours_assigned, Some(8));
    assert_eq!(
        read(&store, "shifts/2026-11-02/assigned_workers").await,
        Some(json!(["stu-1"]))
    );
    let sweep: ConsistencyResponse = check_consistency(&store, &policy).await.unwrap();
    assert!(sweep.discrepancies.is_empty());

    unassign_one(
        &store,
        &UnassignOneRequest {
            shift_id: Some(String::from("2026-11-02")),
            worker_id: Some(String::from("stu-1")),
        },
        &policy,
    )
    .await
    .unwrap();
    assert_eq!(read(&store, "workers/stu-1/hours_assigned").await, Some(json!(0)));
    assert_eq!(read(&store, "assignments/2026-11-02_stu-1").await, None);
}

#[tokio::test]
async fn test_shift_status_on_sqlite() {
    let store: SqliteStore = SqliteStore::new_in_memory().unwrap();
    run_lifecycle(&store, TODAY, test_now(), &SchedulingPolicy::default())
        .await
        .unwrap();

    update_shift_status(
        &store,
        &ShiftStatusRequest {
            shift_id: Some(String::from("2026-11-05")),
            status: Some(String::from("closed")),
        },
    )
    .await
    .unwrap();

    assert_eq!(read(&store, "shifts/2026-11-05/status").await, Some(json!("closed")));
    assert_eq!(
        read(&store, "shifts/2026-11-05/date").await,
        Some(json!("2026-11-05"))
    );
}

#[tokio::test]
async fn test_corrupt_row_is_quarantined_on_sqlite() {
    let dir: std::path::PathBuf =
        std::env::temp_dir().join(format!("roster-api-corrupt-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let file: std::path::PathBuf = dir.join("roster.db");
    let _ = std::fs::remove_file(&file);

    let store: SqliteStore = SqliteStore::new_with_file(&file).unwrap();
    let policy: SchedulingPolicy = SchedulingPolicy::default();
    run_lifecycle(&store, TODAY, test_now(), &policy)
        .await
        .unwrap();

    let mut conn: SqliteConnection = SqliteConnection::establish(file.to_str().unwrap()).unwrap();
    diesel::sql_query(
        "UPDATE records SET body = 'not json' WHERE collection = 'weeks' AND record_id = '2026-W44'",
    )
    .execute(&mut conn)
    .unwrap();
    drop(conn);

    let loaded: LoadedRoster = load_roster(&store, &[Collection::Weeks]).await.unwrap();
    let weeks: Vec<Week> = loaded.roster.weeks_ascending();
    assert_eq!(weeks.len(), 6);
    assert!(weeks.iter().all(|w| w.week_id.as_str() != "2026-W44"));
    assert_eq!(loaded.quarantined.len(), 1);
    assert_eq!(loaded.quarantined[0].path, "weeks/2026-W44");

    let sweep: ConsistencyResponse = check_consistency(&store, &policy).await.unwrap();
    assert!(
        sweep
            .quarantined
            .iter()
            .any(|q: &QuarantinedRecord| q.path == "weeks/2026-W44")
    );

    drop(store);
    let _ = std::fs::remove_dir_all(&dir);
}
