// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_domain::{ContractType, SchedulingPolicy};
use roster_store::MemoryStore;
use serde_json::json;

use super::helpers::{
    create_test_application, create_test_store, create_test_worker, put_application, put_worker,
    set, set_capacity, test_now,
};
use crate::{ConsistencyResponse, PlanningRequest, check_consistency, run_assignment_engine};

#[tokio::test]
async fn test_engine_output_is_consistent() {
    let store: MemoryStore = create_test_store().await;
    set_capacity(&store, "2026-11-02", 2).await;
    put_worker(
        &store,
        &create_test_worker("stu-1", ContractType::HourCapped, 50.0, 0),
    )
    .await;
    put_worker(
        &store,
        &create_test_worker("cdd-1", ContractType::PermanentTier2, 0.0, 0),
    )
    .await;
    put_application(
        &store,
        &create_test_application("a1", "2026-11-02", "stu-1", 1),
    )
    .await;
    put_application(
        &store,
        &create_test_application("a2", "2026-11-02", "cdd-1", 2),
    )
    .await;
    let policy: SchedulingPolicy = SchedulingPolicy::default();
    run_assignment_engine(
        &store,
        &PlanningRequest {
            week_id: Some(String::from("2026-W45")),
            shift_ids: None,
            ranking: None,
        },
        test_now(),
        &policy,
    )
    .await
    .unwrap();

    let sweep: ConsistencyResponse = check_consistency(&store, &policy).await.unwrap();

    assert!(sweep.discrepancies.is_empty(), "{:?}", sweep.discrepancies);
    assert!(sweep.quarantined.is_empty());
}

#[tokio::test]
async fn test_drift_and_bad_records_are_reported() {
    let store: MemoryStore = create_test_store().await;
    set_capacity(&store, "2026-11-02", 1).await;
    set(
        &store,
        "shifts/2026-11-02/assigned_workers",
        &json!(["stu-1", "stu-2"]),
    )
    .await;
    put_worker(
        &store,
        &create_test_worker("stu-1", ContractType::HourCapped, 50.0, 33),
    )
    .await;
    set(&store, "workers/stu-9", &json!({"worker_id": "stu-9", "contract_type": "intern"})).await;

    let sweep: ConsistencyResponse = check_consistency(&store, &SchedulingPolicy::default())
        .await
        .unwrap();

    let kinds: Vec<&str> = sweep.discrepancies.iter().map(|d| d.kind.as_str()).collect();
    assert_eq!(
        kinds,
        vec![
            "over_capacity",
            "missing_assignment_record",
            "missing_assignment_record",
            "over_hour_cap",
        ]
    );
    assert_eq!(sweep.quarantined.len(), 1);
    assert_eq!(sweep.quarantined[0].path, "workers/stu-9");
}
