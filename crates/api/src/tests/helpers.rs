// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::atomic::{AtomicU64, Ordering};

use roster_domain::{Application, ApplicationStatus, ContractType, SchedulingPolicy, Worker};
use roster_store::{MemoryStore, RecordStore, StoreError, StorePath, WriteBatch};
use serde_json::Value;
use time::macros::{date, datetime};
use time::{Date, Month, OffsetDateTime};
use tokio::sync::Barrier;

use crate::{LifecycleResponse, run_lifecycle};

pub const TODAY: Date = date!(2026 - 10 - 21);

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-10-21 03:00:00 UTC)
}

pub fn path(raw: &str) -> StorePath {
    StorePath::parse(raw).expect("valid test path")
}

pub async fn read(store: &impl RecordStore, raw: &str) -> Option<Value> {
    store.read(&path(raw)).await.unwrap()
}

/// Number of records stored in a collection.
pub async fn count(store: &impl RecordStore, collection: &str) -> usize {
    read(store, collection)
        .await
        .and_then(|v| v.as_object().map(serde_json::Map::len))
        .unwrap_or(0)
}

pub async fn set(store: &impl RecordStore, raw: &str, value: &Value) {
    let mut batch: WriteBatch = WriteBatch::new();
    batch.set(path(raw), value).unwrap();
    store.write(batch).await.unwrap();
}

pub fn create_test_worker(id: &str, contract_type: ContractType, points: f64, hours: u32) -> Worker {
    let mut worker: Worker = Worker::new(id.into(), contract_type);
    worker.points = points;
    worker.hours_assigned = hours;
    worker
}

/// An application submitted `day` days into October 2026.
pub fn create_test_application(id: &str, shift_id: &str, worker_id: &str, day: u8) -> Application {
    Application {
        application_id: id.into(),
        shift_id: shift_id.into(),
        worker_id: worker_id.into(),
        status: ApplicationStatus::Applied,
        application_date: Date::from_calendar_date(2026, Month::October, day)
            .unwrap()
            .midnight()
            .assume_utc(),
    }
}

pub async fn put_worker(store: &impl RecordStore, worker: &Worker) {
    let mut batch: WriteBatch = WriteBatch::new();
    batch
        .set(path(&format!("workers/{}", worker.worker_id)), worker)
        .unwrap();
    store.write(batch).await.unwrap();
}

pub async fn put_application(store: &impl RecordStore, application: &Application) {
    let mut batch: WriteBatch = WriteBatch::new();
    batch
        .set(
            path(&format!("applications/{}", application.application_id)),
            application,
        )
        .unwrap();
    store.write(batch).await.unwrap();
}

pub async fn set_capacity(store: &impl RecordStore, shift_id: &str, max_workers: u32) {
    set(
        store,
        &format!("shifts/{shift_id}/max_workers"),
        &Value::from(max_workers),
    )
    .await;
}

/// A store holding the window generated on [`TODAY`].
pub async fn create_test_store() -> MemoryStore {
    let store: MemoryStore = MemoryStore::new();
    let response: LifecycleResponse = run_lifecycle(
        &store,
        TODAY,
        test_now(),
        &SchedulingPolicy::default(),
    )
    .await
    .unwrap();
    assert_eq!(response.created_weeks.len(), 7);
    store
}

/// Wraps a [`MemoryStore`] and injects failures.
pub struct FailingStore {
    inner: MemoryStore,
    healthy_writes: u64,
    attempted_writes: AtomicU64,
    fail_reads: bool,
}

impl FailingStore {
    /// Lets `healthy_writes` writes through, then fails every write.
    pub fn failing_writes_after(inner: MemoryStore, healthy_writes: u64) -> Self {
        Self {
            inner,
            healthy_writes,
            attempted_writes: AtomicU64::new(0),
            fail_reads: false,
        }
    }

    /// Fails every read and every write.
    pub fn unreachable(inner: MemoryStore) -> Self {
        Self {
            inner,
            healthy_writes: 0,
            attempted_writes: AtomicU64::new(0),
            fail_reads: true,
        }
    }

    pub const fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

impl RecordStore for FailingStore {
    async fn read(&self, path: &StorePath) -> Result<Option<Value>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable(String::from("connection reset")));
        }
        self.inner.read(path).await
    }

    async fn write(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let attempt: u64 = self.attempted_writes.fetch_add(1, Ordering::SeqCst);
        if attempt >= self.healthy_writes {
            return Err(StoreError::Unavailable(String::from("write timed out")));
        }
        self.inner.write(batch).await
    }
}

/// Holds every write until `parties` writers are waiting, so that
/// concurrent callers all read before any of them writes.
pub struct BarrierStore {
    inner: MemoryStore,
    barrier: Barrier,
}

impl BarrierStore {
    pub fn new(inner: MemoryStore, parties: usize) -> Self {
        Self {
            inner,
            barrier: Barrier::new(parties),
        }
    }

    pub const fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

impl RecordStore for BarrierStore {
    async fn read(&self, path: &StorePath) -> Result<Option<Value>, StoreError> {
        self.inner.read(path).await
    }

    async fn write(&self, batch: WriteBatch) -> Result<(), StoreError> {
        self.barrier.wait().await;
        self.inner.write(batch).await
    }
}
