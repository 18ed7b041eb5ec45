// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory record store.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use crate::RecordStore;
use crate::batch::WriteBatch;
use crate::error::StoreError;
use crate::path::StorePath;
use crate::tree::{apply_at, get_at};

/// A record store holding the whole tree in process memory.
///
/// Batches are applied to a copy of the tree which replaces the live one
/// only when every entry succeeded.
#[derive(Debug)]
pub struct MemoryStore {
    root: RwLock<Value>,
    writes: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Value::Object(Map::new())),
            writes: AtomicU64::new(0),
        }
    }

    /// Creates a store seeded with `contents` as its root.
    ///
    /// Seeding does not count as a write.
    #[must_use]
    pub fn with_contents(contents: Value) -> Self {
        Self {
            root: RwLock::new(contents),
            writes: AtomicU64::new(0),
        }
    }

    /// Number of batches committed since creation.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }
}

impl RecordStore for MemoryStore {
    async fn read(&self, path: &StorePath) -> Result<Option<Value>, StoreError> {
        let root = self.root.read().await;
        Ok(get_at(&root, path.segments()).cloned())
    }

    async fn write(&self, batch: WriteBatch) -> Result<(), StoreError> {
        batch.validate()?;
        let path_count: usize = batch.len();

        let mut root = self.root.write().await;
        let mut next: Value = root.clone();
        for (path, value) in batch.into_entries() {
            apply_at(&mut next, path.segments(), value, &path)?;
        }
        if next.is_null() {
            next = Value::Object(Map::new());
        }
        *root = next;
        drop(root);

        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(paths = path_count, "Committed write batch to memory store");
        Ok(())
    }
}
