// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Record store for the shift roster.
//!
//! The store is a hierarchical key-value tree addressed by slash-separated
//! paths (`weeks/{week_id}`, `shifts/{shift_id}/status`, ...). It offers
//! exactly two operations:
//!
//! - a point read returning the JSON subtree at a path
//! - an atomic multi-path write, where one [`WriteBatch`] sets or deletes
//!   values at many paths all-or-nothing
//!
//! There is no read-then-conditional-write transaction across paths.
//! Concurrent writers are ordered only by "last write to a path wins".
//!
//! ## Backends
//!
//! - [`MemoryStore`]: the whole tree in process memory; used by tests
//!   and by callers that do not need durability
//! - [`SqliteStore`]: one row per record in a `SQLite` database managed
//!   through Diesel and embedded migrations

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::future::Future;

use serde_json::Value;

mod batch;
mod diesel_schema;
mod error;
mod memory;
mod path;
mod sqlite;
mod tree;

#[cfg(test)]
mod tests;

pub use batch::WriteBatch;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use path::StorePath;
pub use sqlite::SqliteStore;

/// The contract every record store backend fulfils.
///
/// Both operations are suspension points: callers await them one at a
/// time and must not assume anything about state between two calls.
pub trait RecordStore: Send + Sync {
    /// Reads the subtree at `path`.
    ///
    /// Returns `None` when nothing is stored there.
    fn read(
        &self,
        path: &StorePath,
    ) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send;

    /// Applies every entry of `batch` atomically.
    ///
    /// Either all entries are applied or none are.
    fn write(&self, batch: WriteBatch) -> impl Future<Output = Result<(), StoreError>> + Send;
}
