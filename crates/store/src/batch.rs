// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Multi-path write batches.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;
use crate::path::StorePath;

/// A set of path writes that a store applies all-or-nothing.
///
/// `None` deletes the subtree at the path. Writing JSON `null` is
/// normalized to a delete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    entries: BTreeMap<StorePath, Option<Value>>,
}

impl WriteBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes `value` and schedules it to be written at `path`.
    ///
    /// A later write to the same path replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized to JSON.
    pub fn set<T: Serialize + ?Sized>(
        &mut self,
        path: StorePath,
        value: &T,
    ) -> Result<(), StoreError> {
        let json: Value = serde_json::to_value(value)?;
        self.set_value(path, json);
        Ok(())
    }

    /// Schedules a raw JSON value to be written at `path`.
    pub fn set_value(&mut self, path: StorePath, value: Value) {
        if value.is_null() {
            self.entries.insert(path, None);
        } else {
            self.entries.insert(path, Some(value));
        }
    }

    /// Schedules the subtree at `path` for deletion.
    pub fn delete(&mut self, path: StorePath) {
        self.entries.insert(path, None);
    }

    /// Number of scheduled paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no paths are scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the value scheduled for `path`.
    ///
    /// The outer `Option` is `None` if `path` is not part of the batch;
    /// the inner one is `None` for a delete.
    #[must_use]
    pub fn get(&self, path: &StorePath) -> Option<Option<&Value>> {
        self.entries.get(path).map(Option::as_ref)
    }

    /// Iterates entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&StorePath, Option<&Value>)> {
        self.entries.iter().map(|(path, value)| (path, value.as_ref()))
    }

    /// Consumes the batch, yielding entries in path order.
    pub fn into_entries(self) -> impl Iterator<Item = (StorePath, Option<Value>)> {
        self.entries.into_iter()
    }

    /// Checks that the batch can be applied unambiguously.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is empty, writes the root, or contains
    /// one path nested below another.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.entries.is_empty() {
            return Err(StoreError::EmptyBatch);
        }

        let mut previous: Option<&StorePath> = None;
        for path in self.entries.keys() {
            if path.is_root() {
                return Err(StoreError::RootWrite);
            }
            // Descendants sort directly after their ancestor, so adjacent pairs suffice.
            if let Some(prev) = previous.filter(|prev| prev.is_ancestor_of(path)) {
                return Err(StoreError::OverlappingPaths {
                    ancestor: prev.to_string(),
                    descendant: path.to_string(),
                });
            }
            previous = Some(path);
        }
        Ok(())
    }
}
