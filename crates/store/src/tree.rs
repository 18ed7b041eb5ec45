// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! JSON tree navigation shared by every store backend.
//!
//! Empty objects and `null` are never kept in the tree: writing one is a
//! delete, and a parent left empty by a delete is removed as well.

use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::path::StorePath;

/// Whether a node carries no data.
pub(crate) fn is_vacant(value: &Value) -> bool {
    value.is_null() || value.as_object().is_some_and(Map::is_empty)
}

/// Returns the node at `segments` below `node`, skipping vacant nodes.
pub(crate) fn get_at<'a>(node: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current: &Value = node;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    if is_vacant(current) {
        None
    } else {
        Some(current)
    }
}

/// Writes (`Some`) or deletes (`None`) the node at `segments` below `node`.
///
/// `full` is only used for error reporting.
pub(crate) fn apply_at(
    node: &mut Value,
    segments: &[String],
    value: Option<Value>,
    full: &StorePath,
) -> Result<(), StoreError> {
    let Some((head, rest)) = segments.split_first() else {
        *node = value.unwrap_or(Value::Null);
        return Ok(());
    };

    if node.is_null() {
        if value.is_none() {
            return Ok(());
        }
        *node = Value::Object(Map::new());
    }

    let Value::Object(map) = node else {
        // Nothing can exist below a scalar, so deleting there is already done.
        return if value.is_none() {
            Ok(())
        } else {
            Err(StoreError::NotAnObject {
                path: full.to_string(),
            })
        };
    };

    if rest.is_empty() {
        match value {
            Some(v) if !is_vacant(&v) => {
                map.insert(head.clone(), v);
            }
            _ => {
                map.remove(head);
            }
        }
        return Ok(());
    }

    if value.is_none() && !map.contains_key(head) {
        return Ok(());
    }

    let child: &mut Value = map.entry(head.clone()).or_insert(Value::Null);
    apply_at(child, rest, value, full)?;
    if is_vacant(child) {
        map.remove(head);
    }
    Ok(())
}
