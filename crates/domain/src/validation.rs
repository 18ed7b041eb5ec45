// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Structural checks applied to records read back from the store.
//!
//! A record that deserializes cleanly may still violate an invariant that
//! the store cannot enforce. These checks catch such records so they can
//! be quarantined instead of processed.

use std::collections::BTreeSet;

use crate::calendar;
use crate::error::DomainError;
use crate::ids::WorkerId;
use crate::shift::Shift;
use crate::week::{Week, WeekStatus};

/// Validates a week's alignment, span, identifier, and status flags.
///
/// # Errors
///
/// Returns an error describing the first violated invariant.
pub fn validate_week(week: &Week) -> Result<(), DomainError> {
    calendar::ensure_monday(week.start_date)?;

    if calendar::add_days(week.start_date, 6)? != week.end_date {
        return Err(DomainError::InvalidWeekSpan {
            week_id: week.week_id.to_string(),
            start_date: week.start_date,
            end_date: week.end_date,
        });
    }

    let expected = calendar::week_id_for(week.start_date);
    if expected != week.week_id {
        return Err(DomainError::WeekIdMismatch {
            expected: expected.to_string(),
            actual: week.week_id.to_string(),
        });
    }

    let closed: bool = week.status == WeekStatus::Closed;
    if week.is_closed != closed || week.is_active == closed {
        return Err(DomainError::WeekStatusMismatch {
            week_id: week.week_id.to_string(),
        });
    }

    Ok(())
}

/// Validates a shift's identifier and the uniqueness of its assigned workers.
///
/// # Errors
///
/// Returns an error describing the first violated invariant.
pub fn validate_shift(shift: &Shift) -> Result<(), DomainError> {
    let expected = calendar::shift_id_for(shift.date);
    if expected != shift.shift_id {
        return Err(DomainError::ShiftIdMismatch {
            expected: expected.to_string(),
            actual: shift.shift_id.to_string(),
        });
    }

    let mut seen: BTreeSet<&WorkerId> = BTreeSet::new();
    for worker_id in &shift.assigned_workers {
        if !seen.insert(worker_id) {
            return Err(DomainError::DuplicateAssignedWorker {
                shift_id: shift.shift_id.to_string(),
                worker_id: worker_id.to_string(),
            });
        }
    }

    Ok(())
}

/// Checks that a record stored under `key` embeds the same id.
///
/// # Errors
///
/// Returns [`DomainError::RecordKeyMismatch`] when they differ.
pub fn validate_record_key(
    collection: &'static str,
    key: &str,
    embedded: &str,
) -> Result<(), DomainError> {
    if key == embedded {
        Ok(())
    } else {
        Err(DomainError::RecordKeyMismatch {
            collection,
            key: key.to_string(),
            embedded: embedded.to_string(),
        })
    }
}
