// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_domain::{
    ApplicationId, ApplicationStatus, Assignment, AssignmentId, Shift, ShiftId, ShiftStatus, Week,
    WeekId, WorkerId,
};
use time::OffsetDateTime;

/// A single record mutation.
///
/// Field-level variants touch only the named field so that a write does
/// not clobber unrelated fields another writer may have changed since the
/// roster was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Writes a whole week record.
    PutWeek(Week),
    /// Flips a week to closed.
    CloseWeek {
        /// The week.
        week_id: WeekId,
        /// The new `updated_at`.
        updated_at: OffsetDateTime,
    },
    /// Deletes a week record.
    DeleteWeek(WeekId),
    /// Writes a whole shift record.
    PutShift(Shift),
    /// Deletes a shift record.
    DeleteShift(ShiftId),
    /// Replaces a shift's assigned workers.
    SetAssignedWorkers {
        /// The shift.
        shift_id: ShiftId,
        /// The full new list.
        workers: Vec<WorkerId>,
    },
    /// Replaces a shift's status.
    SetShiftStatus {
        /// The shift.
        shift_id: ShiftId,
        /// The new status.
        status: ShiftStatus,
    },
    /// Replaces an application's status.
    SetApplicationStatus {
        /// The application.
        application_id: ApplicationId,
        /// The new status.
        status: ApplicationStatus,
    },
    /// Replaces a worker's credited hours.
    SetWorkerHours {
        /// The worker.
        worker_id: WorkerId,
        /// The new total.
        hours_assigned: u32,
    },
    /// Writes an assignment record.
    PutAssignment(Assignment),
    /// Deletes an assignment record.
    DeleteAssignment(AssignmentId),
}

/// Changes meant to be committed together in one atomic write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    /// Creates an empty change set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Appends a change.
    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Whether there is nothing to write.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// The changes in insertion order.
    #[must_use]
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Iterates over the changes.
    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }
}

impl Extend<Change> for ChangeSet {
    fn extend<I: IntoIterator<Item = Change>>(&mut self, iter: I) {
        self.changes.extend(iter);
    }
}

impl IntoIterator for ChangeSet {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
