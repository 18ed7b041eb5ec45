// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_domain::{
    Application, ApplicationId, ApplicationStatus, Assignment, AssignmentId, SchedulingPolicy,
    Shift, ShiftId, ShiftStatus, Worker, WorkerId, assignment_id_for,
};
use time::OffsetDateTime;

use crate::change::{Change, ChangeSet};
use crate::error::{CoreError, Entity};
use crate::state::Roster;

/// The result of planning a manual assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    /// The worker is already on the shift with an assigned application.
    AlreadyAssigned {
        /// The worker.
        worker_id: WorkerId,
    },
    /// The assignment needs a write.
    Assigned {
        /// The worker.
        worker_id: WorkerId,
        /// The changes, as one batch.
        changes: ChangeSet,
        /// The assignment record, if one had to be created.
        assignment: Option<Assignment>,
        /// The worker's hours after the write.
        hours_assigned: u32,
    },
}

/// The result of planning a manual unassignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnassignOutcome {
    /// The changes, as one batch.
    pub changes: ChangeSet,
    /// Applications reverted to applied.
    pub reverted_applications: Vec<ApplicationId>,
    /// Assignment records deleted.
    pub removed_assignments: Vec<AssignmentId>,
    /// Whether the worker was listed on the shift.
    pub was_assigned: bool,
    /// The worker's hours after the write, when a worker record exists.
    pub hours_assigned: Option<u32>,
}

/// Plans confirming one application onto its shift.
///
/// Capacity is checked before the hour cap. A worker already on the shift
/// is not re-counted against either.
///
/// # Arguments
///
/// * `roster` - A fresh read of the records involved
/// * `shift_id` - The target shift
/// * `application_id` - The application to confirm
/// * `now` - Timestamp for a new assignment record
/// * `policy` - Shift hours and hour cap
///
/// # Errors
///
/// Returns an error if:
/// - The shift, application, or worker does not exist
/// - The application is for another shift
/// - The shift has no open slot
/// - The worker is hour-capped and one more shift would exceed the cap
pub fn plan_assign_one(
    roster: &Roster,
    shift_id: &ShiftId,
    application_id: &ApplicationId,
    now: OffsetDateTime,
    policy: &SchedulingPolicy,
) -> Result<AssignOutcome, CoreError> {
    let shift: &Shift = roster.shift(shift_id)?;
    let application: &Application = roster.application(application_id)?;
    if &application.shift_id != shift_id {
        return Err(CoreError::ApplicationShiftMismatch {
            application_id: application_id.to_string(),
            requested_shift: shift_id.to_string(),
            application_shift: application.shift_id.to_string(),
        });
    }
    let worker: &Worker = roster.worker(&application.worker_id)?;
    let worker_id: &WorkerId = &worker.worker_id;

    let on_shift: bool = shift.has_worker(worker_id);
    let record_exists: bool = roster.assignments_for(shift_id, worker_id).next().is_some();
    if on_shift && application.status == ApplicationStatus::Assigned {
        return Ok(AssignOutcome::AlreadyAssigned {
            worker_id: worker_id.clone(),
        });
    }

    let mut changes: ChangeSet = ChangeSet::new();
    let mut hours_assigned: u32 = worker.hours_assigned;

    if !on_shift {
        if shift.remaining_capacity() == 0 {
            return Err(CoreError::CapacityExceeded {
                shift_id: shift_id.to_string(),
                max_workers: shift.max_workers,
                assigned: shift.assigned_workers.len(),
                closed: shift.status == ShiftStatus::Closed,
            });
        }
        if worker.is_hour_capped() {
            if policy.exceeds_hour_cap(worker.hours_assigned) {
                return Err(CoreError::LimitExceeded {
                    worker_id: worker_id.to_string(),
                    hours_assigned: worker.hours_assigned,
                    shift_hours: policy.shift_hours,
                    hour_cap: policy.hour_cap,
                });
            }
            hours_assigned = hours_assigned.saturating_add(policy.shift_hours);
            changes.push(Change::SetWorkerHours {
                worker_id: worker_id.clone(),
                hours_assigned,
            });
        }
        let mut updated: Shift = shift.clone();
        updated.add_worker(worker_id.clone());
        changes.push(Change::SetAssignedWorkers {
            shift_id: shift_id.clone(),
            workers: updated.assigned_workers,
        });
    }

    if application.status != ApplicationStatus::Assigned {
        changes.push(Change::SetApplicationStatus {
            application_id: application_id.clone(),
            status: ApplicationStatus::Assigned,
        });
    }

    let assignment: Option<Assignment> = if record_exists {
        None
    } else {
        let assignment: Assignment = Assignment::new(shift_id.clone(), worker_id.clone(), now);
        changes.push(Change::PutAssignment(assignment.clone()));
        Some(assignment)
    };

    Ok(AssignOutcome::Assigned {
        worker_id: worker_id.clone(),
        changes,
        assignment,
        hours_assigned,
    })
}

/// Plans reverting a worker's assignment to a shift.
///
/// Whatever part of the assignment exists is undone: assigned
/// applications go back to applied, assignment records are deleted, and
/// the worker leaves `assigned_workers`. Hours are only given back when
/// the worker was actually listed on the shift.
///
/// # Errors
///
/// Returns [`CoreError::NotFound`] if the shift does not exist or nothing
/// links the worker to it.
pub fn plan_unassign_one(
    roster: &Roster,
    shift_id: &ShiftId,
    worker_id: &WorkerId,
    policy: &SchedulingPolicy,
) -> Result<UnassignOutcome, CoreError> {
    let shift: &Shift = roster.shift(shift_id)?;
    let mut changes: ChangeSet = ChangeSet::new();

    let reverted_applications: Vec<ApplicationId> = roster
        .applications_for(shift_id, worker_id)
        .filter(|a| a.status == ApplicationStatus::Assigned)
        .map(|a| a.application_id.clone())
        .collect();
    for application_id in &reverted_applications {
        changes.push(Change::SetApplicationStatus {
            application_id: application_id.clone(),
            status: ApplicationStatus::Applied,
        });
    }

    let removed_assignments: Vec<AssignmentId> = roster
        .assignments_for(shift_id, worker_id)
        .map(|a| a.assignment_id.clone())
        .collect();
    changes.extend(
        removed_assignments
            .iter()
            .cloned()
            .map(Change::DeleteAssignment),
    );

    let mut updated: Shift = shift.clone();
    let was_assigned: bool = updated.remove_worker(worker_id);
    let mut hours_assigned: Option<u32> = roster.workers.get(worker_id).map(|w| w.hours_assigned);
    if was_assigned {
        changes.push(Change::SetAssignedWorkers {
            shift_id: shift_id.clone(),
            workers: updated.assigned_workers,
        });
        if let Some(worker) = roster.workers.get(worker_id).filter(|w| w.is_hour_capped()) {
            let reduced: u32 = worker.hours_assigned.saturating_sub(policy.shift_hours);
            hours_assigned = Some(reduced);
            changes.push(Change::SetWorkerHours {
                worker_id: worker_id.clone(),
                hours_assigned: reduced,
            });
        }
    }

    if changes.is_empty() {
        return Err(CoreError::NotFound {
            entity: Entity::Assignment,
            id: assignment_id_for(shift_id, worker_id).to_string(),
        });
    }

    Ok(UnassignOutcome {
        changes,
        reverted_applications,
        removed_assignments,
        was_assigned,
        hours_assigned,
    })
}
