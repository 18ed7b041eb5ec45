// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Detection of drift between records that no single write keeps in step.
//!
//! Concurrent writers can leave a shift over capacity, a worker over the
//! hour cap, or assignment records out of step with `assigned_workers`.
//! The sweep only reports; repairing is left to an operator.

use roster_domain::{
    ApplicationId, ApplicationStatus, AssignmentId, SchedulingPolicy, ShiftId, WorkerId,
};

use crate::state::Roster;

/// One detected inconsistency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    /// More workers are assigned than the shift allows.
    OverCapacity {
        shift_id: ShiftId,
        max_workers: u32,
        assigned: usize,
    },
    /// An hour-capped worker holds more hours than the cap.
    OverHourCap {
        worker_id: WorkerId,
        hours_assigned: u32,
        hour_cap: u32,
    },
    /// A worker is on a shift without an assignment record.
    MissingAssignmentRecord {
        shift_id: ShiftId,
        worker_id: WorkerId,
    },
    /// An assignment record exists for a worker not on the shift.
    OrphanedAssignmentRecord {
        assignment_id: AssignmentId,
        shift_id: ShiftId,
        worker_id: WorkerId,
    },
    /// An application is marked assigned but the worker is not on the shift.
    AssignedApplicationWithoutMembership {
        application_id: ApplicationId,
        shift_id: ShiftId,
        worker_id: WorkerId,
    },
}

impl Discrepancy {
    /// Stable snake-case name of the discrepancy kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::OverCapacity { .. } => "over_capacity",
            Self::OverHourCap { .. } => "over_hour_cap",
            Self::MissingAssignmentRecord { .. } => "missing_assignment_record",
            Self::OrphanedAssignmentRecord { .. } => "orphaned_assignment_record",
            Self::AssignedApplicationWithoutMembership { .. } => {
                "assigned_application_without_membership"
            }
        }
    }
}

impl std::fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OverCapacity {
                shift_id,
                max_workers,
                assigned,
            } => write!(
                f,
                "Shift '{shift_id}' has {assigned} workers for {max_workers} slots"
            ),
            Self::OverHourCap {
                worker_id,
                hours_assigned,
                hour_cap,
            } => write!(
                f,
                "Worker '{worker_id}' has {hours_assigned} hours, above the cap of {hour_cap}"
            ),
            Self::MissingAssignmentRecord {
                shift_id,
                worker_id,
            } => write!(
                f,
                "Worker '{worker_id}' is on shift '{shift_id}' without an assignment record"
            ),
            Self::OrphanedAssignmentRecord {
                assignment_id,
                shift_id,
                worker_id,
            } => write!(
                f,
                "Assignment '{assignment_id}' links worker '{worker_id}' to shift '{shift_id}' but the worker is not on it"
            ),
            Self::AssignedApplicationWithoutMembership {
                application_id,
                shift_id,
                worker_id,
            } => write!(
                f,
                "Application '{application_id}' is assigned but worker '{worker_id}' is not on shift '{shift_id}'"
            ),
        }
    }
}

/// Lists every inconsistency in `roster`.
///
/// Records pointing at shifts that no longer exist are not reported; they
/// belong to weeks the lifecycle has already removed.
#[must_use]
pub fn check_consistency(roster: &Roster, policy: &SchedulingPolicy) -> Vec<Discrepancy> {
    let mut found: Vec<Discrepancy> = Vec::new();

    for shift in roster.shifts.values() {
        let assigned: usize = shift.assigned_workers.len();
        if u32::try_from(assigned).unwrap_or(u32::MAX) > shift.max_workers {
            found.push(Discrepancy::OverCapacity {
                shift_id: shift.shift_id.clone(),
                max_workers: shift.max_workers,
                assigned,
            });
        }
        for worker_id in &shift.assigned_workers {
            if roster
                .assignments_for(&shift.shift_id, worker_id)
                .next()
                .is_none()
            {
                found.push(Discrepancy::MissingAssignmentRecord {
                    shift_id: shift.shift_id.clone(),
                    worker_id: worker_id.clone(),
                });
            }
        }
    }

    for worker in roster.workers.values() {
        if worker.is_hour_capped() && worker.hours_assigned > policy.hour_cap {
            found.push(Discrepancy::OverHourCap {
                worker_id: worker.worker_id.clone(),
                hours_assigned: worker.hours_assigned,
                hour_cap: policy.hour_cap,
            });
        }
    }

    for assignment in roster.assignments.values() {
        let Some(shift) = roster.shifts.get(&assignment.shift_id) else {
            continue;
        };
        if !shift.has_worker(&assignment.worker_id) {
            found.push(Discrepancy::OrphanedAssignmentRecord {
                assignment_id: assignment.assignment_id.clone(),
                shift_id: assignment.shift_id.clone(),
                worker_id: assignment.worker_id.clone(),
            });
        }
    }

    for application in roster.applications.values() {
        if application.status != ApplicationStatus::Assigned {
            continue;
        }
        let Some(shift) = roster.shifts.get(&application.shift_id) else {
            continue;
        };
        if !shift.has_worker(&application.worker_id) {
            found.push(Discrepancy::AssignedApplicationWithoutMembership {
                application_id: application.application_id.clone(),
                shift_id: application.shift_id.clone(),
                worker_id: application.worker_id.clone(),
            });
        }
    }

    found
}
