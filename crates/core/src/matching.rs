// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Automatic matching of pending applications to shift capacity.
//!
//! Shifts are processed one after another. Candidates are served by
//! contract tier (CDI, then CDD, then hour-capped), earliest application
//! first inside the permanent tiers and by ranking inside the hour-capped
//! tier. Hours are tracked on a working copy of the worker map so that a
//! worker matched on an earlier shift in the same run is checked against
//! the cap with those hours already counted.

use std::collections::{BTreeMap, BTreeSet};

use roster_domain::{
    Application, ApplicationId, ApplicationStatus, Assignment, ContractType, SchedulingPolicy,
    Shift, ShiftId, Worker, WorkerId,
};
use time::OffsetDateTime;

use crate::change::{Change, ChangeSet};
use crate::ranking::RankingSignal;

/// A non-fatal condition met while matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchWarning {
    /// The application names a worker with no worker record.
    UnknownWorker {
        /// The application.
        application_id: ApplicationId,
        /// The missing worker.
        worker_id: WorkerId,
        /// The shift applied for.
        shift_id: ShiftId,
    },
    /// More than one pending application exists for the same worker and shift.
    DuplicateApplication {
        /// The shift.
        shift_id: ShiftId,
        /// The worker.
        worker_id: WorkerId,
        /// The application that was considered.
        kept: ApplicationId,
        /// The application that was ignored.
        ignored: ApplicationId,
    },
    /// A pending application names a worker the shift already has.
    AlreadyAssigned {
        /// The application.
        application_id: ApplicationId,
        /// The worker.
        worker_id: WorkerId,
        /// The shift.
        shift_id: ShiftId,
    },
}

impl std::fmt::Display for MatchWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownWorker {
                application_id,
                worker_id,
                shift_id,
            } => write!(
                f,
                "Application '{application_id}' for shift '{shift_id}' names unknown worker '{worker_id}'"
            ),
            Self::DuplicateApplication {
                shift_id,
                worker_id,
                kept,
                ignored,
            } => write!(
                f,
                "Worker '{worker_id}' has several pending applications for shift '{shift_id}'; using '{kept}', ignoring '{ignored}'"
            ),
            Self::AlreadyAssigned {
                application_id,
                worker_id,
                shift_id,
            } => write!(
                f,
                "Application '{application_id}' is pending but worker '{worker_id}' is already on shift '{shift_id}'"
            ),
        }
    }
}

/// What matching did to one shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftFill {
    /// The shift.
    pub shift_id: ShiftId,
    /// Its capacity.
    pub max_workers: u32,
    /// Workers assigned before the run.
    pub assigned_before: usize,
    /// Workers selected in this run, in selection order.
    pub selected: Vec<WorkerId>,
    /// Hour-capped candidates passed over because of the cap.
    pub skipped_for_hour_cap: Vec<WorkerId>,
}

/// The result of matching a set of shifts.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// Every write the run needs, as one batch.
    pub changes: ChangeSet,
    /// Assignment records created.
    pub assignments: Vec<Assignment>,
    /// Per-shift results, in processing order.
    pub fills: Vec<ShiftFill>,
    /// Conditions the caller should surface.
    pub warnings: Vec<MatchWarning>,
    /// The worker map with hours updated for every selection.
    pub workers: BTreeMap<WorkerId, Worker>,
}

struct Candidate<'a> {
    application: &'a Application,
    contract_type: ContractType,
}

/// Matches pending applications to the open slots of `shifts`.
///
/// `applications` may contain applications for other shifts and in any
/// status; only pending applications for the given shifts are considered.
///
/// # Arguments
///
/// * `shifts` - The shifts to fill, processed in the given order
/// * `workers` - The full worker map
/// * `applications` - Applications to draw candidates from
/// * `now` - Timestamp recorded on new assignment records
/// * `policy` - Shift hours and hour cap
/// * `ranking` - Ordering of the hour-capped tier
#[must_use]
pub fn match_applications<'a, I>(
    shifts: &[Shift],
    workers: &BTreeMap<WorkerId, Worker>,
    applications: I,
    now: OffsetDateTime,
    policy: &SchedulingPolicy,
    ranking: RankingSignal,
) -> MatchOutcome
where
    I: IntoIterator<Item = &'a Application>,
{
    let selected_shifts: BTreeSet<&ShiftId> = shifts.iter().map(|s| &s.shift_id).collect();
    let mut pending: BTreeMap<&ShiftId, Vec<&Application>> = BTreeMap::new();
    for application in applications {
        if application.is_pending() && selected_shifts.contains(&application.shift_id) {
            pending
                .entry(&application.shift_id)
                .or_default()
                .push(application);
        }
    }

    let mut working: BTreeMap<WorkerId, Worker> = workers.clone();
    let mut changes: ChangeSet = ChangeSet::new();
    let mut assignments: Vec<Assignment> = Vec::new();
    let mut fills: Vec<ShiftFill> = Vec::with_capacity(shifts.len());
    let mut warnings: Vec<MatchWarning> = Vec::new();

    for shift in shifts {
        let mut fill: ShiftFill = ShiftFill {
            shift_id: shift.shift_id.clone(),
            max_workers: shift.max_workers,
            assigned_before: shift.assigned_workers.len(),
            selected: Vec::new(),
            skipped_for_hour_cap: Vec::new(),
        };

        let mut remaining: usize = shift.remaining_capacity();
        let shift_pending: &[&Application] = pending
            .get(&shift.shift_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if remaining == 0 || shift_pending.is_empty() {
            fills.push(fill);
            continue;
        }

        let mut candidates: Vec<Candidate<'_>> =
            collect_candidates(shift, shift_pending, &working, &mut warnings);
        candidates.sort_by(|a, b| {
            a.contract_type.cmp(&b.contract_type).then_with(|| {
                if a.contract_type.is_hour_capped() {
                    match (
                        working.get(&a.application.worker_id),
                        working.get(&b.application.worker_id),
                    ) {
                        (Some(wa), Some(wb)) => ranking.compare(wa, wb),
                        _ => a.application.worker_id.cmp(&b.application.worker_id),
                    }
                } else {
                    a.application
                        .application_date
                        .cmp(&b.application.application_date)
                        .then_with(|| a.application.worker_id.cmp(&b.application.worker_id))
                }
            })
        });

        let mut filled: Shift = shift.clone();
        for candidate in candidates {
            if remaining == 0 {
                break;
            }
            let application: &Application = candidate.application;
            let Some(worker) = working.get_mut(&application.worker_id) else {
                continue;
            };
            if worker.is_hour_capped() {
                if policy.exceeds_hour_cap(worker.hours_assigned) {
                    fill.skipped_for_hour_cap.push(worker.worker_id.clone());
                    continue;
                }
                worker.hours_assigned = worker.hours_assigned.saturating_add(policy.shift_hours);
            }

            let assignment: Assignment =
                Assignment::new(shift.shift_id.clone(), worker.worker_id.clone(), now);
            changes.push(Change::SetApplicationStatus {
                application_id: application.application_id.clone(),
                status: ApplicationStatus::Assigned,
            });
            changes.push(Change::PutAssignment(assignment.clone()));
            assignments.push(assignment);
            filled.add_worker(worker.worker_id.clone());
            fill.selected.push(worker.worker_id.clone());
            remaining -= 1;
        }

        if !fill.selected.is_empty() {
            changes.push(Change::SetAssignedWorkers {
                shift_id: shift.shift_id.clone(),
                workers: filled.assigned_workers,
            });
        }
        fills.push(fill);
    }

    for (worker_id, worker) in &working {
        let before: Option<u32> = workers.get(worker_id).map(|w| w.hours_assigned);
        if before != Some(worker.hours_assigned) {
            changes.push(Change::SetWorkerHours {
                worker_id: worker_id.clone(),
                hours_assigned: worker.hours_assigned,
            });
        }
    }

    MatchOutcome {
        changes,
        assignments,
        fills,
        warnings,
        workers: working,
    }
}

/// Filters a shift's pending applications down to one eligible candidate
/// per worker, recording why any were dropped.
fn collect_candidates<'a>(
    shift: &Shift,
    pending: &[&'a Application],
    workers: &BTreeMap<WorkerId, Worker>,
    warnings: &mut Vec<MatchWarning>,
) -> Vec<Candidate<'a>> {
    let mut ordered: Vec<&'a Application> = pending.to_vec();
    ordered.sort_by(|a, b| {
        a.application_date
            .cmp(&b.application_date)
            .then_with(|| a.application_id.cmp(&b.application_id))
    });

    let mut seen: BTreeMap<&WorkerId, &ApplicationId> = BTreeMap::new();
    let mut candidates: Vec<Candidate<'a>> = Vec::with_capacity(ordered.len());
    for application in ordered {
        if let Some(kept) = seen.get(&application.worker_id) {
            warnings.push(MatchWarning::DuplicateApplication {
                shift_id: shift.shift_id.clone(),
                worker_id: application.worker_id.clone(),
                kept: (*kept).clone(),
                ignored: application.application_id.clone(),
            });
            continue;
        }
        seen.insert(&application.worker_id, &application.application_id);

        if shift.has_worker(&application.worker_id) {
            warnings.push(MatchWarning::AlreadyAssigned {
                application_id: application.application_id.clone(),
                worker_id: application.worker_id.clone(),
                shift_id: shift.shift_id.clone(),
            });
            continue;
        }

        let Some(worker) = workers.get(&application.worker_id) else {
            warnings.push(MatchWarning::UnknownWorker {
                application_id: application.application_id.clone(),
                worker_id: application.worker_id.clone(),
                shift_id: shift.shift_id.clone(),
            });
            continue;
        };

        candidates.push(Candidate {
            application,
            contract_type: worker.contract_type,
        });
    }
    candidates
}
