// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operations exposed to callers.
//!
//! Every handler follows the same shape: validate the request, read what it
//! needs from the store, plan with the core crate, commit the planned
//! changes as one batch, and translate the result into a response DTO.
//! Nothing is held between calls; each invocation starts from a fresh read.

use std::str::FromStr;

use roster::{
    AssignOutcome, Change, ChangeSet, Discrepancy, MatchOutcome, RankingSignal, ShiftSelection,
    UnassignOutcome, WeekRemoval, WindowPlan, match_applications, plan_assign_one, plan_pruning,
    plan_unassign_one, plan_window,
};
use roster_domain::{
    ApplicationId, SchedulingPolicy, Shift, ShiftId, ShiftStatus, Week, WeekId, WorkerId,
};
use roster_store::{RecordStore, StorePath};
use serde_json::Value;
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::{ApiError, translate_core_error, translate_domain_error, translate_store_error};
use crate::records::{Collection, LoadedRoster, commit, load_roster, load_weeks, record_path};
use crate::request_response::{
    AssignOneRequest, AssignOneResponse, AssignmentInfo, ConsistencyResponse, DiscrepancyInfo,
    LifecycleResponse, PlanningRequest, PlanningResponse, QuarantinedRecord, ShiftFillInfo,
    ShiftStatusRequest, ShiftStatusResponse, UnassignOneRequest, UnassignOneResponse,
};

/// Returns a required text field, trimmed.
fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ApiError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::InvalidInput {
            field: field.to_string(),
            message: String::from("is required"),
        })
}

/// Returns a required identifier, checked to be usable as a record key.
fn required_id(field: &str, value: Option<&str>) -> Result<String, ApiError> {
    let id: &str = required(field, value)?;
    StorePath::root()
        .child(id)
        .map_err(|e| ApiError::InvalidInput {
            field: field.to_string(),
            message: e.to_string(),
        })?;
    Ok(id.to_string())
}

fn merge_quarantined(into: &mut Vec<QuarantinedRecord>, more: Vec<QuarantinedRecord>) {
    for record in more {
        if !into.contains(&record) {
            into.push(record);
        }
    }
}

fn ids<T: ToString>(items: &[T]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// Brings the rolling window of weeks up to date.
///
/// This function:
/// - Reads every week
/// - Deletes weeks that ended before the current week (one batch)
/// - Closes the nearest weeks to applications (one batch)
/// - Appends weeks up to the retention count, each week with its seven
///   shifts as its own batch
/// - Re-reads and deletes anything outside the most recent weeks (one batch)
///
/// Running it twice for the same `today` writes nothing the second time.
/// A failure aborts the remaining steps; steps already committed stay
/// committed and the next run picks up from there.
///
/// # Arguments
///
/// * `store` - The record store
/// * `today` - The current date in the scheduling timezone
/// * `now` - Timestamp for created and updated records
/// * `policy` - Window and shift rules
///
/// # Errors
///
/// Returns an error if:
/// - The policy is invalid
/// - Any read or write fails
pub async fn run_lifecycle<S: RecordStore>(
    store: &S,
    today: Date,
    now: OffsetDateTime,
    policy: &SchedulingPolicy,
) -> Result<LifecycleResponse, ApiError> {
    let (weeks, quarantined): (Vec<Week>, Vec<QuarantinedRecord>) = load_weeks(store).await?;
    let plan: WindowPlan = plan_window(&weeks, today, now, policy).map_err(translate_core_error)?;

    let mut response: LifecycleResponse = LifecycleResponse {
        today: today.to_string(),
        quarantined,
        ..LifecycleResponse::default()
    };

    if !plan.retirement.changes.is_empty() {
        commit(store, &plan.retirement.changes, "retiring elapsed weeks").await?;
        response.batches_written += 1;
        response.retired_weeks = ids(&plan.retirement.week_ids);
        info!(weeks = ?response.retired_weeks, "Retired elapsed weeks");
    }

    if !plan.closure.changes.is_empty() {
        commit(store, &plan.closure.changes, "closing weeks").await?;
        response.batches_written += 1;
        response.closed_weeks = ids(&plan.closure.week_ids);
        info!(weeks = ?response.closed_weeks, "Closed weeks to applications");
    }

    for addition in &plan.additions {
        commit(store, &addition.changes(), "creating week").await?;
        response.batches_written += 1;
        response.created_shifts += addition.shifts.len();
        response.created_weeks.push(addition.week.week_id.to_string());
        info!(
            week_id = %addition.week.week_id,
            start_date = %addition.week.start_date,
            status = %addition.week.status,
            "Created week"
        );
    }

    let (weeks, quarantined): (Vec<Week>, Vec<QuarantinedRecord>) = load_weeks(store).await?;
    merge_quarantined(&mut response.quarantined, quarantined);
    let pruning: WeekRemoval = plan_pruning(&weeks, policy).map_err(translate_core_error)?;
    if !pruning.changes.is_empty() {
        commit(store, &pruning.changes, "pruning weeks").await?;
        response.batches_written += 1;
        response.pruned_weeks = ids(&pruning.week_ids);
        info!(weeks = ?response.pruned_weeks, "Pruned weeks outside the window");
    }

    if response.batches_written == 0 {
        debug!(today = %today, "Week window already up to date");
    }
    Ok(response)
}

/// Resolves which shifts a planning request covers.
fn parse_selection(request: &PlanningRequest) -> Result<ShiftSelection, ApiError> {
    match (&request.week_id, &request.shift_ids) {
        (Some(week_id), None) => {
            let week_id: String = required_id("week_id", Some(week_id))?;
            Ok(ShiftSelection::Week(WeekId::new(week_id)))
        }
        (None, Some(shift_ids)) => {
            if shift_ids.is_empty() {
                return Err(ApiError::InvalidInput {
                    field: String::from("shift_ids"),
                    message: String::from("must name at least one shift"),
                });
            }
            let mut selected: Vec<ShiftId> = Vec::with_capacity(shift_ids.len());
            for shift_id in shift_ids {
                selected.push(ShiftId::new(required_id("shift_ids", Some(shift_id))?));
            }
            Ok(ShiftSelection::Shifts(selected))
        }
        (Some(_), Some(_)) => Err(ApiError::InvalidInput {
            field: String::from("week_id"),
            message: String::from("give either week_id or shift_ids, not both"),
        }),
        (None, None) => Err(ApiError::InvalidInput {
            field: String::from("week_id"),
            message: String::from("either week_id or shift_ids is required"),
        }),
    }
}

/// Runs the assignment engine over a week or a list of shifts.
///
/// This function:
/// - Validates the selection and ranking signal
/// - Reads every collection
/// - Matches pending applications to open slots by contract tier, then
///   application date or ranking
/// - Commits every resulting change as a single batch
///
/// Capacity and the hour cap are checked against the state read at the
/// start of the run. Two runs over the same shifts at the same time can
/// both fill the same slot; [`check_consistency`] reports the overfill.
///
/// # Errors
///
/// Returns an error if:
/// - The request is malformed
/// - The week or a listed shift does not exist
/// - Any read or the write fails
pub async fn run_assignment_engine<S: RecordStore>(
    store: &S,
    request: &PlanningRequest,
    now: OffsetDateTime,
    policy: &SchedulingPolicy,
) -> Result<PlanningResponse, ApiError> {
    let selection: ShiftSelection = parse_selection(request)?;
    let ranking: RankingSignal = match request.ranking.as_deref() {
        None => RankingSignal::default(),
        Some(raw) => {
            RankingSignal::from_str(raw.trim()).map_err(|message| ApiError::InvalidInput {
                field: String::from("ranking"),
                message,
            })?
        }
    };
    policy.validate().map_err(translate_domain_error)?;

    let loaded: LoadedRoster = load_roster(store, &Collection::ALL).await?;
    let shifts: Vec<Shift> = loaded
        .roster
        .select_shifts(&selection)
        .map_err(translate_core_error)?;

    let outcome: MatchOutcome = match_applications(
        &shifts,
        &loaded.roster.workers,
        loaded.roster.applications.values(),
        now,
        policy,
        ranking,
    );
    for warning in &outcome.warnings {
        warn!(%warning, "Assignment engine warning");
    }

    let committed: bool = !outcome.changes.is_empty();
    if committed {
        commit(store, &outcome.changes, "committing assignment run").await?;
    }
    info!(
        shifts = shifts.len(),
        assignments = outcome.assignments.len(),
        %ranking,
        "Assignment engine run complete"
    );

    Ok(PlanningResponse {
        assignments: outcome
            .assignments
            .iter()
            .map(|a| AssignmentInfo {
                assignment_id: a.assignment_id.to_string(),
                shift_id: a.shift_id.to_string(),
                worker_id: a.worker_id.to_string(),
            })
            .collect(),
        shifts: outcome
            .fills
            .iter()
            .map(|fill| ShiftFillInfo {
                shift_id: fill.shift_id.to_string(),
                max_workers: fill.max_workers,
                assigned_before: fill.assigned_before,
                selected: ids(&fill.selected),
                skipped_for_hour_cap: ids(&fill.skipped_for_hour_cap),
            })
            .collect(),
        warnings: outcome.warnings.iter().map(ToString::to_string).collect(),
        quarantined: loaded.quarantined,
        committed,
    })
}

/// Confirms one application onto its shift.
///
/// This function:
/// - Validates the request
/// - Reads the scheduling collections fresh
/// - Checks capacity, then the hour cap for hour-capped workers
/// - Commits the assignment as a single batch
///
/// Confirming an application that is already confirmed writes nothing.
///
/// # Errors
///
/// Returns an error if:
/// - A field is missing or malformed
/// - The shift, application, or worker does not exist
/// - The application belongs to another shift
/// - The shift is full or the worker would exceed the hour cap
/// - Any read or the write fails
pub async fn assign_one<S: RecordStore>(
    store: &S,
    request: &AssignOneRequest,
    now: OffsetDateTime,
    policy: &SchedulingPolicy,
) -> Result<AssignOneResponse, ApiError> {
    let shift_id: ShiftId = ShiftId::new(required_id("shift_id", request.shift_id.as_deref())?);
    let application_id: ApplicationId = ApplicationId::new(required_id(
        "application_id",
        request.application_id.as_deref(),
    )?);

    let loaded: LoadedRoster = load_roster(store, &Collection::SCHEDULING).await?;
    let outcome: AssignOutcome =
        plan_assign_one(&loaded.roster, &shift_id, &application_id, now, policy)
            .map_err(translate_core_error)?;

    match outcome {
        AssignOutcome::AlreadyAssigned { worker_id } => {
            debug!(%shift_id, %worker_id, "Worker already assigned to shift");
            let hours_assigned: Option<u32> =
                loaded.roster.workers.get(&worker_id).map(|w| w.hours_assigned);
            Ok(AssignOneResponse {
                shift_id: shift_id.to_string(),
                application_id: application_id.to_string(),
                worker_id: worker_id.to_string(),
                already_assigned: true,
                assignment_id: None,
                hours_assigned,
            })
        }
        AssignOutcome::Assigned {
            worker_id,
            changes,
            assignment,
            hours_assigned,
        } => {
            commit(store, &changes, "assigning worker").await?;
            info!(%shift_id, %worker_id, %application_id, hours_assigned, "Assigned worker to shift");
            Ok(AssignOneResponse {
                shift_id: shift_id.to_string(),
                application_id: application_id.to_string(),
                worker_id: worker_id.to_string(),
                already_assigned: false,
                assignment_id: assignment.map(|a| a.assignment_id.to_string()),
                hours_assigned: Some(hours_assigned),
            })
        }
    }
}

/// Reverts one worker's assignment to a shift.
///
/// Applications go back to applied, assignment records are deleted, the
/// worker leaves the shift, and hour-capped workers get their shift hours
/// back (never below zero). All of it is one batch.
///
/// # Errors
///
/// Returns an error if:
/// - A field is missing or malformed
/// - The shift does not exist or the worker is not assigned to it
/// - Any read or the write fails
pub async fn unassign_one<S: RecordStore>(
    store: &S,
    request: &UnassignOneRequest,
    policy: &SchedulingPolicy,
) -> Result<UnassignOneResponse, ApiError> {
    let shift_id: ShiftId = ShiftId::new(required_id("shift_id", request.shift_id.as_deref())?);
    let worker_id: WorkerId = WorkerId::new(required_id("worker_id", request.worker_id.as_deref())?);

    let loaded: LoadedRoster = load_roster(store, &Collection::SCHEDULING).await?;
    let outcome: UnassignOutcome =
        plan_unassign_one(&loaded.roster, &shift_id, &worker_id, policy)
            .map_err(translate_core_error)?;

    commit(store, &outcome.changes, "unassigning worker").await?;
    info!(
        %shift_id,
        %worker_id,
        was_assigned = outcome.was_assigned,
        "Unassigned worker from shift"
    );

    Ok(UnassignOneResponse {
        shift_id: shift_id.to_string(),
        worker_id: worker_id.to_string(),
        was_assigned: outcome.was_assigned,
        reverted_applications: ids(&outcome.reverted_applications),
        removed_assignments: ids(&outcome.removed_assignments),
        hours_assigned: outcome.hours_assigned,
    })
}

/// Sets the status of one shift.
///
/// This function:
/// - Rejects a request missing either field before touching the store
/// - Parses the status
/// - Checks the shift exists
/// - Writes only the shift's status field
///
/// # Errors
///
/// Returns an error if:
/// - `shift_id` or `status` is missing, or the status is unknown
/// - The shift does not exist
/// - The read or the write fails
pub async fn update_shift_status<S: RecordStore>(
    store: &S,
    request: &ShiftStatusRequest,
) -> Result<ShiftStatusResponse, ApiError> {
    let shift_id: String = required_id("shift_id", request.shift_id.as_deref())?;
    let status: ShiftStatus = ShiftStatus::from_str(required("status", request.status.as_deref())?)
        .map_err(translate_domain_error)?;

    let operation: &str = "updating shift status";
    let path: StorePath =
        record_path(Collection::Shifts, &shift_id).map_err(|e| translate_store_error(e, operation))?;
    let existing: Option<Value> = store
        .read(&path)
        .await
        .map_err(|e| translate_store_error(e, operation))?;
    if existing.is_none() {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Shift"),
            message: format!("Shift '{shift_id}' does not exist"),
        });
    }

    let mut changes: ChangeSet = ChangeSet::new();
    changes.push(Change::SetShiftStatus {
        shift_id: ShiftId::new(shift_id.as_str()),
        status,
    });
    commit(store, &changes, operation).await?;
    info!(shift_id = %shift_id, %status, "Updated shift status");

    Ok(ShiftStatusResponse {
        shift_id,
        status: status.as_str().to_string(),
    })
}

/// Reports drift between shifts, workers, applications and assignment
/// records. Nothing is written.
///
/// # Errors
///
/// Returns an error if any read fails.
pub async fn check_consistency<S: RecordStore>(
    store: &S,
    policy: &SchedulingPolicy,
) -> Result<ConsistencyResponse, ApiError> {
    let loaded: LoadedRoster = load_roster(store, &Collection::ALL).await?;
    let discrepancies: Vec<Discrepancy> = roster::check_consistency(&loaded.roster, policy);
    for discrepancy in &discrepancies {
        warn!(kind = discrepancy.kind(), %discrepancy, "Consistency check found drift");
    }
    info!(
        discrepancies = discrepancies.len(),
        quarantined = loaded.quarantined.len(),
        "Consistency check complete"
    );

    Ok(ConsistencyResponse {
        discrepancies: discrepancies
            .iter()
            .map(|d| DiscrepancyInfo {
                kind: d.kind().to_string(),
                message: d.to_string(),
            })
            .collect(),
        quarantined: loaded.quarantined,
    })
}
