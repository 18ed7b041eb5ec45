// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Request fields are optional at the type level so a missing field is
//! reported as a validation error naming that field instead of a generic
//! decoding failure.

/// A stored record that could not be decoded and was left out of a read.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuarantinedRecord {
    /// Store path of the record.
    pub path: String,
    /// Why it was rejected.
    pub reason: String,
}

/// API request to change the status of one shift.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ShiftStatusRequest {
    /// The shift to update.
    pub shift_id: Option<String>,
    /// The new status (`active` or `closed`).
    pub status: Option<String>,
}

/// API response for a successful shift status update.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShiftStatusResponse {
    /// The updated shift.
    pub shift_id: String,
    /// Its new status.
    pub status: String,
}

/// API request to run the assignment engine.
///
/// Exactly one of `week_id` and `shift_ids` must be given.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct PlanningRequest {
    /// Every shift of this week.
    pub week_id: Option<String>,
    /// An explicit list of shifts.
    pub shift_ids: Option<Vec<String>>,
    /// Ranking signal for the hour-capped tier. Defaults to points.
    pub ranking: Option<String>,
}

/// One assignment created by a planning run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssignmentInfo {
    /// The assignment record id.
    pub assignment_id: String,
    /// The shift.
    pub shift_id: String,
    /// The worker.
    pub worker_id: String,
}

/// What a planning run did to one shift.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShiftFillInfo {
    /// The shift.
    pub shift_id: String,
    /// Its capacity.
    pub max_workers: u32,
    /// Workers assigned before the run.
    pub assigned_before: usize,
    /// Workers selected by the run, in selection order.
    pub selected: Vec<String>,
    /// Hour-capped candidates passed over because of the cap.
    pub skipped_for_hour_cap: Vec<String>,
}

/// API response for a planning run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlanningResponse {
    /// Assignments created.
    pub assignments: Vec<AssignmentInfo>,
    /// Per-shift results, in processing order.
    pub shifts: Vec<ShiftFillInfo>,
    /// Non-fatal conditions met while matching.
    pub warnings: Vec<String>,
    /// Records left out of the read.
    pub quarantined: Vec<QuarantinedRecord>,
    /// Whether a write was committed.
    pub committed: bool,
}

/// API request to confirm one application onto its shift.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct AssignOneRequest {
    /// The target shift.
    pub shift_id: Option<String>,
    /// The application to confirm.
    pub application_id: Option<String>,
}

/// API response for a manual assignment.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssignOneResponse {
    /// The shift.
    pub shift_id: String,
    /// The application.
    pub application_id: String,
    /// The worker behind the application.
    pub worker_id: String,
    /// True when nothing had to be written.
    pub already_assigned: bool,
    /// The assignment record created, if one was.
    pub assignment_id: Option<String>,
    /// The worker's hours after the write.
    pub hours_assigned: Option<u32>,
}

/// API request to revert one worker's assignment to a shift.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct UnassignOneRequest {
    /// The shift.
    pub shift_id: Option<String>,
    /// The worker to remove.
    pub worker_id: Option<String>,
}

/// API response for a manual unassignment.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UnassignOneResponse {
    /// The shift.
    pub shift_id: String,
    /// The worker.
    pub worker_id: String,
    /// Whether the worker was listed on the shift.
    pub was_assigned: bool,
    /// Applications reverted to applied.
    pub reverted_applications: Vec<String>,
    /// Assignment records deleted.
    pub removed_assignments: Vec<String>,
    /// The worker's hours after the write, when a worker record exists.
    pub hours_assigned: Option<u32>,
}

/// API response for a lifecycle run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LifecycleResponse {
    /// The date the run was computed for (ISO 8601).
    pub today: String,
    /// Elapsed weeks deleted.
    pub retired_weeks: Vec<String>,
    /// Weeks flipped to closed.
    pub closed_weeks: Vec<String>,
    /// Weeks created.
    pub created_weeks: Vec<String>,
    /// Shifts created with them.
    pub created_shifts: usize,
    /// Weeks deleted by the final pruning step.
    pub pruned_weeks: Vec<String>,
    /// Number of write batches committed.
    pub batches_written: usize,
    /// Records left out of the reads.
    pub quarantined: Vec<QuarantinedRecord>,
}

/// One inconsistency found by a consistency sweep.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DiscrepancyInfo {
    /// Stable kind name (`over_capacity`, `over_hour_cap`, ...).
    pub kind: String,
    /// A human-readable description.
    pub message: String,
}

/// API response for a consistency sweep.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConsistencyResponse {
    /// Inconsistencies found.
    pub discrepancies: Vec<DiscrepancyInfo>,
    /// Records left out of the read.
    pub quarantined: Vec<QuarantinedRecord>,
}
