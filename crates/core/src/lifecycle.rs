// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rolling window planning.
//!
//! A lifecycle run is split into steps so each can be committed as its own
//! batch: retire elapsed weeks, close the nearest weeks, append weeks up
//! to the retention count, then (after re-reading) prune anything outside
//! the most recent weeks. Every step is idempotent: planning it again over
//! its own result produces no changes.

use roster_domain::{
    SchedulingPolicy, Shift, ShiftId, Week, WeekId, WeekStatus, add_days, week_dates,
    week_start,
};
use time::{Date, OffsetDateTime};

use crate::change::{Change, ChangeSet};
use crate::error::CoreError;

/// Weeks and shifts to delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekRemoval {
    /// Weeks deleted, earliest first.
    pub week_ids: Vec<WeekId>,
    /// Shifts deleted with them.
    pub shift_ids: Vec<ShiftId>,
    /// The deletes as one batch.
    pub changes: ChangeSet,
}

/// Weeks to flip to closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekClosure {
    /// Weeks closed, earliest first.
    pub week_ids: Vec<WeekId>,
    /// The status updates as one batch.
    pub changes: ChangeSet,
}

/// A new week together with its seven shifts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekAddition {
    /// The new week.
    pub week: Week,
    /// Its shifts, Monday first.
    pub shifts: Vec<Shift>,
}

impl WeekAddition {
    /// The week and its shifts as one batch.
    #[must_use]
    pub fn changes(&self) -> ChangeSet {
        let mut changes: ChangeSet = ChangeSet::new();
        changes.push(Change::PutWeek(self.week.clone()));
        changes.extend(self.shifts.iter().cloned().map(Change::PutShift));
        changes
    }
}

/// The retire, close and add steps of one lifecycle run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowPlan {
    /// Weeks that ended before the current week.
    pub retirement: WeekRemoval,
    /// The nearest weeks still open.
    pub closure: WeekClosure,
    /// Weeks appended to reach the retention count.
    pub additions: Vec<WeekAddition>,
}

impl WindowPlan {
    /// Whether the run has nothing to write.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.retirement.changes.is_empty()
            && self.closure.changes.is_empty()
            && self.additions.is_empty()
    }
}

fn sorted(weeks: &[Week]) -> Vec<&Week> {
    let mut sorted: Vec<&Week> = weeks.iter().collect();
    sorted.sort_by(|a, b| a.start_date.cmp(&b.start_date));
    sorted
}

fn removal_of(weeks: &[&Week]) -> Result<WeekRemoval, CoreError> {
    let mut removal: WeekRemoval = WeekRemoval::default();
    for week in weeks {
        removal.week_ids.push(week.week_id.clone());
        removal
            .changes
            .push(Change::DeleteWeek(week.week_id.clone()));
        // shift ids follow from the dates, so no shift lookup is needed
        for shift_id in week.shift_ids()? {
            removal.shift_ids.push(shift_id.clone());
            removal.changes.push(Change::DeleteShift(shift_id));
        }
    }
    Ok(removal)
}

/// Plans the retire, close and add steps against the weeks read at the
/// start of a run.
///
/// # Arguments
///
/// * `weeks` - Every valid week in the store, in any order
/// * `today` - The current calendar date in the scheduling timezone
/// * `now` - Timestamp recorded on created and updated weeks
/// * `policy` - Window size, lead and shift rules
///
/// # Errors
///
/// Returns an error if the policy is invalid or date arithmetic overflows.
pub fn plan_window(
    weeks: &[Week],
    today: Date,
    now: OffsetDateTime,
    policy: &SchedulingPolicy,
) -> Result<WindowPlan, CoreError> {
    policy.validate()?;

    let ordered: Vec<&Week> = sorted(weeks);
    let current_monday: Date = week_start(today)?;

    let (elapsed, remaining): (Vec<&Week>, Vec<&Week>) = if policy.retire_elapsed_weeks {
        ordered
            .into_iter()
            .partition(|week| week.has_elapsed(current_monday))
    } else {
        (Vec::new(), ordered)
    };
    let retirement: WeekRemoval = removal_of(&elapsed)?;

    let mut closure: WeekClosure = WeekClosure::default();
    for week in remaining.iter().take(policy.closed_lead_weeks) {
        if !week.is_closed_for_applications() {
            closure.week_ids.push(week.week_id.clone());
            closure.changes.push(Change::CloseWeek {
                week_id: week.week_id.clone(),
                updated_at: now,
            });
        }
    }

    let existing: usize = remaining.len();
    let to_add: usize = policy.retention_count.saturating_sub(existing);
    let mut additions: Vec<WeekAddition> = Vec::with_capacity(to_add);
    let mut next_start: Date = match remaining.last() {
        Some(latest) => add_days(latest.start_date, 7)?,
        None => current_monday,
    };
    for offset in 0..to_add {
        let status: WeekStatus = if existing + offset < policy.closed_lead_weeks {
            WeekStatus::Closed
        } else {
            WeekStatus::Open
        };
        let week: Week = Week::new(next_start, status, &policy.created_by, now)?;
        let shifts: Vec<Shift> = week_dates(next_start)?
            .into_iter()
            .map(|date| Shift::new(week.week_id.clone(), date, policy))
            .collect();
        additions.push(WeekAddition { week, shifts });
        next_start = add_days(next_start, 7)?;
    }

    Ok(WindowPlan {
        retirement,
        closure,
        additions,
    })
}

/// Plans deletion of every week outside the most recent
/// `retention_count` weeks, together with their shifts.
///
/// # Errors
///
/// Returns an error if a week's dates overflow the supported range.
pub fn plan_pruning(weeks: &[Week], policy: &SchedulingPolicy) -> Result<WeekRemoval, CoreError> {
    let ordered: Vec<&Week> = sorted(weeks);
    let excess: usize = ordered.len().saturating_sub(policy.retention_count);
    removal_of(&ordered[..excess])
}
