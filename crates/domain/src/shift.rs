// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

use crate::calendar::{self, iso_date};
use crate::error::DomainError;
use crate::ids::{ShiftId, WeekId, WorkerId};
use crate::policy::SchedulingPolicy;

/// Whether a shift takes workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    /// The shift is staffed.
    Active,
    /// The shift does not operate.
    Closed,
}

impl ShiftStatus {
    /// Converts this status to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for ShiftStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidShiftStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One calendar day of work within a week.
///
/// `assigned_workers` has set semantics but keeps insertion order so the
/// order in which workers were confirmed stays visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Derived from `date`.
    pub shift_id: ShiftId,
    /// The week this shift belongs to.
    pub week_id: WeekId,
    /// The calendar day.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Whether the shift operates.
    pub status: ShiftStatus,
    /// Capacity, set by an operator.
    #[serde(default)]
    pub max_workers: u32,
    /// Workers confirmed for this shift.
    #[serde(default)]
    pub assigned_workers: Vec<WorkerId>,
}

impl Shift {
    /// Creates an empty shift for `date` with no capacity.
    ///
    /// The policy's non-operating weekday is created closed.
    #[must_use]
    pub fn new(week_id: WeekId, date: Date, policy: &SchedulingPolicy) -> Self {
        let status: ShiftStatus = if date.weekday() == policy.non_operating_day {
            ShiftStatus::Closed
        } else {
            ShiftStatus::Active
        };
        Self {
            shift_id: calendar::shift_id_for(date),
            week_id,
            date,
            status,
            max_workers: 0,
            assigned_workers: Vec::new(),
        }
    }

    /// Number of open slots. Closed shifts have none.
    #[must_use]
    pub fn remaining_capacity(&self) -> usize {
        if self.status == ShiftStatus::Closed {
            return 0;
        }
        usize::try_from(self.max_workers)
            .unwrap_or(usize::MAX)
            .saturating_sub(self.assigned_workers.len())
    }

    /// Whether `worker_id` is assigned to this shift.
    #[must_use]
    pub fn has_worker(&self, worker_id: &WorkerId) -> bool {
        self.assigned_workers.contains(worker_id)
    }

    /// Appends `worker_id` unless already present. Returns whether it was added.
    pub fn add_worker(&mut self, worker_id: WorkerId) -> bool {
        if self.has_worker(&worker_id) {
            return false;
        }
        self.assigned_workers.push(worker_id);
        true
    }

    /// Removes `worker_id`. Returns whether it was present.
    pub fn remove_worker(&mut self, worker_id: &WorkerId) -> bool {
        let before: usize = self.assigned_workers.len();
        self.assigned_workers.retain(|w| w != worker_id);
        before != self.assigned_workers.len()
    }
}
