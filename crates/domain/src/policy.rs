// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scheduling policy constants.

use time::Weekday;

use crate::error::DomainError;

/// Number of weeks kept in the rolling window.
pub const DEFAULT_RETENTION_COUNT: usize = 7;
/// Number of nearest weeks closed to new applications.
pub const DEFAULT_CLOSED_LEAD_WEEKS: usize = 2;
/// Hours credited to a worker per assigned shift.
pub const DEFAULT_SHIFT_HOURS: u32 = 8;
/// Maximum accumulated hours for hour-capped workers.
pub const DEFAULT_HOUR_CAP: u32 = 25;
/// Author recorded on weeks created by the lifecycle manager.
pub const DEFAULT_CREATED_BY: &str = "system";

/// Tunable rules shared by the lifecycle manager and the assignment engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingPolicy {
    /// How many of the most recent weeks exist at any time.
    pub retention_count: usize,
    /// How many of the earliest weeks are closed to new applications.
    pub closed_lead_weeks: usize,
    /// Hours added to `hours_assigned` per assignment.
    pub shift_hours: u32,
    /// Upper bound on `hours_assigned` for hour-capped workers.
    pub hour_cap: u32,
    /// The weekday whose shift is a permanently closed placeholder.
    pub non_operating_day: Weekday,
    /// Whether weeks that ended before the current week are removed.
    pub retire_elapsed_weeks: bool,
    /// Author recorded on generated weeks.
    pub created_by: String,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            retention_count: DEFAULT_RETENTION_COUNT,
            closed_lead_weeks: DEFAULT_CLOSED_LEAD_WEEKS,
            shift_hours: DEFAULT_SHIFT_HOURS,
            hour_cap: DEFAULT_HOUR_CAP,
            non_operating_day: Weekday::Saturday,
            retire_elapsed_weeks: true,
            created_by: String::from(DEFAULT_CREATED_BY),
        }
    }
}

impl SchedulingPolicy {
    /// Checks that the policy values are usable together.
    ///
    /// # Errors
    ///
    /// Returns an error if the retention count is zero, the closed lead
    /// exceeds the retention count, or a shift is worth zero hours.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.retention_count == 0 {
            return Err(DomainError::InvalidPolicy {
                reason: String::from("retention count must be at least 1"),
            });
        }
        if self.closed_lead_weeks > self.retention_count {
            return Err(DomainError::InvalidPolicy {
                reason: format!(
                    "closed lead weeks ({}) cannot exceed retention count ({})",
                    self.closed_lead_weeks, self.retention_count
                ),
            });
        }
        if self.shift_hours == 0 {
            return Err(DomainError::InvalidPolicy {
                reason: String::from("shift hours must be greater than 0"),
            });
        }
        Ok(())
    }

    /// Whether one more shift would push `hours_assigned` past the cap.
    #[must_use]
    pub const fn exceeds_hour_cap(&self, hours_assigned: u32) -> bool {
        hours_assigned.saturating_add(self.shift_hours) > self.hour_cap
    }
}
