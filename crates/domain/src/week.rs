// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

use crate::calendar::{self, iso_date, timestamp};
use crate::error::DomainError;
use crate::ids::{ShiftId, WeekId};

/// Whether a week still accepts applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStatus {
    /// Workers may apply to the week's shifts.
    Open,
    /// The week is too near (or past) for new applications.
    Closed,
}

impl WeekStatus {
    /// Converts this status to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for WeekStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidWeekStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for WeekStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A seven-day, Monday-aligned scheduling period.
///
/// `is_active` and `is_closed` mirror `status` and are kept for readers
/// that only look at the flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    /// Derived from `start_date`.
    pub week_id: WeekId,
    /// The Monday of the week.
    #[serde(with = "iso_date")]
    pub start_date: Date,
    /// The Sunday of the week.
    #[serde(with = "iso_date")]
    pub end_date: Date,
    /// Whether the week accepts applications.
    pub status: WeekStatus,
    /// `true` exactly when `status` is open.
    pub is_active: bool,
    /// `true` exactly when `status` is closed.
    pub is_closed: bool,
    /// Who created the week.
    pub created_by: String,
    /// When the week was created.
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
    /// When the week was last modified.
    #[serde(with = "timestamp")]
    pub updated_at: OffsetDateTime,
}

impl Week {
    /// Creates a week starting on `start_date`.
    ///
    /// # Errors
    ///
    /// Returns an error if `start_date` is not a Monday or the week
    /// overflows the supported date range.
    pub fn new(
        start_date: Date,
        status: WeekStatus,
        created_by: &str,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        calendar::ensure_monday(start_date)?;
        let end_date: Date = calendar::add_days(start_date, 6)?;
        Ok(Self {
            week_id: calendar::week_id_for(start_date),
            start_date,
            end_date,
            status,
            is_active: status == WeekStatus::Open,
            is_closed: status == WeekStatus::Closed,
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether the week no longer accepts applications.
    #[must_use]
    pub fn is_closed_for_applications(&self) -> bool {
        self.status == WeekStatus::Closed
    }

    /// Whether the week ended before the week starting on `current_monday`.
    #[must_use]
    pub fn has_elapsed(&self, current_monday: Date) -> bool {
        self.end_date < current_monday
    }

    /// The identifiers of the week's seven shifts, Monday first.
    ///
    /// # Errors
    ///
    /// Returns an error if the week's dates overflow the supported range.
    pub fn shift_ids(&self) -> Result<Vec<ShiftId>, DomainError> {
        Ok(calendar::week_dates(self.start_date)?
            .into_iter()
            .map(calendar::shift_id_for)
            .collect())
    }
}
