// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod calendar;
mod error;
mod ids;
mod policy;
mod shift;
mod types;
mod validation;
mod week;

#[cfg(test)]
mod tests;

pub use calendar::{
    DAYS_PER_WEEK, add_days, assignment_id_for, ensure_monday, format_timestamp, iso_date,
    parse_date, parse_timestamp, parse_week_id, shift_id_for, timestamp, week_dates, week_id_for,
    week_start,
};
pub use error::DomainError;
pub use ids::{ApplicationId, AssignmentId, ShiftId, WeekId, WorkerId};
pub use policy::{
    DEFAULT_CLOSED_LEAD_WEEKS, DEFAULT_CREATED_BY, DEFAULT_HOUR_CAP, DEFAULT_RETENTION_COUNT,
    DEFAULT_SHIFT_HOURS, SchedulingPolicy,
};
pub use shift::{Shift, ShiftStatus};
pub use types::{Application, ApplicationStatus, Assignment, ContractType, Worker};
pub use validation::{validate_record_key, validate_shift, validate_week};
pub use week::{Week, WeekStatus};
