// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar arithmetic and identifier derivation.
//!
//! Weeks are Monday-aligned and span seven days. Identifiers of
//! deterministic entities are pure functions of their dates:
//!
//! - week id: ISO week label of the Monday, e.g. `2026-W43`
//! - shift id: ISO calendar date, e.g. `2026-10-19`
//! - assignment id: `{shift_id}_{worker_id}`

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, Weekday};

use crate::error::DomainError;
use crate::ids::{AssignmentId, ShiftId, WeekId, WorkerId};

/// Number of days in a scheduling week.
pub const DAYS_PER_WEEK: usize = 7;

/// Returns the Monday on or before `date`.
///
/// # Errors
///
/// Returns an error if the result falls outside the supported date range.
pub fn week_start(date: Date) -> Result<Date, DomainError> {
    let offset: i64 = i64::from(date.weekday().number_days_from_monday());
    date.checked_sub(Duration::days(offset))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("finding the Monday before {date}"),
        })
}

/// Adds `days` to `date`.
///
/// # Errors
///
/// Returns an error if the result falls outside the supported date range.
pub fn add_days(date: Date, days: i64) -> Result<Date, DomainError> {
    date.checked_add(Duration::days(days))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("adding {days} days to {date}"),
        })
}

/// Returns the seven consecutive dates of the week starting on `monday`.
///
/// # Errors
///
/// Returns an error if `monday` is not a Monday or the week overflows the
/// supported date range.
pub fn week_dates(monday: Date) -> Result<[Date; DAYS_PER_WEEK], DomainError> {
    ensure_monday(monday)?;
    let mut dates: [Date; DAYS_PER_WEEK] = [monday; DAYS_PER_WEEK];
    let mut day: i64 = 0;
    for slot in &mut dates {
        *slot = add_days(monday, day)?;
        day += 1;
    }
    Ok(dates)
}

/// Fails unless `date` is a Monday.
///
/// # Errors
///
/// Returns [`DomainError::InvalidWeekStart`] for any other weekday.
pub fn ensure_monday(date: Date) -> Result<(), DomainError> {
    let weekday: Weekday = date.weekday();
    if weekday == Weekday::Monday {
        Ok(())
    } else {
        Err(DomainError::InvalidWeekStart {
            start_date: date,
            weekday,
        })
    }
}

/// Derives the week identifier for the week containing `date`.
#[must_use]
pub fn week_id_for(date: Date) -> WeekId {
    let (year, week, _) = date.to_iso_week_date();
    WeekId::new(format!("{year}-W{week:02}"))
}

/// Parses a week identifier back into its Monday.
///
/// # Errors
///
/// Returns an error if `week_id` is not of the form `YYYY-Www` or names a
/// week that does not exist.
pub fn parse_week_id(week_id: &WeekId) -> Result<Date, DomainError> {
    let invalid = || DomainError::InvalidWeekId(week_id.to_string());
    let (year_text, week_text) = week_id.as_str().split_once("-W").ok_or_else(invalid)?;
    let year: i32 = year_text.parse().map_err(|_| invalid())?;
    let week: u8 = week_text.parse().map_err(|_| invalid())?;
    Date::from_iso_week_date(year, week, Weekday::Monday).map_err(|_| invalid())
}

/// Derives the shift identifier for `date`.
#[must_use]
pub fn shift_id_for(date: Date) -> ShiftId {
    ShiftId::new(date.to_string())
}

/// Derives the assignment identifier for a worker on a shift.
///
/// The same pair always yields the same id, so recording an assignment
/// twice can never produce two records.
#[must_use]
pub fn assignment_id_for(shift_id: &ShiftId, worker_id: &WorkerId) -> AssignmentId {
    AssignmentId::new(format!("{shift_id}_{worker_id}"))
}

/// Parses an ISO calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns a description of the problem when `text` is not a valid date.
pub fn parse_date(text: &str) -> Result<Date, String> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("invalid date '{text}': {e}"))
}

/// Serde adapter storing a [`Date`] as `YYYY-MM-DD`.
pub mod iso_date {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    /// Serializes `date` as `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_string())
    }

    /// Deserializes a `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Fails when the input is not a valid date string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text: String = String::deserialize(deserializer)?;
        super::parse_date(&text).map_err(D::Error::custom)
    }
}

/// Serde adapter storing an [`OffsetDateTime`] as RFC 3339.
///
/// Bare `YYYY-MM-DD` dates are accepted on input as midnight UTC, since
/// records written by other tools sometimes carry only a date.
pub mod timestamp {
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    /// Serializes `value` as RFC 3339.
    ///
    /// # Errors
    ///
    /// Fails when the timestamp cannot be represented in RFC 3339.
    pub fn serialize<S: Serializer>(
        value: &OffsetDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let text: String = super::format_timestamp(*value).map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }

    /// Deserializes an RFC 3339 timestamp or a bare date.
    ///
    /// # Errors
    ///
    /// Fails when the input is neither.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<OffsetDateTime, D::Error> {
        let text: String = String::deserialize(deserializer)?;
        super::parse_timestamp(&text).map_err(D::Error::custom)
    }
}

/// Formats a timestamp as RFC 3339.
///
/// # Errors
///
/// Returns a description of the problem when the value cannot be represented.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, String> {
    value.format(&Rfc3339).map_err(|e| e.to_string())
}

/// Parses an RFC 3339 timestamp, or a bare date as midnight UTC.
///
/// # Errors
///
/// Returns a description of the problem when `text` is neither.
pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, String> {
    if let Ok(value) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(value);
    }
    parse_date(text)
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| format!("invalid timestamp '{text}'"))
}
