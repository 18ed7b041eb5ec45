// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::{Date, Weekday};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A week must start on a Monday.
    InvalidWeekStart {
        /// The offending start date.
        start_date: Date,
        /// The actual weekday of `start_date`.
        weekday: Weekday,
    },
    /// A week must span exactly seven calendar days.
    InvalidWeekSpan {
        /// The week identifier.
        week_id: String,
        /// The recorded start date.
        start_date: Date,
        /// The recorded end date.
        end_date: Date,
    },
    /// A week identifier does not match its start date.
    WeekIdMismatch {
        /// The identifier derived from the start date.
        expected: String,
        /// The identifier found on the record.
        actual: String,
    },
    /// A week's status disagrees with its `is_closed`/`is_active` flags.
    WeekStatusMismatch {
        /// The week identifier.
        week_id: String,
    },
    /// A shift identifier does not match its date.
    ShiftIdMismatch {
        /// The identifier derived from the date.
        expected: String,
        /// The identifier found on the record.
        actual: String,
    },
    /// A worker appears more than once in a shift's assigned workers.
    DuplicateAssignedWorker {
        /// The shift identifier.
        shift_id: String,
        /// The repeated worker.
        worker_id: String,
    },
    /// The key a record is stored under differs from the id it embeds.
    RecordKeyMismatch {
        /// The collection the record lives in.
        collection: &'static str,
        /// The key in the store.
        key: String,
        /// The id embedded in the record body.
        embedded: String,
    },
    /// Unknown contract type text.
    InvalidContractType(String),
    /// Unknown week status text.
    InvalidWeekStatus(String),
    /// Unknown shift status text.
    InvalidShiftStatus(String),
    /// Unknown application status text.
    InvalidApplicationStatus(String),
    /// A week identifier could not be parsed.
    InvalidWeekId(String),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// A scheduling policy value is out of range.
    InvalidPolicy {
        /// Description of the problem.
        reason: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWeekStart {
                start_date,
                weekday,
            } => {
                write!(
                    f,
                    "Week start date must be a Monday, but {start_date} is a {weekday}"
                )
            }
            Self::InvalidWeekSpan {
                week_id,
                start_date,
                end_date,
            } => {
                write!(
                    f,
                    "Week '{week_id}' must span 7 days, but runs from {start_date} to {end_date}"
                )
            }
            Self::WeekIdMismatch { expected, actual } => {
                write!(f, "Week id '{actual}' does not match its start date (expected '{expected}')")
            }
            Self::WeekStatusMismatch { week_id } => {
                write!(
                    f,
                    "Week '{week_id}' has a status that disagrees with its is_closed/is_active flags"
                )
            }
            Self::ShiftIdMismatch { expected, actual } => {
                write!(f, "Shift id '{actual}' does not match its date (expected '{expected}')")
            }
            Self::DuplicateAssignedWorker {
                shift_id,
                worker_id,
            } => {
                write!(
                    f,
                    "Worker '{worker_id}' is listed more than once on shift '{shift_id}'"
                )
            }
            Self::RecordKeyMismatch {
                collection,
                key,
                embedded,
            } => {
                write!(
                    f,
                    "Record stored at '{collection}/{key}' carries id '{embedded}'"
                )
            }
            Self::InvalidContractType(value) => write!(f, "Invalid contract type: {value}"),
            Self::InvalidWeekStatus(value) => write!(f, "Invalid week status: {value}"),
            Self::InvalidShiftStatus(value) => write!(f, "Invalid shift status: {value}"),
            Self::InvalidApplicationStatus(value) => {
                write!(f, "Invalid application status: {value}")
            }
            Self::InvalidWeekId(value) => write!(f, "Invalid week id: {value}"),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::InvalidPolicy { reason } => write!(f, "Invalid scheduling policy: {reason}"),
        }
    }
}

impl std::error::Error for DomainError {}
