// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_domain::DomainError;

/// The kinds of record a lookup can fail to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Week,
    Shift,
    Worker,
    Application,
    Assignment,
}

impl Entity {
    /// Lowercase name used in messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Shift => "shift",
            Self::Worker => "worker",
            Self::Application => "application",
            Self::Assignment => "assignment",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur while planning a scheduling change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A referenced record does not exist.
    NotFound {
        /// What kind of record was looked up.
        entity: Entity,
        /// The identifier that was looked up.
        id: String,
    },
    /// An application was used against a shift it does not belong to.
    ApplicationShiftMismatch {
        /// The application.
        application_id: String,
        /// The shift named by the caller.
        requested_shift: String,
        /// The shift the application is for.
        application_shift: String,
    },
    /// The shift has no open slot.
    CapacityExceeded {
        /// The shift.
        shift_id: String,
        /// Its capacity.
        max_workers: u32,
        /// Workers already assigned.
        assigned: usize,
        /// Whether the shift is closed.
        closed: bool,
    },
    /// One more shift would push an hour-capped worker past the cap.
    LimitExceeded {
        /// The worker.
        worker_id: String,
        /// Hours already credited.
        hours_assigned: u32,
        /// Hours one shift adds.
        shift_hours: u32,
        /// The cap.
        hour_cap: u32,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::NotFound { entity, id } => write!(f, "No {entity} found with id '{id}'"),
            Self::ApplicationShiftMismatch {
                application_id,
                requested_shift,
                application_shift,
            } => write!(
                f,
                "Application '{application_id}' is for shift '{application_shift}', not '{requested_shift}'"
            ),
            Self::CapacityExceeded {
                shift_id,
                max_workers,
                assigned,
                closed,
            } => {
                if *closed {
                    write!(f, "Shift '{shift_id}' is closed")
                } else {
                    write!(
                        f,
                        "Shift '{shift_id}' is full ({assigned} of {max_workers} slots taken)"
                    )
                }
            }
            Self::LimitExceeded {
                worker_id,
                hours_assigned,
                shift_hours,
                hour_cap,
            } => write!(
                f,
                "Worker '{worker_id}' has {hours_assigned} hours; another {shift_hours} would exceed the cap of {hour_cap}"
            ),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
