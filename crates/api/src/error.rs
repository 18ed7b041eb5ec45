// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use roster::CoreError;
use roster_domain::DomainError;
use roster_store::StoreError;

/// The four ways an operation can fail, as seen by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input. Fix the request.
    Validation,
    /// A referenced record does not exist. Usually already resolved.
    NotFound,
    /// Capacity or hour cap would be exceeded. Not allowed.
    ConstraintViolation,
    /// The record store could not be read or written. Try again.
    StoreFailure,
}

impl ErrorKind {
    /// Stable snake-case name used in responses.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::ConstraintViolation => "constraint_violation",
            Self::StoreFailure => "store_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// API-level errors.
///
/// These are distinct from domain/core/store errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The shift has no open slot.
    CapacityExceeded {
        /// The shift.
        shift_id: String,
        /// Its capacity.
        max_workers: u32,
        /// Workers already assigned.
        assigned: usize,
        /// A human-readable description.
        message: String,
    },
    /// An hour-capped worker would go over the cap.
    LimitExceeded {
        /// The worker.
        worker_id: String,
        /// Hours already credited.
        hours_assigned: u32,
        /// The cap.
        hour_cap: u32,
        /// A human-readable description.
        message: String,
    },
    /// The record store failed.
    StoreFailure {
        /// What was being done when the store failed.
        operation: String,
        /// The store's error.
        message: String,
    },
}

impl ApiError {
    /// Classifies this error for the caller.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::Validation,
            Self::ResourceNotFound { .. } => ErrorKind::NotFound,
            Self::CapacityExceeded { .. } | Self::LimitExceeded { .. } => {
                ErrorKind::ConstraintViolation
            }
            Self::StoreFailure { .. } => ErrorKind::StoreFailure,
        }
    }

    /// The constraint that failed, for constraint violations.
    #[must_use]
    pub const fn constraint(&self) -> Option<&'static str> {
        match self {
            Self::CapacityExceeded { .. } => Some("capacity_exceeded"),
            Self::LimitExceeded { .. } => Some("limit_exceeded"),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::CapacityExceeded { message, .. } => {
                write!(f, "Capacity exceeded: {message}")
            }
            Self::LimitExceeded { message, .. } => write!(f, "Hour limit exceeded: {message}"),
            Self::StoreFailure { operation, message } => {
                write!(f, "Store failure while {operation}: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    let field: &str = match err {
        DomainError::InvalidWeekStart { .. } | DomainError::InvalidWeekSpan { .. } => {
            "start_date"
        }
        DomainError::WeekIdMismatch { .. }
        | DomainError::InvalidWeekId(_)
        | DomainError::WeekStatusMismatch { .. } => "week_id",
        DomainError::ShiftIdMismatch { .. } => "shift_id",
        DomainError::DuplicateAssignedWorker { .. } => "assigned_workers",
        DomainError::RecordKeyMismatch { .. } => "id",
        DomainError::InvalidContractType(_) => "contract_type",
        DomainError::InvalidWeekStatus(_)
        | DomainError::InvalidShiftStatus(_)
        | DomainError::InvalidApplicationStatus(_) => "status",
        DomainError::DateArithmeticOverflow { .. } => "date",
        DomainError::InvalidPolicy { .. } => "policy",
    };
    ApiError::InvalidInput {
        field: field.to_string(),
        message,
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    let message: String = err.to_string();
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::NotFound { entity, .. } => ApiError::ResourceNotFound {
            resource_type: capitalize(entity.as_str()),
            message,
        },
        CoreError::ApplicationShiftMismatch { .. } => ApiError::InvalidInput {
            field: String::from("application_id"),
            message,
        },
        CoreError::CapacityExceeded {
            shift_id,
            max_workers,
            assigned,
            ..
        } => ApiError::CapacityExceeded {
            shift_id,
            max_workers,
            assigned,
            message,
        },
        CoreError::LimitExceeded {
            worker_id,
            hours_assigned,
            hour_cap,
            ..
        } => ApiError::LimitExceeded {
            worker_id,
            hours_assigned,
            hour_cap,
            message,
        },
    }
}

/// Translates a store error into an API error.
///
/// Malformed paths can only come from caller-supplied identifiers, so they
/// are reported as invalid input; everything else is a store failure.
#[must_use]
pub fn translate_store_error(err: StoreError, operation: &str) -> ApiError {
    match err {
        StoreError::InvalidPath { path, reason } => ApiError::InvalidInput {
            field: String::from("id"),
            message: format!("'{path}' cannot be used as a record key: {reason}"),
        },
        other => ApiError::StoreFailure {
            operation: operation.to_string(),
            message: other.to_string(),
        },
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
