// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::calendar::{self, timestamp};
use crate::error::DomainError;
use crate::ids::{ApplicationId, AssignmentId, ShiftId, WorkerId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// A worker's contract category.
///
/// The declaration order is the assignment priority order: permanent
/// tier 1 workers are served first, hour-capped workers last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContractType {
    /// Permanent contract (CDI).
    #[serde(rename = "CDI")]
    PermanentTier1,
    /// Fixed-term contract (CDD).
    #[serde(rename = "CDD")]
    PermanentTier2,
    /// Student contract, limited to an accumulated hours cap.
    #[serde(rename = "student")]
    HourCapped,
}

impl ContractType {
    /// Converts this contract type to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PermanentTier1 => "CDI",
            Self::PermanentTier2 => "CDD",
            Self::HourCapped => "student",
        }
    }

    /// Whether assignments for this contract are bounded by the hour cap.
    #[must_use]
    pub const fn is_hour_capped(&self) -> bool {
        matches!(self, Self::HourCapped)
    }
}

impl FromStr for ContractType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CDI" => Ok(Self::PermanentTier1),
            "CDD" => Ok(Self::PermanentTier2),
            "student" => Ok(Self::HourCapped),
            _ => Err(DomainError::InvalidContractType(s.to_string())),
        }
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A person who can be scheduled onto shifts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// The worker identifier.
    pub worker_id: WorkerId,
    /// The contract category.
    pub contract_type: ContractType,
    /// Ranking score used to order hour-capped workers.
    #[serde(default)]
    pub points: f64,
    /// Hours credited by current assignments.
    #[serde(default)]
    pub hours_assigned: u32,
    /// Alternative ranking score, when productivity data has been imported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub productivity_last_3_months: Option<f64>,
    /// Optional human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Worker {
    /// Creates a worker with no hours and no ranking data.
    #[must_use]
    pub const fn new(worker_id: WorkerId, contract_type: ContractType) -> Self {
        Self {
            worker_id,
            contract_type,
            points: 0.0,
            hours_assigned: 0,
            productivity_last_3_months: None,
            display_name: None,
        }
    }

    /// Whether the worker is subject to the hour cap.
    #[must_use]
    pub const fn is_hour_capped(&self) -> bool {
        self.contract_type.is_hour_capped()
    }
}

/// Lifecycle of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    /// Waiting for a decision.
    Applied,
    /// Confirmed onto the shift.
    Assigned,
}

impl ApplicationStatus {
    /// Converts this status to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Assigned => "assigned",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applied" => Ok(Self::Applied),
            "assigned" => Ok(Self::Assigned),
            _ => Err(DomainError::InvalidApplicationStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A worker's request to work a specific shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// The application identifier.
    pub application_id: ApplicationId,
    /// The requested shift.
    pub shift_id: ShiftId,
    /// The applicant.
    pub worker_id: WorkerId,
    /// Where the application stands.
    pub status: ApplicationStatus,
    /// When the worker applied.
    #[serde(with = "timestamp")]
    pub application_date: OffsetDateTime,
}

impl Application {
    /// Whether the application is still waiting for a decision.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == ApplicationStatus::Applied
    }
}

/// Audit record of a confirmed worker-to-shift match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Derived from the shift and worker.
    pub assignment_id: AssignmentId,
    /// The shift.
    pub shift_id: ShiftId,
    /// The worker.
    pub worker_id: WorkerId,
    /// When the match was confirmed.
    #[serde(with = "timestamp")]
    pub assigned_at: OffsetDateTime,
}

impl Assignment {
    /// Records that `worker_id` was confirmed onto `shift_id` at `assigned_at`.
    #[must_use]
    pub fn new(shift_id: ShiftId, worker_id: WorkerId, assigned_at: OffsetDateTime) -> Self {
        Self {
            assignment_id: calendar::assignment_id_for(&shift_id, &worker_id),
            shift_id,
            worker_id,
            assigned_at,
        }
    }

    /// Whether this record is for `worker_id` on `shift_id`.
    #[must_use]
    pub fn matches(&self, shift_id: &ShiftId, worker_id: &WorkerId) -> bool {
        &self.shift_id == shift_id && &self.worker_id == worker_id
    }
}
