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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

//! API boundary for the shift roster.
//!
//! Handlers here are the only code that talks to a [`RecordStore`]. They
//! validate requests, read the records they need, let the core crate plan
//! the change, commit it as one batch, and map every failure onto one of
//! four [`ErrorKind`]s.
//!
//! [`RecordStore`]: roster_store::RecordStore

mod error;
mod handlers;
mod records;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, ErrorKind, translate_core_error, translate_domain_error, translate_store_error,
};
pub use handlers::{
    assign_one, check_consistency, run_assignment_engine, run_lifecycle, unassign_one,
    update_shift_status,
};
pub use records::{
    Collection, LoadedRoster, commit, field_path, load_roster, load_weeks, record_path, to_batch,
};
pub use request_response::{
    AssignOneRequest, AssignOneResponse, AssignmentInfo, ConsistencyResponse, DiscrepancyInfo,
    LifecycleResponse, PlanningRequest, PlanningResponse, QuarantinedRecord, ShiftFillInfo,
    ShiftStatusRequest, ShiftStatusResponse, UnassignOneRequest, UnassignOneResponse,
};
