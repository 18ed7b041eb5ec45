// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mapping between the record store layout and the in-memory roster.
//!
//! Records live one level below their collection:
//!
//! ```text
//! weeks/{week_id}
//! shifts/{shift_id}
//! workers/{worker_id}
//! applications/{application_id}
//! assignments/{assignment_id}
//! ```
//!
//! A record that fails to decode, fails validation, or is stored under a
//! key other than its own id is quarantined: it is logged, reported to
//! the caller, and left out of the roster. One bad record never fails a
//! whole read.

use roster::{Change, ChangeSet, Roster};
use roster_domain::{
    Application, Assignment, DomainError, Shift, Week, WeekStatus, Worker, timestamp,
    validate_record_key, validate_shift, validate_week,
};
use roster_store::{RecordStore, StoreError, StorePath, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::error::{ApiError, translate_store_error};
use crate::request_response::QuarantinedRecord;

/// A top-level collection of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// `weeks/`
    Weeks,
    /// `shifts/`
    Shifts,
    /// `workers/`
    Workers,
    /// `applications/`
    Applications,
    /// `assignments/`
    Assignments,
}

impl Collection {
    /// Every collection.
    pub const ALL: [Self; 5] = [
        Self::Weeks,
        Self::Shifts,
        Self::Workers,
        Self::Applications,
        Self::Assignments,
    ];

    /// What the matching and override operations need.
    pub const SCHEDULING: [Self; 4] = [
        Self::Shifts,
        Self::Workers,
        Self::Applications,
        Self::Assignments,
    ];

    /// The collection's top-level key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weeks => "weeks",
            Self::Shifts => "shifts",
            Self::Workers => "workers",
            Self::Applications => "applications",
            Self::Assignments => "assignments",
        }
    }

    fn path(self) -> Result<StorePath, StoreError> {
        StorePath::root().child(self.as_str())
    }
}

/// Path of the record `id` in `collection`.
///
/// # Errors
///
/// Returns an error if `id` cannot be used as a path segment.
pub fn record_path(collection: Collection, id: &str) -> Result<StorePath, StoreError> {
    StorePath::from_segments([collection.as_str(), id])
}

/// Path of `field` inside the record `id` in `collection`.
///
/// # Errors
///
/// Returns an error if `id` cannot be used as a path segment.
pub fn field_path(collection: Collection, id: &str, field: &str) -> Result<StorePath, StoreError> {
    StorePath::from_segments([collection.as_str(), id, field])
}

/// A roster assembled from a store read.
#[derive(Debug, Clone, Default)]
pub struct LoadedRoster {
    /// The records that decoded cleanly.
    pub roster: Roster,
    /// The records that did not.
    pub quarantined: Vec<QuarantinedRecord>,
}

/// Reads the given collections into a [`Roster`].
///
/// Collections not listed stay empty.
///
/// # Errors
///
/// Returns [`ApiError::StoreFailure`] if any read fails.
pub async fn load_roster<S: RecordStore>(
    store: &S,
    collections: &[Collection],
) -> Result<LoadedRoster, ApiError> {
    let mut loaded: LoadedRoster = LoadedRoster::default();
    for collection in collections {
        let raw: Option<Value> = read_collection(store, *collection).await?;
        let quarantined: &mut Vec<QuarantinedRecord> = &mut loaded.quarantined;
        let roster: &mut Roster = &mut loaded.roster;
        match collection {
            Collection::Weeks => {
                for week in decode_collection(*collection, raw, quarantined, |key, week: &Week| {
                    validate_record_key("weeks", key, week.week_id.as_str())?;
                    validate_week(week)
                }) {
                    roster.insert_week(week);
                }
            }
            Collection::Shifts => {
                for shift in
                    decode_collection(*collection, raw, quarantined, |key, shift: &Shift| {
                        validate_record_key("shifts", key, shift.shift_id.as_str())?;
                        validate_shift(shift)
                    })
                {
                    roster.insert_shift(shift);
                }
            }
            Collection::Workers => {
                for worker in
                    decode_collection(*collection, raw, quarantined, |key, worker: &Worker| {
                        validate_record_key("workers", key, worker.worker_id.as_str())
                    })
                {
                    roster.insert_worker(worker);
                }
            }
            Collection::Applications => {
                for application in decode_collection(
                    *collection,
                    raw,
                    quarantined,
                    |key, application: &Application| {
                        validate_record_key(
                            "applications",
                            key,
                            application.application_id.as_str(),
                        )
                    },
                ) {
                    roster.insert_application(application);
                }
            }
            Collection::Assignments => {
                for assignment in decode_collection(
                    *collection,
                    raw,
                    quarantined,
                    |key, assignment: &Assignment| {
                        validate_record_key("assignments", key, assignment.assignment_id.as_str())
                    },
                ) {
                    roster.insert_assignment(assignment);
                }
            }
        }
    }
    Ok(loaded)
}

/// Reads every week.
///
/// # Errors
///
/// Returns [`ApiError::StoreFailure`] if the read fails.
pub async fn load_weeks<S: RecordStore>(
    store: &S,
) -> Result<(Vec<Week>, Vec<QuarantinedRecord>), ApiError> {
    let loaded: LoadedRoster = load_roster(store, &[Collection::Weeks]).await?;
    Ok((loaded.roster.weeks_ascending(), loaded.quarantined))
}

async fn read_collection<S: RecordStore>(
    store: &S,
    collection: Collection,
) -> Result<Option<Value>, ApiError> {
    let operation: String = format!("reading {}", collection.as_str());
    let path: StorePath = collection
        .path()
        .map_err(|e| translate_store_error(e, &operation))?;
    store
        .read(&path)
        .await
        .map_err(|e| translate_store_error(e, &operation))
}

fn decode_collection<T, F>(
    collection: Collection,
    raw: Option<Value>,
    quarantined: &mut Vec<QuarantinedRecord>,
    check: F,
) -> Vec<T>
where
    T: DeserializeOwned,
    F: Fn(&str, &T) -> Result<(), DomainError>,
{
    let records: Map<String, Value> = match raw {
        None => return Vec::new(),
        Some(Value::Object(records)) => records,
        Some(_) => {
            quarantine(
                quarantined,
                collection.as_str().to_string(),
                String::from("collection is not an object"),
            );
            return Vec::new();
        }
    };

    let mut decoded: Vec<T> = Vec::with_capacity(records.len());
    for (key, value) in records {
        let path: String = format!("{}/{key}", collection.as_str());
        match serde_json::from_value::<T>(value) {
            Ok(record) => match check(&key, &record) {
                Ok(()) => decoded.push(record),
                Err(err) => quarantine(quarantined, path, err.to_string()),
            },
            Err(err) => quarantine(quarantined, path, err.to_string()),
        }
    }
    decoded
}

fn quarantine(quarantined: &mut Vec<QuarantinedRecord>, path: String, reason: String) {
    warn!(path = %path, reason = %reason, "Quarantined malformed record");
    quarantined.push(QuarantinedRecord { path, reason });
}

#[derive(Serialize)]
struct Timestamp(#[serde(with = "timestamp")] OffsetDateTime);

/// Converts a change set into the store paths it touches.
///
/// Field-level changes write only the named field.
///
/// # Errors
///
/// Returns an error if an id cannot be used as a path segment or a value
/// cannot be serialized.
pub fn to_batch(changes: &ChangeSet) -> Result<WriteBatch, StoreError> {
    let mut batch: WriteBatch = WriteBatch::new();
    for change in changes {
        match change {
            Change::PutWeek(week) => {
                batch.set(record_path(Collection::Weeks, week.week_id.as_str())?, week)?;
            }
            Change::CloseWeek {
                week_id,
                updated_at,
            } => {
                let id: &str = week_id.as_str();
                batch.set(
                    field_path(Collection::Weeks, id, "status")?,
                    &WeekStatus::Closed,
                )?;
                batch.set(field_path(Collection::Weeks, id, "is_closed")?, &true)?;
                batch.set(field_path(Collection::Weeks, id, "is_active")?, &false)?;
                batch.set(
                    field_path(Collection::Weeks, id, "updated_at")?,
                    &Timestamp(*updated_at),
                )?;
            }
            Change::DeleteWeek(week_id) => {
                batch.delete(record_path(Collection::Weeks, week_id.as_str())?);
            }
            Change::PutShift(shift) => {
                batch.set(
                    record_path(Collection::Shifts, shift.shift_id.as_str())?,
                    shift,
                )?;
            }
            Change::DeleteShift(shift_id) => {
                batch.delete(record_path(Collection::Shifts, shift_id.as_str())?);
            }
            Change::SetAssignedWorkers { shift_id, workers } => {
                batch.set(
                    field_path(Collection::Shifts, shift_id.as_str(), "assigned_workers")?,
                    workers,
                )?;
            }
            Change::SetShiftStatus { shift_id, status } => {
                batch.set(
                    field_path(Collection::Shifts, shift_id.as_str(), "status")?,
                    status,
                )?;
            }
            Change::SetApplicationStatus {
                application_id,
                status,
            } => {
                batch.set(
                    field_path(Collection::Applications, application_id.as_str(), "status")?,
                    status,
                )?;
            }
            Change::SetWorkerHours {
                worker_id,
                hours_assigned,
            } => {
                batch.set(
                    field_path(Collection::Workers, worker_id.as_str(), "hours_assigned")?,
                    hours_assigned,
                )?;
            }
            Change::PutAssignment(assignment) => {
                batch.set(
                    record_path(Collection::Assignments, assignment.assignment_id.as_str())?,
                    assignment,
                )?;
            }
            Change::DeleteAssignment(assignment_id) => {
                batch.delete(record_path(
                    Collection::Assignments,
                    assignment_id.as_str(),
                )?);
            }
        }
    }
    Ok(batch)
}

/// Commits `changes` as one atomic write.
///
/// Returns the number of paths written.
///
/// # Errors
///
/// Returns [`ApiError::StoreFailure`] if the write fails.
pub async fn commit<S: RecordStore>(
    store: &S,
    changes: &ChangeSet,
    operation: &str,
) -> Result<usize, ApiError> {
    let batch: WriteBatch = to_batch(changes).map_err(|e| translate_store_error(e, operation))?;
    let paths: usize = batch.len();
    store
        .write(batch)
        .await
        .map_err(|e| translate_store_error(e, operation))?;
    debug!(operation, paths, "Committed change set");
    Ok(paths)
}
