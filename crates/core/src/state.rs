// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use roster_domain::{
    Application, ApplicationId, Assignment, AssignmentId, Shift, ShiftId, Week, WeekId, Worker,
    WorkerId,
};

use crate::error::{CoreError, Entity};

/// Which shifts an engine run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftSelection {
    /// Every shift belonging to the week.
    Week(WeekId),
    /// An explicit list of shifts.
    Shifts(Vec<ShiftId>),
}

/// A point-in-time copy of every scheduling record.
///
/// Planning functions read from a `Roster` and describe the writes they
/// want as a [`ChangeSet`](crate::ChangeSet); they never mutate it. A
/// roster is built fresh from the store for each operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    /// All weeks by id.
    pub weeks: BTreeMap<WeekId, Week>,
    /// All shifts by id.
    pub shifts: BTreeMap<ShiftId, Shift>,
    /// All workers by id.
    pub workers: BTreeMap<WorkerId, Worker>,
    /// All applications by id.
    pub applications: BTreeMap<ApplicationId, Application>,
    /// All assignment records by id.
    pub assignments: BTreeMap<AssignmentId, Assignment>,
}

impl Roster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a week.
    pub fn insert_week(&mut self, week: Week) {
        self.weeks.insert(week.week_id.clone(), week);
    }

    /// Adds or replaces a shift.
    pub fn insert_shift(&mut self, shift: Shift) {
        self.shifts.insert(shift.shift_id.clone(), shift);
    }

    /// Adds or replaces a worker.
    pub fn insert_worker(&mut self, worker: Worker) {
        self.workers.insert(worker.worker_id.clone(), worker);
    }

    /// Adds or replaces an application.
    pub fn insert_application(&mut self, application: Application) {
        self.applications
            .insert(application.application_id.clone(), application);
    }

    /// Adds or replaces an assignment record.
    pub fn insert_assignment(&mut self, assignment: Assignment) {
        self.assignments
            .insert(assignment.assignment_id.clone(), assignment);
    }

    /// Weeks ordered by start date.
    #[must_use]
    pub fn weeks_ascending(&self) -> Vec<Week> {
        let mut weeks: Vec<Week> = self.weeks.values().cloned().collect();
        weeks.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        weeks
    }

    /// Looks up a shift.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if the shift does not exist.
    pub fn shift(&self, shift_id: &ShiftId) -> Result<&Shift, CoreError> {
        self.shifts.get(shift_id).ok_or_else(|| CoreError::NotFound {
            entity: Entity::Shift,
            id: shift_id.to_string(),
        })
    }

    /// Looks up an application.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if the application does not exist.
    pub fn application(&self, application_id: &ApplicationId) -> Result<&Application, CoreError> {
        self.applications
            .get(application_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: Entity::Application,
                id: application_id.to_string(),
            })
    }

    /// Looks up a worker.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if the worker does not exist.
    pub fn worker(&self, worker_id: &WorkerId) -> Result<&Worker, CoreError> {
        self.workers.get(worker_id).ok_or_else(|| CoreError::NotFound {
            entity: Entity::Worker,
            id: worker_id.to_string(),
        })
    }

    /// Assignment records for a worker on a shift.
    pub fn assignments_for<'a>(
        &'a self,
        shift_id: &'a ShiftId,
        worker_id: &'a WorkerId,
    ) -> impl Iterator<Item = &'a Assignment> + 'a {
        self.assignments
            .values()
            .filter(move |a| a.matches(shift_id, worker_id))
    }

    /// Applications by a worker for a shift, in any status.
    pub fn applications_for<'a>(
        &'a self,
        shift_id: &'a ShiftId,
        worker_id: &'a WorkerId,
    ) -> impl Iterator<Item = &'a Application> + 'a {
        self.applications
            .values()
            .filter(move |a| &a.shift_id == shift_id && &a.worker_id == worker_id)
    }

    /// Resolves a selection to shifts, ordered by date.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if the selected week or any listed
    /// shift does not exist.
    pub fn select_shifts(&self, selection: &ShiftSelection) -> Result<Vec<Shift>, CoreError> {
        let mut shifts: Vec<Shift> = match selection {
            ShiftSelection::Week(week_id) => {
                if !self.weeks.contains_key(week_id) {
                    return Err(CoreError::NotFound {
                        entity: Entity::Week,
                        id: week_id.to_string(),
                    });
                }
                self.shifts
                    .values()
                    .filter(|s| &s.week_id == week_id)
                    .cloned()
                    .collect()
            }
            ShiftSelection::Shifts(ids) => {
                let mut selected: Vec<Shift> = Vec::with_capacity(ids.len());
                for shift_id in ids {
                    let shift: &Shift = self.shift(shift_id)?;
                    if !selected.iter().any(|s| &s.shift_id == shift_id) {
                        selected.push(shift.clone());
                    }
                }
                selected
            }
        };
        shifts.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(shifts)
    }
}
