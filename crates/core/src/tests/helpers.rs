// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_domain::{
    Application, ApplicationStatus, ContractType, SchedulingPolicy, Shift, ShiftStatus, Week,
    WeekStatus, Worker, week_dates, week_id_for,
};
use time::macros::datetime;
use time::{Date, OffsetDateTime};

use crate::{Change, ChangeSet, Roster};

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-10-21 03:00:00 UTC)
}

/// Sets the fields a `CloseWeek` change writes.
pub fn close_week(week: &mut Week, updated_at: OffsetDateTime) {
    week.status = WeekStatus::Closed;
    week.is_closed = true;
    week.is_active = false;
    week.updated_at = updated_at;
}

pub fn create_test_worker(id: &str, contract_type: ContractType, points: f64, hours: u32) -> Worker {
    let mut worker: Worker = Worker::new(id.into(), contract_type);
    worker.points = points;
    worker.hours_assigned = hours;
    worker
}

/// An application submitted `day` days into October 2026.
pub fn create_test_application(id: &str, shift_id: &str, worker_id: &str, day: u8) -> Application {
    Application {
        application_id: id.into(),
        shift_id: shift_id.into(),
        worker_id: worker_id.into(),
        status: ApplicationStatus::Applied,
        application_date: Date::from_calendar_date(2026, time::Month::October, day)
            .unwrap()
            .midnight()
            .assume_utc(),
    }
}

pub fn create_test_week(monday: Date, status: WeekStatus) -> Week {
    Week::new(monday, status, "system", datetime!(2026-10-01 03:00:00 UTC)).unwrap()
}

/// A week with its seven shifts, every operating day taking `max_workers`.
pub fn create_test_roster_week(roster: &mut Roster, monday: Date, max_workers: u32) {
    let policy: SchedulingPolicy = SchedulingPolicy::default();
    let week: Week = create_test_week(monday, WeekStatus::Open);
    for date in week_dates(monday).unwrap() {
        let mut shift: Shift = Shift::new(week_id_for(monday), date, &policy);
        if shift.status == ShiftStatus::Active {
            shift.max_workers = max_workers;
        }
        roster.insert_shift(shift);
    }
    roster.insert_week(week);
}

/// Applies changes to a roster the way the store would.
pub fn apply_changes(roster: &mut Roster, changes: &ChangeSet) {
    for change in changes {
        match change.clone() {
            Change::PutWeek(week) => roster.insert_week(week),
            Change::CloseWeek {
                week_id,
                updated_at,
            } => {
                close_week(roster.weeks.get_mut(&week_id).unwrap(), updated_at);
            }
            Change::DeleteWeek(week_id) => {
                roster.weeks.remove(&week_id);
            }
            Change::PutShift(shift) => roster.insert_shift(shift),
            Change::DeleteShift(shift_id) => {
                roster.shifts.remove(&shift_id);
            }
            Change::SetAssignedWorkers { shift_id, workers } => {
                roster.shifts.get_mut(&shift_id).unwrap().assigned_workers = workers;
            }
            Change::SetShiftStatus { shift_id, status } => {
                roster.shifts.get_mut(&shift_id).unwrap().status = status;
            }
            Change::SetApplicationStatus {
                application_id,
                status,
            } => {
                roster
                    .applications
                    .get_mut(&application_id)
                    .unwrap()
                    .status = status;
            }
            Change::SetWorkerHours {
                worker_id,
                hours_assigned,
            } => {
                roster.workers.get_mut(&worker_id).unwrap().hours_assigned = hours_assigned;
            }
            Change::PutAssignment(assignment) => roster.insert_assignment(assignment),
            Change::DeleteAssignment(assignment_id) => {
                roster.assignments.remove(&assignment_id);
            }
        }
    }
}
