// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_domain::{
    SchedulingPolicy, ShiftStatus, Week, WeekId, WeekStatus, add_days, week_id_for,
};
use time::Weekday;
use time::macros::date;

use crate::{Change, CoreError, WindowPlan, plan_pruning, plan_window};

use super::helpers::{close_week, create_test_week, test_now};

/// A Wednesday, so the current week starts on 2026-10-19.
const TODAY: time::Date = date!(2026 - 10 - 21);

/// Weeks created by an earlier run whose current week began on `first`.
fn create_previous_window(first: time::Date, count: usize) -> Vec<Week> {
    (0..count)
        .map(|i| {
            let monday: time::Date = add_days(first, 7 * i64::try_from(i).unwrap()).unwrap();
            let status: WeekStatus = if i < 2 {
                WeekStatus::Closed
            } else {
                WeekStatus::Open
            };
            create_test_week(monday, status)
        })
        .collect()
}

/// The weeks left after committing a window plan over `weeks`.
fn weeks_after(weeks: &[Week], plan: &WindowPlan) -> Vec<Week> {
    let mut result: Vec<Week> = weeks
        .iter()
        .filter(|w| !plan.retirement.week_ids.contains(&w.week_id))
        .cloned()
        .collect();
    for week in &mut result {
        if plan.closure.week_ids.contains(&week.week_id) {
            close_week(week, test_now());
        }
    }
    result.extend(plan.additions.iter().map(|a| a.week.clone()));
    result
}

// ============================================================================
// Empty store
// ============================================================================

#[test]
fn test_empty_store_creates_full_window() {
    let plan: WindowPlan =
        plan_window(&[], TODAY, test_now(), &SchedulingPolicy::default()).unwrap();

    assert!(plan.retirement.week_ids.is_empty());
    assert!(plan.closure.week_ids.is_empty());
    assert_eq!(plan.additions.len(), 7);

    let first: &Week = &plan.additions[0].week;
    assert_eq!(first.start_date, date!(2026 - 10 - 19));
    assert_eq!(first.week_id, WeekId::new("2026-W43"));

    let statuses: Vec<WeekStatus> = plan.additions.iter().map(|a| a.week.status).collect();
    assert_eq!(
        statuses,
        vec![
            WeekStatus::Closed,
            WeekStatus::Closed,
            WeekStatus::Open,
            WeekStatus::Open,
            WeekStatus::Open,
            WeekStatus::Open,
            WeekStatus::Open,
        ]
    );

    let shift_count: usize = plan.additions.iter().map(|a| a.shifts.len()).sum();
    assert_eq!(shift_count, 49);

    for addition in &plan.additions {
        for shift in &addition.shifts {
            assert_eq!(shift.week_id, addition.week.week_id);
            assert_eq!(shift.max_workers, 0);
            assert!(shift.assigned_workers.is_empty());
            if shift.date.weekday() == Weekday::Saturday {
                assert_eq!(shift.status, ShiftStatus::Closed);
            } else {
                assert_eq!(shift.status, ShiftStatus::Active);
            }
        }
    }
}

#[test]
fn test_new_weeks_are_consecutive() {
    let plan: WindowPlan =
        plan_window(&[], TODAY, test_now(), &SchedulingPolicy::default()).unwrap();
    for pair in plan.additions.windows(2) {
        assert_eq!(
            add_days(pair[0].week.start_date, 7).unwrap(),
            pair[1].week.start_date
        );
    }
}

#[test]
fn test_each_addition_is_one_batch_of_week_and_shifts() {
    let plan: WindowPlan =
        plan_window(&[], TODAY, test_now(), &SchedulingPolicy::default()).unwrap();
    let changes = plan.additions[0].changes();
    assert_eq!(changes.len(), 8);
    assert!(matches!(changes.changes()[0], Change::PutWeek(_)));
}

// ============================================================================
// Existing windows
// ============================================================================

#[test]
fn test_second_run_is_a_no_op() {
    let policy: SchedulingPolicy = SchedulingPolicy::default();
    let first: WindowPlan = plan_window(&[], TODAY, test_now(), &policy).unwrap();
    let weeks: Vec<Week> = weeks_after(&[], &first);

    let second: WindowPlan = plan_window(&weeks, TODAY, test_now(), &policy).unwrap();
    assert!(second.is_empty());
    assert!(plan_pruning(&weeks, &policy).unwrap().changes.is_empty());
}

#[test]
fn test_new_week_retires_elapsed_and_rolls_forward() {
    let policy: SchedulingPolicy = SchedulingPolicy::default();
    // created when the current week began on 2026-10-12
    let weeks: Vec<Week> = create_previous_window(date!(2026 - 10 - 12), 7);

    let plan: WindowPlan = plan_window(&weeks, TODAY, test_now(), &policy).unwrap();

    assert_eq!(plan.retirement.week_ids, vec![WeekId::new("2026-W42")]);
    assert_eq!(plan.retirement.shift_ids.len(), 7);
    assert_eq!(plan.retirement.shift_ids[0].as_str(), "2026-10-12");
    assert_eq!(plan.retirement.changes.len(), 8);

    // 2026-W43 was already closed, 2026-W44 is now the second-nearest week
    assert_eq!(plan.closure.week_ids, vec![WeekId::new("2026-W44")]);

    assert_eq!(plan.additions.len(), 1);
    let added: &Week = &plan.additions[0].week;
    assert_eq!(added.start_date, date!(2026 - 11 - 30));
    assert_eq!(added.status, WeekStatus::Open);

    let after: Vec<Week> = weeks_after(&weeks, &plan);
    assert_eq!(after.len(), 7);
    assert!(plan_window(&after, TODAY, test_now(), &policy).unwrap().is_empty());
}

#[test]
fn test_retirement_can_be_disabled() {
    let policy: SchedulingPolicy = SchedulingPolicy {
        retire_elapsed_weeks: false,
        ..SchedulingPolicy::default()
    };
    let mut weeks: Vec<Week> = create_previous_window(date!(2026 - 10 - 12), 7);
    weeks[1].status = WeekStatus::Open;
    weeks[1].is_closed = false;
    weeks[1].is_active = true;

    let plan: WindowPlan = plan_window(&weeks, TODAY, test_now(), &policy).unwrap();
    assert!(plan.retirement.week_ids.is_empty());
    assert_eq!(plan.closure.week_ids, vec![week_id_for(date!(2026 - 10 - 19))]);
    assert!(plan.additions.is_empty());
}

#[test]
fn test_partial_window_closes_by_position() {
    let policy: SchedulingPolicy = SchedulingPolicy::default();
    let weeks: Vec<Week> = vec![create_test_week(date!(2026 - 10 - 19), WeekStatus::Open)];

    let plan: WindowPlan = plan_window(&weeks, TODAY, test_now(), &policy).unwrap();

    assert_eq!(plan.closure.week_ids, vec![WeekId::new("2026-W43")]);
    assert_eq!(plan.additions.len(), 6);
    assert_eq!(plan.additions[0].week.start_date, date!(2026 - 10 - 26));
    assert_eq!(plan.additions[0].week.status, WeekStatus::Closed);
    assert!(
        plan.additions[1..]
            .iter()
            .all(|a| a.week.status == WeekStatus::Open)
    );
}

#[test]
fn test_closure_sets_all_flags() {
    let policy: SchedulingPolicy = SchedulingPolicy::default();
    let weeks: Vec<Week> = vec![create_test_week(date!(2026 - 10 - 19), WeekStatus::Open)];
    let plan: WindowPlan = plan_window(&weeks, TODAY, test_now(), &policy).unwrap();

    assert_eq!(
        plan.closure.changes.changes(),
        &[Change::CloseWeek {
            week_id: WeekId::new("2026-W43"),
            updated_at: test_now(),
        }]
    );
}

#[test]
fn test_week_order_does_not_depend_on_input_order() {
    let policy: SchedulingPolicy = SchedulingPolicy::default();
    let mut weeks: Vec<Week> = create_previous_window(date!(2026 - 10 - 19), 5);
    weeks.reverse();

    let plan: WindowPlan = plan_window(&weeks, TODAY, test_now(), &policy).unwrap();
    assert!(plan.closure.week_ids.is_empty());
    assert_eq!(plan.additions.len(), 2);
    assert_eq!(plan.additions[0].week.start_date, date!(2026 - 11 - 23));
}

// ============================================================================
// Pruning
// ============================================================================

#[test]
fn test_pruning_removes_oldest_beyond_retention() {
    let policy: SchedulingPolicy = SchedulingPolicy::default();
    let weeks: Vec<Week> = create_previous_window(date!(2026 - 10 - 05), 9);

    let removal = plan_pruning(&weeks, &policy).unwrap();
    assert_eq!(
        removal.week_ids,
        vec![WeekId::new("2026-W41"), WeekId::new("2026-W42")]
    );
    assert_eq!(removal.shift_ids.len(), 14);
    assert_eq!(removal.changes.len(), 16);
}

#[test]
fn test_pruning_within_retention_is_empty() {
    let policy: SchedulingPolicy = SchedulingPolicy::default();
    let weeks: Vec<Week> = create_previous_window(date!(2026 - 10 - 19), 7);
    let removal = plan_pruning(&weeks, &policy).unwrap();
    assert!(removal.week_ids.is_empty());
    assert!(removal.changes.is_empty());
}

#[test]
fn test_invalid_policy_rejected() {
    let policy: SchedulingPolicy = SchedulingPolicy {
        retention_count: 0,
        ..SchedulingPolicy::default()
    };
    let result: Result<WindowPlan, CoreError> = plan_window(&[], TODAY, test_now(), &policy);
    assert!(matches!(result, Err(CoreError::DomainViolation(_))));
}
