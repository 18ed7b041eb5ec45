// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::macros::{date, datetime};

use crate::{
    DomainError, SchedulingPolicy, Shift, Week, WeekId, WeekStatus, validate_record_key,
    validate_shift, validate_week,
};

fn create_test_week() -> Week {
    Week::new(
        date!(2026 - 10 - 19),
        WeekStatus::Open,
        "system",
        datetime!(2026-10-18 03:00:00 UTC),
    )
    .unwrap()
}

#[test]
fn test_valid_week_passes() {
    assert!(validate_week(&create_test_week()).is_ok());
}

#[test]
fn test_week_not_starting_monday_fails() {
    let mut week: Week = create_test_week();
    week.start_date = date!(2026 - 10 - 20);
    assert!(matches!(
        validate_week(&week),
        Err(DomainError::InvalidWeekStart { .. })
    ));
}

#[test]
fn test_week_with_wrong_span_fails() {
    let mut week: Week = create_test_week();
    week.end_date = date!(2026 - 10 - 26);
    assert!(matches!(
        validate_week(&week),
        Err(DomainError::InvalidWeekSpan { .. })
    ));
}

#[test]
fn test_week_with_wrong_id_fails() {
    let mut week: Week = create_test_week();
    week.week_id = WeekId::new("2026-W44");
    assert!(matches!(
        validate_week(&week),
        Err(DomainError::WeekIdMismatch { .. })
    ));
}

#[test]
fn test_week_with_inconsistent_flags_fails() {
    let mut week: Week = create_test_week();
    week.is_closed = true;
    assert!(matches!(
        validate_week(&week),
        Err(DomainError::WeekStatusMismatch { .. })
    ));
}

#[test]
fn test_valid_shift_passes() {
    let shift: Shift = Shift::new(
        WeekId::new("2026-W43"),
        date!(2026 - 10 - 21),
        &SchedulingPolicy::default(),
    );
    assert!(validate_shift(&shift).is_ok());
}

#[test]
fn test_shift_with_wrong_id_fails() {
    let mut shift: Shift = Shift::new(
        WeekId::new("2026-W43"),
        date!(2026 - 10 - 21),
        &SchedulingPolicy::default(),
    );
    shift.shift_id = "2026-10-22".into();
    assert!(matches!(
        validate_shift(&shift),
        Err(DomainError::ShiftIdMismatch { .. })
    ));
}

#[test]
fn test_shift_with_duplicate_worker_fails() {
    let mut shift: Shift = Shift::new(
        WeekId::new("2026-W43"),
        date!(2026 - 10 - 21),
        &SchedulingPolicy::default(),
    );
    shift.assigned_workers = vec!["W1".into(), "W2".into(), "W1".into()];
    assert!(matches!(
        validate_shift(&shift),
        Err(DomainError::DuplicateAssignedWorker { .. })
    ));
}

#[test]
fn test_record_key_mismatch() {
    assert!(validate_record_key("workers", "W1", "W1").is_ok());
    assert!(matches!(
        validate_record_key("workers", "W1", "W2"),
        Err(DomainError::RecordKeyMismatch { .. })
    ));
}
