// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Weekly trigger for the lifecycle manager.
//!
//! The trigger fires once per week at a fixed wall-clock time in a fixed
//! timezone. A failed scheduled run is logged and left for the next
//! occurrence; there is no retry in between.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use roster_api::{ApiError, LifecycleResponse, run_lifecycle};
use roster_domain::SchedulingPolicy;
use roster_store::RecordStore;
use time::{Date, Month, OffsetDateTime};
use tracing::{error, info};

/// When the lifecycle manager runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleSchedule {
    /// Day of the week.
    pub weekday: Weekday,
    /// Wall-clock time on that day.
    pub time: NaiveTime,
    /// Timezone the day and time are read in.
    pub timezone: Tz,
}

impl LifecycleSchedule {
    /// The first occurrence strictly after `now`.
    ///
    /// A time skipped by a DST change fires one hour later; a repeated
    /// time fires on its first occurrence.
    #[must_use]
    pub fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let local_today: NaiveDate = now.with_timezone(&self.timezone).date_naive();
        let days_ahead: i64 = i64::from(
            (7 + self.weekday.num_days_from_monday()
                - local_today.weekday().num_days_from_monday())
                % 7,
        );
        let mut candidate: NaiveDate = local_today.checked_add_signed(Duration::days(days_ahead))?;

        // at most one extra week when this week's slot has already passed
        for _ in 0..2 {
            let fire: DateTime<Utc> = self.resolve(candidate)?;
            if fire > now {
                return Some(fire);
            }
            candidate = candidate.checked_add_signed(Duration::days(7))?;
        }
        None
    }

    fn resolve(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        let naive = date.and_time(self.time);
        self.timezone
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                self.timezone
                    .from_local_datetime(&(naive + Duration::hours(1)))
                    .earliest()
            })
            .map(|local| local.with_timezone(&Utc))
    }
}

/// The calendar date at `now` in `timezone`.
#[must_use]
pub fn local_date(now: DateTime<Utc>, timezone: Tz) -> Option<Date> {
    let local: NaiveDate = now.with_timezone(&timezone).date_naive();
    let month: Month = Month::try_from(u8::try_from(local.month()).ok()?).ok()?;
    let day: u8 = u8::try_from(local.day()).ok()?;
    Date::from_calendar_date(local.year(), month, day).ok()
}

/// Runs the lifecycle manager for the current date in `timezone`.
///
/// # Errors
///
/// Returns the lifecycle error without logging it.
pub async fn run_lifecycle_now<S: RecordStore>(
    store: &S,
    policy: &SchedulingPolicy,
    timezone: Tz,
) -> Result<LifecycleResponse, ApiError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let today: Date = local_date(Utc::now(), timezone).ok_or_else(|| ApiError::InvalidInput {
        field: String::from("timezone"),
        message: format!("cannot determine the current date in {timezone}"),
    })?;

    let response: LifecycleResponse = run_lifecycle(store, today, now, policy).await?;
    info!(
        %today,
        retired = response.retired_weeks.len(),
        closed = response.closed_weeks.len(),
        created = response.created_weeks.len(),
        pruned = response.pruned_weeks.len(),
        quarantined = response.quarantined.len(),
        "Lifecycle run complete"
    );
    Ok(response)
}

/// Sleeps until each occurrence of `schedule` and runs the lifecycle
/// manager. Never returns unless the schedule has no next occurrence.
pub async fn run_scheduler<S: RecordStore + 'static>(
    store: Arc<S>,
    policy: Arc<SchedulingPolicy>,
    schedule: LifecycleSchedule,
) {
    loop {
        let now: DateTime<Utc> = Utc::now();
        let Some(next) = schedule.next_after(now) else {
            error!(?schedule, "No next lifecycle occurrence; scheduler stopped");
            return;
        };
        info!(next = %next.to_rfc3339(), "Next lifecycle run scheduled");
        let wait: std::time::Duration = (next - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;

        if let Err(err) = run_lifecycle_now(store.as_ref(), &policy, schedule.timezone).await {
            error!(
                kind = %err.kind(),
                error = %err,
                "Scheduled lifecycle run failed; retrying at the next occurrence"
            );
        }
    }
}
