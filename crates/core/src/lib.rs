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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Scheduling decisions over an in-memory [`Roster`].
//!
//! Nothing here performs I/O. Each planner takes a snapshot and returns
//! the [`ChangeSet`] the caller should commit as one atomic write.

mod change;
mod consistency;
mod error;
mod lifecycle;
mod matching;
mod overrides;
mod ranking;
mod state;

#[cfg(test)]
mod tests;

pub use change::{Change, ChangeSet};
pub use consistency::{Discrepancy, check_consistency};
pub use error::{CoreError, Entity};
pub use lifecycle::{
    WeekAddition, WeekClosure, WeekRemoval, WindowPlan, plan_pruning, plan_window,
};
pub use matching::{MatchOutcome, MatchWarning, ShiftFill, match_applications};
pub use overrides::{AssignOutcome, UnassignOutcome, plan_assign_one, plan_unassign_one};
pub use ranking::RankingSignal;
pub use state::{Roster, ShiftSelection};
