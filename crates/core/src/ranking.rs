// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::cmp::Ordering;
use std::str::FromStr;

use roster_domain::Worker;

/// The score used to order hour-capped candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RankingSignal {
    /// The worker's `points` field.
    #[default]
    Points,
    /// The worker's `productivity_last_3_months` field.
    ///
    /// Workers without a value rank below every worker with one.
    ProductivityLastThreeMonths,
}

impl RankingSignal {
    /// Converts this signal to its configuration string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::ProductivityLastThreeMonths => "productivity",
        }
    }

    /// The worker's score under this signal.
    #[must_use]
    pub fn score(&self, worker: &Worker) -> f64 {
        match self {
            Self::Points => worker.points,
            Self::ProductivityLastThreeMonths => worker
                .productivity_last_3_months
                .unwrap_or(f64::NEG_INFINITY),
        }
    }

    /// Orders workers by descending score, ties broken by ascending worker id.
    #[must_use]
    pub fn compare(&self, a: &Worker, b: &Worker) -> Ordering {
        self.score(b)
            .total_cmp(&self.score(a))
            .then_with(|| a.worker_id.cmp(&b.worker_id))
    }
}

impl FromStr for RankingSignal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "points" => Ok(Self::Points),
            "productivity" | "productivity_last_3_months" => {
                Ok(Self::ProductivityLastThreeMonths)
            }
            _ => Err(format!(
                "unknown ranking signal '{s}' (expected 'points' or 'productivity')"
            )),
        }
    }
}

impl std::fmt::Display for RankingSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
