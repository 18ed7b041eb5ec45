// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Record identifiers.
//!
//! Every identifier is an opaque string newtype so a shift id can never be
//! passed where a worker id is expected. All of them serialize as plain
//! strings.

use serde::{Deserialize, Serialize};

/// Generates a string-backed identifier newtype.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an existing identifier value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

record_id! {
    /// Identifies a week, derived from its Monday as an ISO week label (`2026-W43`).
    WeekId
}

record_id! {
    /// Identifies a shift, derived from its calendar date (`2026-10-19`).
    ShiftId
}

record_id! {
    /// Identifies a worker. Assigned externally.
    WorkerId
}

record_id! {
    /// Identifies an application. Assigned externally.
    ApplicationId
}

record_id! {
    /// Identifies an assignment, derived from its shift and worker.
    AssignmentId
}
