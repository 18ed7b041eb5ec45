// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slash-separated addresses into the record tree.

use std::str::FromStr;

use crate::error::StoreError;

/// Characters that may never appear inside a path segment.
const FORBIDDEN: [char; 6] = ['.', '#', '$', '[', ']', '/'];

/// A validated location in the record tree, e.g. `shifts/2026-10-19/status`.
///
/// Paths order segment-wise, so an ancestor always sorts directly before
/// the block of its descendants.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    /// The root of the tree.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parses slash-separated text. Leading and trailing slashes are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if any segment is empty or contains a forbidden character.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let trimmed: &str = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        Self::from_segments(trimmed.split('/'))
    }

    /// Builds a path from individual segments.
    ///
    /// # Errors
    ///
    /// Returns an error if any segment is empty or contains a forbidden character.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path: Self = Self::root();
        for segment in segments {
            path.push(segment.as_ref())?;
        }
        Ok(path)
    }

    /// Returns a new path with `segment` appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is empty or contains a forbidden character.
    pub fn child(&self, segment: &str) -> Result<Self, StoreError> {
        let mut path: Self = self.clone();
        path.push(segment)?;
        Ok(path)
    }

    fn push(&mut self, segment: &str) -> Result<(), StoreError> {
        if segment.is_empty() {
            return Err(StoreError::InvalidPath {
                path: format!("{self}/"),
                reason: String::from("empty segment"),
            });
        }
        if let Some(bad) = segment.chars().find(|c| FORBIDDEN.contains(c)) {
            return Err(StoreError::InvalidPath {
                path: format!("{self}/{segment}"),
                reason: format!("segment contains forbidden character '{bad}'"),
            });
        }
        self.segments.push(segment.to_string());
        Ok(())
    }

    /// The individual segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments. The root has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether `other` lies strictly below this path.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        other.segments.len() > self.segments.len() && other.segments.starts_with(&self.segments)
    }
}

impl std::fmt::Display for StorePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl FromStr for StorePath {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
