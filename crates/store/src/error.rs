// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur while reading from or writing to a record store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A path could not be parsed or contains a forbidden segment.
    #[error("Invalid store path '{path}': {reason}")]
    InvalidPath {
        /// The offending path text.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },
    /// A write batch attempted to replace the whole store.
    #[error("The store root cannot be written directly")]
    RootWrite,
    /// A write batch contained no entries.
    #[error("Write batch is empty")]
    EmptyBatch,
    /// Two entries of one write batch overlap, so their order would be ambiguous.
    #[error("Write batch paths overlap: '{ancestor}' contains '{descendant}'")]
    OverlappingPaths {
        /// The shorter of the two paths.
        ancestor: String,
        /// The path nested below `ancestor`.
        descendant: String,
    },
    /// A value was written below a node that is not an object.
    #[error("Cannot write at '{path}': a parent node is not an object")]
    NotAnObject {
        /// The path being written.
        path: String,
    },
    /// A value could not be serialized or a stored body could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The underlying database reported an error.
    #[error("Database error: {0}")]
    Database(String),
    /// The database connection could not be established.
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),
    /// Schema migrations could not be applied.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
    /// The store could not be reached (network, timeout, transient outage).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<diesel::ConnectionError> for StoreError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::ConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
