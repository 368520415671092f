//! Table Error Types
//!
//! Error types for the task table boundary. `PreconditionFailed` is the
//! distinguished outcome of conditional operations (the record to update
//! or delete does not exist); every other variant is an opaque backend
//! failure the caller cannot recover from.

use std::path::PathBuf;
use thiserror::Error;

/// Task table operation errors
#[derive(Error, Debug)]
pub enum TableError {
    /// Conditional operation found no record with the given id.
    ///
    /// Raised atomically by the backend as part of the same operation as
    /// the write, never as a separate read-then-write check.
    #[error("Precondition failed: no record with id {id}")]
    PreconditionFailed { id: String },

    /// Failed to open the table database
    #[error("Failed to open task table at {path}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        source: libsql::Error,
    },

    /// Failed to initialize the table schema
    #[error("Failed to initialize task table schema: {0}")]
    InitializationFailed(String),

    /// Failed to create parent directory for the table database
    #[error("Failed to create parent directory for task table: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),

    /// libsql operation error
    #[error("Table operation failed: {0}")]
    LibsqlError(#[from] libsql::Error),

    /// SQL execution error with context
    #[error("SQL execution failed: {context}")]
    SqlExecutionError { context: String },

    /// Record could not be (de)serialized to its JSON storage form
    #[error("Record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TableError {
    /// Create a precondition failed error for the given record id
    pub fn precondition_failed(id: impl Into<String>) -> Self {
        Self::PreconditionFailed { id: id.into() }
    }

    /// Create a connection failed error
    pub fn connection_failed(path: PathBuf, source: libsql::Error) -> Self {
        Self::ConnectionFailed { path, source }
    }

    /// Create an initialization failed error
    pub fn initialization_failed(msg: impl Into<String>) -> Self {
        Self::InitializationFailed(msg.into())
    }

    /// Create a SQL execution error with context
    pub fn sql_execution(context: impl Into<String>) -> Self {
        Self::SqlExecutionError {
            context: context.into(),
        }
    }
}
