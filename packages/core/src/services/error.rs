//! Service Layer Error Types
//!
//! The three distinguishable outcomes callers of the record store must be
//! able to tell apart:
//!
//! - `Validation` - malformed or missing required input, rejected before
//!   any table call
//! - `NotFound` - the target record was absent at update/delete time
//! - `Table` - the underlying table failed for any other reason; surfaced
//!   with diagnostic detail, never retried here

use crate::db::TableError;
use thiserror::Error;

/// Task record store operation errors
#[derive(Error, Debug)]
pub enum TaskServiceError {
    /// Malformed or missing required input
    #[error("Invalid task input: {0}")]
    Validation(String),

    /// No record with the given id exists
    #[error("Task not found: {id}")]
    NotFound { id: String },

    /// Underlying table failure (other than the existence precondition)
    #[error("Task table operation failed: {0}")]
    Table(#[from] TableError),
}

impl TaskServiceError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error for the given record id
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}
