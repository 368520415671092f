//! TaskService - The Task Record Store
//!
//! CRUD operations for task records over the table abstraction. The
//! service owns the typed attribute model and the existence invariants;
//! the table owns atomicity.
//!
//! # Partial updates
//!
//! `update_task` composes a sparse [`AssignmentSet`] by inspecting which
//! fields the caller actually supplied: one named assignment per present
//! field plus the `updatedAt` stamp, issued as a single conditional
//! update. Untouched fields are never materialized, resent, or defaulted.
//!
//! # Record lifecycle
//!
//! Absent -> Active (create), Active -> Active (update), Active -> Absent
//! (delete). Update and delete from Absent fail with `NotFound` - they
//! never auto-create.
//!
//! # Examples
//!
//! ```rust
//! use taskdeck_core::db::MemoryTable;
//! use taskdeck_core::models::TaskFields;
//! use taskdeck_core::services::TaskService;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let service = TaskService::new(Arc::new(MemoryTable::new()));
//!
//! let created = service
//!     .create_task(TaskFields::new().with_title(json!("Ship release")))
//!     .await?;
//! assert_eq!(created.priority, 3);
//!
//! let updated = service
//!     .update_task(&created.id, TaskFields::new().with_completed(json!(true)))
//!     .await?;
//! assert!(updated.completed);
//! # Ok(())
//! # }
//! ```

use crate::db::{AssignmentSet, TableError, TaskTable};
use crate::models::{codec, field, Attribute, Task, TaskFields, DEFAULT_PRIORITY};
use crate::services::TaskServiceError;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// The task record store.
///
/// Holds no locks and keeps no in-process state: per-record mutual
/// exclusion is delegated entirely to the table's atomic conditional
/// operations. Concurrent updates touching overlapping fields are
/// last-write-wins; disjoint field sets never clobber each other.
pub struct TaskService {
    table: Arc<dyn TaskTable>,
}

impl TaskService {
    /// Create a service over the given table backend
    pub fn new(table: Arc<dyn TaskTable>) -> Self {
        Self { table }
    }

    /// Create a new task record.
    ///
    /// Generates a fresh id, coerces every supplied field through the
    /// attribute codec, applies creation defaults (`priority` 3 for
    /// absent or null input, `completed` false) and stamps `createdAt`.
    /// The write is unconditional - the fresh id cannot collide.
    ///
    /// # Errors
    ///
    /// - `Validation` if `title` is absent, null, or empty after trimming
    /// - `Table` if the write fails
    pub async fn create_task(&self, fields: TaskFields) -> Result<Task, TaskServiceError> {
        let title = match &fields.title {
            Some(value) if !value.is_null() => codec::coerce_string(value),
            _ => String::new(),
        };
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskServiceError::validation("title is required"));
        }

        let task = Task::new(
            title.to_string(),
            fields
                .priority
                .as_ref()
                .filter(|value| !value.is_null())
                .map(codec::coerce_number)
                .unwrap_or(DEFAULT_PRIORITY),
            fields
                .completed
                .as_ref()
                .map(codec::coerce_bool)
                .unwrap_or(false),
            fields
                .tags
                .as_ref()
                .map(codec::coerce_string_list)
                .unwrap_or_default(),
            fields
                .metadata
                .as_ref()
                .map(codec::coerce_string_map)
                .unwrap_or_default(),
        );

        self.table.put(task.clone()).await?;

        info!(task_id = %task.id, "Created task");
        Ok(task)
    }

    /// Return every task record via full table enumeration.
    ///
    /// No filtering, no pagination, no ordering guarantee - callers
    /// re-sort if they need an order. Acceptable only because the table
    /// models a small dataset; a known scaling non-goal.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        let tasks = self.table.scan_all().await?;
        debug!(count = tasks.len(), "Scanned task table");
        Ok(tasks)
    }

    /// Apply a partial update to an existing task record.
    ///
    /// Only fields present in `fields` are staged; each goes through the
    /// attribute codec with no defaulting. `updatedAt` is always staged.
    /// The staged set is issued as one conditional update, so the
    /// existence check and the write are a single atomic operation and a
    /// failed precondition has no partial effect.
    ///
    /// # Returns
    ///
    /// The complete post-update record as confirmed by the table, not a
    /// client-reconstructed value.
    ///
    /// # Errors
    ///
    /// - `Validation` if `id` is empty, or no mutable field was supplied
    ///   (checked before any table call)
    /// - `NotFound` if no record with `id` exists
    /// - `Table` on any other table failure
    pub async fn update_task(
        &self,
        id: &str,
        fields: TaskFields,
    ) -> Result<Task, TaskServiceError> {
        if id.trim().is_empty() {
            return Err(TaskServiceError::validation("task id is required"));
        }

        let mut assignments = AssignmentSet::new();
        if let Some(value) = &fields.title {
            assignments.set(field::TITLE, Attribute::S(codec::coerce_string(value)));
        }
        if let Some(value) = &fields.priority {
            assignments.set(field::PRIORITY, Attribute::N(codec::coerce_number(value)));
        }
        if let Some(value) = &fields.completed {
            assignments.set(field::COMPLETED, Attribute::Bool(codec::coerce_bool(value)));
        }
        if let Some(value) = &fields.tags {
            assignments.set(field::TAGS, Attribute::L(codec::coerce_string_list(value)));
        }
        if let Some(value) = &fields.metadata {
            assignments.set(
                field::METADATA,
                Attribute::M(codec::coerce_string_map(value)),
            );
        }

        if assignments.is_empty() {
            return Err(TaskServiceError::validation("no fields to update"));
        }

        assignments.set(field::UPDATED_AT, Attribute::S(Utc::now().to_rfc3339()));

        match self.table.conditional_update(id, assignments).await {
            Ok(task) => {
                info!(task_id = %id, "Updated task");
                Ok(task)
            }
            Err(TableError::PreconditionFailed { id }) => Err(TaskServiceError::NotFound { id }),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the task record with the given id.
    ///
    /// # Returns
    ///
    /// The deleted id as confirmation.
    ///
    /// # Errors
    ///
    /// - `Validation` if `id` is empty
    /// - `NotFound` if no record with `id` exists
    /// - `Table` on any other table failure
    pub async fn delete_task(&self, id: &str) -> Result<String, TaskServiceError> {
        if id.trim().is_empty() {
            return Err(TaskServiceError::validation("task id is required"));
        }

        match self.table.conditional_delete(id).await {
            Ok(()) => {
                info!(task_id = %id, "Deleted task");
                Ok(id.to_string())
            }
            Err(TableError::PreconditionFailed { id }) => Err(TaskServiceError::NotFound { id }),
            Err(e) => Err(e.into()),
        }
    }
}
