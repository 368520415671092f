//! TaskTable Trait - Table Abstraction Layer
//!
//! This module defines the `TaskTable` trait that abstracts the schema-less
//! key-value table task records live in, plus the `AssignmentSet` staged by
//! partial updates. The trait enables multiple backend implementations
//! (libsql, in-memory) without changing business logic in TaskService.
//!
//! # Conditional operations
//!
//! `conditional_update` and `conditional_delete` enforce the "record must
//! already exist" precondition atomically, inside the same operation as the
//! write. A failed precondition is a distinguishable outcome
//! ([`TableError::PreconditionFailed`]), never a silent no-op, and leaves
//! the table unchanged.
//!
//! # Examples
//!
//! ```rust
//! use taskdeck_core::db::{AssignmentSet, MemoryTable, TaskTable};
//! use taskdeck_core::models::{field, Attribute, Task};
//! use std::collections::BTreeMap;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let table = MemoryTable::new();
//! let task = Task::new("Review PR".to_string(), 3, false, Vec::new(), BTreeMap::new());
//! let id = task.id.clone();
//! table.put(task).await?;
//!
//! let mut assignments = AssignmentSet::new();
//! assignments.set(field::PRIORITY, Attribute::N(5));
//! let updated = table.conditional_update(&id, assignments).await?;
//! assert_eq!(updated.priority, 5);
//! # Ok(())
//! # }
//! ```

use crate::db::TableError;
use crate::models::{Attribute, Task};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A sparse set of per-field assignments for one conditional update.
///
/// The service builds this by inspecting which fields the caller actually
/// supplied: one named assignment per present field, nothing else. The
/// backend applies exactly these assignments, so untouched fields are
/// never materialized or resent.
#[derive(Debug, Clone, Default)]
pub struct AssignmentSet {
    assignments: BTreeMap<String, Attribute>,
}

impl AssignmentSet {
    /// Create an empty assignment set
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an assignment of `value` to the named field.
    ///
    /// Field names are the record's wire names (see [`crate::models::field`]).
    /// Staging the same field twice keeps the last value.
    pub fn set(&mut self, name: impl Into<String>, value: Attribute) {
        self.assignments.insert(name.into(), value);
    }

    /// Check whether any assignment was staged
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Number of staged assignments
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Iterate over staged assignments as (field name, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.assignments.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Apply the staged assignments to a record's JSON storage form.
    ///
    /// Keys absent from the set are left exactly as stored.
    pub fn apply(&self, record: &mut Map<String, Value>) {
        for (name, value) in &self.assignments {
            record.insert(name.clone(), value.to_json());
        }
    }
}

/// Abstraction over the schema-less key-value table holding task records.
///
/// Implementations must be `Send + Sync`; all methods are async to support
/// both embedded and networked backends. The table is keyed by `Task::id`
/// and stores the remaining attributes without any declared schema.
#[async_trait]
pub trait TaskTable: Send + Sync {
    /// Unconditionally insert or overwrite the record keyed by its id.
    ///
    /// Takes ownership of the task; the caller clones first if it needs to
    /// retain the value.
    async fn put(&self, task: Task) -> Result<(), TableError>;

    /// Return every record in the table via full enumeration.
    ///
    /// No ordering guarantee and no isolation guarantee: a scan concurrent
    /// with writes may observe a mix of pre- and post-update records.
    async fn scan_all(&self) -> Result<Vec<Task>, TableError>;

    /// Atomically apply the staged assignments iff a record with `id`
    /// exists, returning the full post-update record.
    ///
    /// # Errors
    ///
    /// `TableError::PreconditionFailed` if no record with `id` exists; in
    /// that case the table is left unchanged.
    async fn conditional_update(
        &self,
        id: &str,
        assignments: AssignmentSet,
    ) -> Result<Task, TableError>;

    /// Atomically remove the record keyed by `id` iff it exists.
    ///
    /// # Errors
    ///
    /// `TableError::PreconditionFailed` if no record with `id` exists.
    async fn conditional_delete(&self, id: &str) -> Result<(), TableError>;
}
