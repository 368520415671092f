//! MemoryTable - In-Memory TaskTable Backend
//!
//! HashMap-backed reference implementation of the table abstraction.
//! Implements the same conditional semantics as the libsql backend and is
//! the deterministic backend for service-layer unit tests.

use crate::db::{AssignmentSet, TableError, TaskTable};
use crate::models::Task;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory task table keyed by record id.
///
/// Scan order is hash order - callers must not rely on it, matching the
/// table abstraction's "no ordering guarantee" contract.
#[derive(Debug, Default)]
pub struct MemoryTable {
    records: RwLock<HashMap<String, Task>>,
}

impl MemoryTable {
    /// Create an empty in-memory table
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored (test helper)
    pub fn len(&self) -> usize {
        self.records.read().expect("task table lock poisoned").len()
    }

    /// Check whether the table holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TaskTable for MemoryTable {
    async fn put(&self, task: Task) -> Result<(), TableError> {
        self.records
            .write()
            .expect("task table lock poisoned")
            .insert(task.id.clone(), task);
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<Task>, TableError> {
        Ok(self
            .records
            .read()
            .expect("task table lock poisoned")
            .values()
            .cloned()
            .collect())
    }

    async fn conditional_update(
        &self,
        id: &str,
        assignments: AssignmentSet,
    ) -> Result<Task, TableError> {
        // Check-and-apply under a single write lock: the existence check
        // and the write form one atomic operation.
        let mut records = self.records.write().expect("task table lock poisoned");
        let current = records
            .get(id)
            .ok_or_else(|| TableError::precondition_failed(id))?;

        let mut stored = match serde_json::to_value(current)? {
            Value::Object(map) => map,
            _ => return Err(TableError::sql_execution("record is not a JSON object")),
        };
        assignments.apply(&mut stored);
        let updated: Task = serde_json::from_value(Value::Object(stored))?;

        records.insert(id.to_string(), updated.clone());
        Ok(updated)
    }

    async fn conditional_delete(&self, id: &str) -> Result<(), TableError> {
        self.records
            .write()
            .expect("task table lock poisoned")
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| TableError::precondition_failed(id))
    }
}
