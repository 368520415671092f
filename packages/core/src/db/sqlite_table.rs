//! SqliteTable - libsql TaskTable Backend
//!
//! Embedded libsql implementation of the table abstraction. The schema
//! declares only the key attribute:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS tasks (
//!     id TEXT PRIMARY KEY,
//!     record JSON NOT NULL
//! )
//! ```
//!
//! Everything beyond `id` lives schema-less inside the `record` JSON
//! attribute, so new record fields never require a migration.
//!
//! # Conditional semantics
//!
//! Conditional update and delete are each a single SQL statement whose
//! WHERE clause is the existence precondition, so check and write are one
//! atomic operation. The update statement is composed dynamically from the
//! staged assignment set - one `json_set` path per supplied field - and
//! uses RETURNING to hand back the post-update record as confirmed by the
//! table.

use crate::db::{AssignmentSet, TableError, TaskTable};
use crate::models::Task;
use async_trait::async_trait;
use libsql::Builder;
use std::path::PathBuf;

/// libsql-backed task table.
pub struct SqliteTable {
    /// Single long-lived connection.
    ///
    /// Created once at init rather than per operation so that `:memory:`
    /// databases keep their contents (each fresh connection to `:memory:`
    /// would open an empty database).
    conn: libsql::Connection,
}

impl SqliteTable {
    /// Open (or create) a task table database at the given path.
    ///
    /// Ensures the parent directory exists, opens the database via the
    /// libsql builder, and runs idempotent schema initialization.
    ///
    /// # Errors
    ///
    /// Returns `TableError` if the directory cannot be created, the
    /// database cannot be opened, or schema initialization fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use taskdeck_core::db::SqliteTable;
    /// # use std::path::PathBuf;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let table = SqliteTable::new(PathBuf::from("./data/tasks.db")).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(db_path: PathBuf) -> Result<Self, TableError> {
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| TableError::connection_failed(db_path.clone(), e))?;

        let conn = db
            .connect()
            .map_err(|e| TableError::connection_failed(db_path, e))?;

        let table = Self { conn };
        table.initialize_schema().await?;
        Ok(table)
    }

    /// Open an in-memory task table (tests and throwaway environments).
    pub async fn new_in_memory() -> Result<Self, TableError> {
        Self::new(PathBuf::from(":memory:")).await
    }

    /// Execute a PRAGMA statement.
    ///
    /// PRAGMA statements return rows, so query() is required instead of
    /// execute().
    async fn execute_pragma(&self, pragma: &str) -> Result<(), TableError> {
        let mut stmt = self.conn.prepare(pragma).await.map_err(|e| {
            TableError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            TableError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// Initialize schema and SQLite configuration.
    ///
    /// Uses CREATE TABLE IF NOT EXISTS so initialization is idempotent and
    /// safe to run on every open.
    async fn initialize_schema(&self) -> Result<(), TableError> {
        // WAL mode for better concurrency, 5s busy timeout instead of
        // failing immediately on lock contention
        self.execute_pragma("PRAGMA journal_mode = WAL").await?;
        self.execute_pragma("PRAGMA busy_timeout = 5000").await?;

        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id TEXT PRIMARY KEY,
                    record JSON NOT NULL
                )",
                (),
            )
            .await
            .map_err(|e| {
                TableError::initialization_failed(format!("Failed to create tasks table: {}", e))
            })?;

        Ok(())
    }

    /// Parse a stored JSON record into a Task.
    fn parse_record(record_json: &str) -> Result<Task, TableError> {
        Ok(serde_json::from_str(record_json)?)
    }
}

#[async_trait]
impl TaskTable for SqliteTable {
    async fn put(&self, task: Task) -> Result<(), TableError> {
        let record = serde_json::to_string(&task)?;

        self.conn
            .execute(
                "INSERT OR REPLACE INTO tasks (id, record) VALUES (?, ?)",
                (task.id.as_str(), record.as_str()),
            )
            .await
            .map_err(|e| TableError::sql_execution(format!("Failed to put task: {}", e)))?;

        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<Task>, TableError> {
        let mut stmt = self
            .conn
            .prepare("SELECT record FROM tasks")
            .await
            .map_err(|e| {
                TableError::sql_execution(format!("Failed to prepare scan query: {}", e))
            })?;

        let mut rows = stmt.query(()).await.map_err(|e| {
            TableError::sql_execution(format!("Failed to execute scan query: {}", e))
        })?;

        let mut tasks = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| TableError::sql_execution(e.to_string()))?
        {
            let record_json: String = row
                .get(0)
                .map_err(|e| TableError::sql_execution(format!("Failed to get record: {}", e)))?;
            tasks.push(Self::parse_record(&record_json)?);
        }

        Ok(tasks)
    }

    async fn conditional_update(
        &self,
        id: &str,
        assignments: AssignmentSet,
    ) -> Result<Task, TableError> {
        // Compose one json_set path per staged assignment. Field names come
        // from the crate's field constants, never from request input, so
        // interpolating them into the path literals is safe.
        let mut sql = String::from("UPDATE tasks SET record = json_set(record");
        let mut params: Vec<libsql::Value> = Vec::with_capacity(assignments.len() + 1);
        for (name, value) in assignments.iter() {
            sql.push_str(&format!(", '$.{}', json(?)", name));
            params.push(libsql::Value::Text(value.to_json().to_string()));
        }
        sql.push_str(") WHERE id = ? RETURNING record");
        params.push(libsql::Value::Text(id.to_string()));

        let mut stmt = self.conn.prepare(&sql).await.map_err(|e| {
            TableError::sql_execution(format!("Failed to prepare conditional update: {}", e))
        })?;

        let mut rows = stmt
            .query(libsql::params_from_iter(params))
            .await
            .map_err(|e| {
                TableError::sql_execution(format!("Failed to execute conditional update: {}", e))
            })?;

        // No RETURNING row means the WHERE clause matched nothing: the
        // existence precondition failed and nothing was written.
        let row = rows
            .next()
            .await
            .map_err(|e| TableError::sql_execution(e.to_string()))?
            .ok_or_else(|| TableError::precondition_failed(id))?;

        let record_json: String = row
            .get(0)
            .map_err(|e| TableError::sql_execution(format!("Failed to get record: {}", e)))?;
        Self::parse_record(&record_json)
    }

    async fn conditional_delete(&self, id: &str) -> Result<(), TableError> {
        let affected = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?", [id])
            .await
            .map_err(|e| TableError::sql_execution(format!("Failed to delete task: {}", e)))?;

        if affected == 0 {
            return Err(TableError::precondition_failed(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{field, Attribute};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample_task(title: &str) -> Task {
        Task::new(
            title.to_string(),
            3,
            false,
            vec!["urgent".to_string(), "backend".to_string()],
            BTreeMap::from([("assignee".to_string(), "Alice".to_string())]),
        )
    }

    #[tokio::test]
    async fn test_put_then_scan_round_trip() {
        let table = SqliteTable::new_in_memory().await.unwrap();
        let task = sample_task("Ship release");
        table.put(task.clone()).await.unwrap();

        let all = table.scan_all().await.unwrap();
        assert_eq!(all, vec![task]);
    }

    #[tokio::test]
    async fn test_scan_empty_table() {
        let table = SqliteTable::new_in_memory().await.unwrap();
        assert!(table.scan_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_overwrites_by_id() {
        let table = SqliteTable::new_in_memory().await.unwrap();
        let mut task = sample_task("first");
        table.put(task.clone()).await.unwrap();

        task.title = "second".to_string();
        table.put(task).await.unwrap();

        let all = table.scan_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "second");
    }

    #[tokio::test]
    async fn test_conditional_update_applies_only_staged_fields() {
        let table = SqliteTable::new_in_memory().await.unwrap();
        let task = sample_task("Ship release");
        let id = task.id.clone();
        table.put(task.clone()).await.unwrap();

        let mut assignments = AssignmentSet::new();
        assignments.set(field::PRIORITY, Attribute::N(5));
        let updated = table.conditional_update(&id, assignments).await.unwrap();

        assert_eq!(updated.priority, 5);
        assert_eq!(updated.title, task.title);
        assert_eq!(updated.completed, task.completed);
        assert_eq!(updated.tags, task.tags);
        assert_eq!(updated.metadata, task.metadata);
    }

    #[tokio::test]
    async fn test_conditional_update_replaces_whole_map_attribute() {
        let table = SqliteTable::new_in_memory().await.unwrap();
        let task = sample_task("t");
        let id = task.id.clone();
        table.put(task).await.unwrap();

        // A staged map assignment replaces the stored map, it does not merge
        let mut assignments = AssignmentSet::new();
        assignments.set(
            field::METADATA,
            Attribute::M(BTreeMap::from([(
                "category".to_string(),
                "infra".to_string(),
            )])),
        );
        let updated = table.conditional_update(&id, assignments).await.unwrap();

        assert_eq!(updated.metadata.len(), 1);
        assert_eq!(updated.metadata.get("category").unwrap(), "infra");
        assert!(updated.metadata.get("assignee").is_none());
    }

    #[tokio::test]
    async fn test_conditional_update_missing_record() {
        let table = SqliteTable::new_in_memory().await.unwrap();
        let mut assignments = AssignmentSet::new();
        assignments.set(field::TITLE, Attribute::S("x".to_string()));

        let err = table
            .conditional_update("no-such-id", assignments)
            .await
            .unwrap_err();
        assert!(matches!(err, TableError::PreconditionFailed { .. }));
        assert!(table.scan_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_conditional_delete() {
        let table = SqliteTable::new_in_memory().await.unwrap();
        let task = sample_task("t");
        let id = task.id.clone();
        table.put(task).await.unwrap();

        table.conditional_delete(&id).await.unwrap();
        assert!(table.scan_all().await.unwrap().is_empty());

        let err = table.conditional_delete(&id).await.unwrap_err();
        assert!(matches!(err, TableError::PreconditionFailed { .. }));
    }

    #[tokio::test]
    async fn test_records_persist_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("tasks.db");

        let task = sample_task("durable");
        {
            let table = SqliteTable::new(db_path.clone()).await.unwrap();
            table.put(task.clone()).await.unwrap();
        }

        let reopened = SqliteTable::new(db_path).await.unwrap();
        let all = reopened.scan_all().await.unwrap();
        assert_eq!(all, vec![task]);
    }
}
