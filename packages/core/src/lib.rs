//! TaskDeck Core Record Store
//!
//! This crate provides the record-management layer for TaskDeck: a typed
//! task record model over a schema-less key-value table.
//!
//! # Architecture
//!
//! - **Attribute Codec**: Total coercion of untyped inbound fields into the
//!   five canonical attribute kinds (string, number, boolean, string list,
//!   string-keyed map). Never fails - permissiveness is contractual.
//! - **Task Record Store**: [`TaskService`] owns create / read-all /
//!   partial-update / delete and composes sparse per-field update
//!   operations from exactly the fields supplied.
//! - **Table Abstraction**: [`TaskTable`] is the storage boundary. Only the
//!   `id` key is declared up front; everything else rides in a JSON record.
//!   Two backends: `SqliteTable` (libsql) and `MemoryTable` (tests).
//!
//! # Modules
//!
//! - [`models`] - Task record, inbound field set, attribute codec
//! - [`services`] - TaskService business layer
//! - [`db`] - Table abstraction and backends

pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use db::{AssignmentSet, MemoryTable, SqliteTable, TableError, TaskTable};
pub use models::{Attribute, Task, TaskFields};
pub use services::{TaskService, TaskServiceError};
