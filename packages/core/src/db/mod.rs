//! Database Layer
//!
//! The table abstraction for task records and its backends:
//!
//! - `TaskTable` trait - the storage boundary (put, full scan, conditional
//!   update, conditional delete)
//! - `SqliteTable` - libsql-backed table; only the `id` key is declared in
//!   the schema, the rest of the record is a schema-less JSON attribute
//! - `MemoryTable` - in-memory reference implementation for tests
//!
//! Per-record mutual exclusion lives entirely in the backends' atomic
//! conditional operations; the service layer holds no locks.

mod error;
mod memory_table;
mod sqlite_table;
mod task_table;

pub use error::TableError;
pub use memory_table::MemoryTable;
pub use sqlite_table::SqliteTable;
pub use task_table::{AssignmentSet, TaskTable};
