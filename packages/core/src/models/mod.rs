//! Data Models
//!
//! This module contains the core data structures for the task record store:
//!
//! - `Task` - the single persisted record type
//! - `TaskFields` - untyped inbound field set for create/update requests
//! - `Attribute` - the five canonical attribute kinds the codec produces
//! - `codec` - coercion rules from untyped input to canonical attributes

pub mod codec;
mod task;

pub use task::{field, Attribute, Task, TaskFields, DEFAULT_PRIORITY};
