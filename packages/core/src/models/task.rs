//! Task Record Structures
//!
//! This module defines the `Task` record, the untyped inbound field set
//! (`TaskFields`), and the canonical `Attribute` kinds staged by partial
//! updates.
//!
//! # Attribute model
//!
//! A task exercises five distinct attribute shapes on top of its key:
//!
//! - `title` - string
//! - `priority` - number (integer, 1-5 by UI convention, default 3)
//! - `completed` - boolean (default false)
//! - `tags` - ordered list of strings (duplicates permitted)
//! - `metadata` - string-keyed map (`assignee`, `dueDate`, `category` by
//!   convention; arbitrary keys pass through)
//!
//! # Examples
//!
//! ```rust
//! use taskdeck_core::models::Task;
//! use std::collections::BTreeMap;
//!
//! let task = Task::new(
//!     "Ship release".to_string(),
//!     3,
//!     false,
//!     vec!["urgent".to_string(), "backend".to_string()],
//!     BTreeMap::from([("assignee".to_string(), "Alice".to_string())]),
//! );
//! assert!(!task.id.is_empty());
//! assert!(task.updated_at.is_none());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Priority applied at creation when the field is absent.
///
/// Creation-time rule only: update never defaults, it only ever changes
/// fields explicitly supplied.
pub const DEFAULT_PRIORITY: i64 = 3;

/// Wire/storage field names shared by the record, the update builder, and
/// the table backends. These are the serde camelCase names of [`Task`].
pub mod field {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const PRIORITY: &str = "priority";
    pub const COMPLETED: &str = "completed";
    pub const TAGS: &str = "tags";
    pub const METADATA: &str = "metadata";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
}

/// A single task record.
///
/// # Fields
///
/// - `id`: UUID v4, assigned exactly once by the store at creation, never
///   accepted from the client, sole lookup key
/// - `title`: never empty for a record that completed creation
/// - `priority`: integer; the 1-5 range is a UI convention, not enforced here
/// - `completed`: completion flag
/// - `tags`: insertion order preserved, duplicates permitted
/// - `metadata`: schema-less string map; no fixed key set enforced
/// - `created_at`: stamped once at creation, immutable
/// - `updated_at`: absent until the first successful update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier (UUID v4), the partition key of the table
    pub id: String,

    /// Task title (required, non-empty at creation)
    pub title: String,

    /// Integer priority, defaults to 3 at creation
    pub priority: i64,

    /// Completion flag, defaults to false at creation
    pub completed: bool,

    /// Ordered list of tag strings
    #[serde(default)]
    pub tags: Vec<String>,

    /// String-keyed metadata map (arbitrary keys pass through)
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    /// Creation timestamp (ISO-8601 on the wire)
    pub created_at: DateTime<Utc>,

    /// Last-update timestamp; set on every successful update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new Task with a fresh UUID and creation timestamp.
    ///
    /// The store calls this after running inbound fields through the
    /// attribute codec, so every argument is already a canonical value.
    pub fn new(
        title: String,
        priority: i64,
        completed: bool,
        tags: Vec<String>,
        metadata: BTreeMap<String, String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            priority,
            completed,
            tags,
            metadata,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// A canonical attribute value, one of the five kinds the codec produces.
///
/// Mirrors the storage engine's attribute types: S (string), N (number),
/// BOOL (boolean), L (list of strings), M (string map). Staged assignments
/// carry these values into the table's conditional update.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// String attribute (S)
    S(String),
    /// Number attribute (N)
    N(i64),
    /// Boolean attribute (BOOL)
    Bool(bool),
    /// List-of-strings attribute (L)
    L(Vec<String>),
    /// String-keyed map attribute (M)
    M(BTreeMap<String, String>),
}

impl Attribute {
    /// Render this attribute as its JSON storage representation.
    pub fn to_json(&self) -> Value {
        match self {
            Attribute::S(s) => Value::String(s.clone()),
            Attribute::N(n) => Value::from(*n),
            Attribute::Bool(b) => Value::Bool(*b),
            Attribute::L(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            Attribute::M(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
        }
    }
}

/// Deserializer marking a field as supplied whenever the key is present.
///
/// serde's default `Option` handling folds JSON `null` into `None`, which
/// would make `{"title": null}` indistinguishable from an omitted title.
/// Partial updates need that distinction: a present-but-null field is still
/// a supplied field and goes through the codec.
fn deserialize_supplied<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Untyped inbound field set for create and partial-update requests.
///
/// Every field is optional; `None` means the key was absent from the
/// request body and must be left untouched (update) or defaulted (create).
/// Values are raw JSON - the attribute codec owns all coercion.
///
/// # Examples
///
/// ```rust
/// use taskdeck_core::models::TaskFields;
/// use serde_json::json;
///
/// // Update only the priority; every other field stays untouched.
/// let fields = TaskFields::new().with_priority(json!(5));
/// assert!(!fields.is_empty());
///
/// let empty: TaskFields = serde_json::from_str("{}").unwrap();
/// assert!(empty.is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    /// Task title
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_supplied"
    )]
    pub title: Option<Value>,

    /// Integer priority
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_supplied"
    )]
    pub priority: Option<Value>,

    /// Completion flag
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_supplied"
    )]
    pub completed: Option<Value>,

    /// Tag list
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_supplied"
    )]
    pub tags: Option<Value>,

    /// Metadata map
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_supplied"
    )]
    pub metadata: Option<Value>,
}

impl TaskFields {
    /// Create an empty field set
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply a title value
    pub fn with_title(mut self, title: Value) -> Self {
        self.title = Some(title);
        self
    }

    /// Supply a priority value
    pub fn with_priority(mut self, priority: Value) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Supply a completed value
    pub fn with_completed(mut self, completed: Value) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Supply a tags value
    pub fn with_tags(mut self, tags: Value) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Supply a metadata value
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Check whether any mutable field was supplied
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
            && self.tags.is_none()
            && self.metadata.is_none()
    }
}
