//! Record types held by the table store
//!
//! A table holds records of one type. The type declares which of its fields
//! can be searched, so filters can only ever name fields that exist.

use std::fmt;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the table tasks live in
pub const TASKS_TABLE: &str = "tasks";

/// A record that can live in a [`TableStore`](super::TableStore) table
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Enumerated set of searchable fields
    type Field: Copy + fmt::Debug + Send + Sync;

    /// Partial update merged over an existing record
    type Patch: Send;

    /// Unique id within the table, fixed at creation
    fn id(&self) -> &str;

    /// Replace the id with a freshly generated one
    fn assign_fresh_id(&mut self);

    /// Text value of a field, `None` when the field is null
    fn field_text(&self, field: Self::Field) -> Option<&str>;

    /// Merge a patch over this record. The id never changes.
    fn apply_patch(&mut self, patch: Self::Patch);
}

/// Records with a two-valued completion status
pub trait Completable: Record {
    fn set_completion(&mut self, status: CompletionStatus);
}

/// Completion status of a task
///
/// Persisted as `"complete"` or `null` in the `completed_at` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Complete,
    Incomplete,
}

impl CompletionStatus {
    /// Parse the `completed_at` query value. Only `complete` and `null` are accepted.
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "complete" => Some(CompletionStatus::Complete),
            "null" => Some(CompletionStatus::Incomplete),
            _ => None,
        }
    }

    /// Anything other than the `complete` marker means incomplete
    pub fn from_marker(value: Option<&str>) -> Self {
        match value {
            Some("complete") => CompletionStatus::Complete,
            _ => CompletionStatus::Incomplete,
        }
    }

    pub fn as_marker(&self) -> Option<CompletedMarker> {
        match self {
            CompletionStatus::Complete => Some(CompletedMarker::Complete),
            CompletionStatus::Incomplete => None,
        }
    }
}

/// The only non-null value `completed_at` can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletedMarker {
    #[serde(rename = "complete")]
    Complete,
}

impl CompletedMarker {
    pub fn as_str(&self) -> &'static str {
        "complete"
    }
}

/// A task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed_at: Option<CompletedMarker>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl Task {
    /// Create a fresh task with a new id, created now, not completed and never updated
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            completed_at: None,
            created_at: now_timestamp(),
            updated_at: None,
        }
    }

    pub fn completion_status(&self) -> CompletionStatus {
        CompletionStatus::from_marker(self.completed_at.map(|m| m.as_str()))
    }
}

/// Searchable task fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Id,
    Title,
    Description,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

impl TaskField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskField::Id => "id",
            TaskField::Title => "title",
            TaskField::Description => "description",
            TaskField::CompletedAt => "completed_at",
            TaskField::CreatedAt => "created_at",
            TaskField::UpdatedAt => "updated_at",
        }
    }
}

/// Partial task update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub updated_at: Option<String>,
}

impl TaskPatch {
    /// Title and description edit, stamped with the current time
    pub fn edit(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            updated_at: Some(now_timestamp()),
        }
    }
}

impl Record for Task {
    type Field = TaskField;
    type Patch = TaskPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_fresh_id(&mut self) {
        self.id = Uuid::new_v4().to_string();
    }

    fn field_text(&self, field: TaskField) -> Option<&str> {
        match field {
            TaskField::Id => Some(&self.id),
            TaskField::Title => Some(&self.title),
            TaskField::Description => Some(&self.description),
            TaskField::CompletedAt => self.completed_at.map(|m| m.as_str()),
            TaskField::CreatedAt => Some(&self.created_at),
            TaskField::UpdatedAt => self.updated_at.as_deref(),
        }
    }

    fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(updated_at) = patch.updated_at {
            self.updated_at = Some(updated_at);
        }
    }
}

impl Completable for Task {
    fn set_completion(&mut self, status: CompletionStatus) {
        self.completed_at = status.as_marker();
    }
}

/// Current time as an RFC 3339 UTC timestamp with millisecond precision
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new("Buy milk", "2 litres");

        assert!(Uuid::parse_str(&task.id).is_ok());
        assert_eq!(task.completed_at, None);
        assert_eq!(task.updated_at, None);
        assert!(chrono::DateTime::parse_from_rfc3339(&task.created_at).is_ok());
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = Task::new("a", "a");
        let b = Task::new("a", "a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_patch_keeps_id_and_created_at() {
        let mut task = Task::new("old", "old desc");
        let original = task.clone();

        task.apply_patch(TaskPatch::edit("new", "new desc"));

        assert_eq!(task.id, original.id);
        assert_eq!(task.created_at, original.created_at);
        assert_eq!(task.title, "new");
        assert_eq!(task.description, "new desc");
        assert!(task.updated_at.is_some());
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut task = Task::new("t", "d");
        let original = task.clone();
        task.apply_patch(TaskPatch::default());
        assert_eq!(task, original);
    }

    #[test]
    fn test_completion_serializes_as_marker_or_null() {
        let mut task = Task::new("t", "d");
        task.set_completion(CompletionStatus::Complete);
        assert_eq!(serde_json::to_value(&task).unwrap()["completed_at"], json!("complete"));

        task.set_completion(CompletionStatus::Incomplete);
        assert_eq!(serde_json::to_value(&task).unwrap()["completed_at"], json!(null));
    }

    #[test]
    fn test_completion_query_values() {
        assert_eq!(
            CompletionStatus::from_query("complete"),
            Some(CompletionStatus::Complete)
        );
        assert_eq!(
            CompletionStatus::from_query("null"),
            Some(CompletionStatus::Incomplete)
        );
        assert_eq!(CompletionStatus::from_query("done"), None);
        assert_eq!(CompletionStatus::from_query(""), None);
    }

    #[test]
    fn test_assign_fresh_id() {
        let mut task = Task::new("t", "d");
        let before = task.clone();

        task.assign_fresh_id();

        assert_ne!(task.id, before.id);
        assert!(Uuid::parse_str(&task.id).is_ok());
        assert_eq!(task.created_at, before.created_at);
    }

    #[test]
    fn test_null_fields_have_no_text() {
        let task = Task::new("t", "d");
        assert_eq!(task.field_text(TaskField::UpdatedAt), None);
        assert_eq!(task.field_text(TaskField::CompletedAt), None);
        assert_eq!(task.field_text(TaskField::Title), Some("t"));
    }
}
