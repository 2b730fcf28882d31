//! Mapping CSV columns onto task fields

use csv::StringRecord;

use crate::store::{CompletionStatus, Task};

use super::errors::{CsvError, CsvResult};

/// One imported row. Only title and description are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    pub title: String,
    pub description: String,
    pub id: Option<String>,
    pub completed_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ImportRow {
    /// Build a task, generating whatever the row left out
    pub fn into_task(self) -> Task {
        let mut task = Task::new(self.title, self.description);
        if let Some(id) = self.id {
            task.id = id;
        }
        if let Some(created_at) = self.created_at {
            task.created_at = created_at;
        }
        task.completed_at = CompletionStatus::from_marker(self.completed_at.as_deref()).as_marker();
        task.updated_at = self.updated_at;
        task
    }
}

/// Column positions of each known field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    title: usize,
    description: usize,
    id: Option<usize>,
    completed_at: Option<usize>,
    created_at: Option<usize>,
    updated_at: Option<usize>,
}

impl ColumnMap {
    /// Title first, description second, nothing else
    pub fn positional() -> Self {
        Self {
            title: 0,
            description: 1,
            id: None,
            completed_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Use named columns when the header names both `title` and
    /// `description`; otherwise fall back to positions.
    pub fn from_header(header: &StringRecord) -> Self {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        match (find("title"), find("description")) {
            (Some(title), Some(description)) => Self {
                title,
                description,
                id: find("id"),
                completed_at: find("completed_at"),
                created_at: find("created_at"),
                updated_at: find("updated_at"),
            },
            _ => Self::positional(),
        }
    }

    pub fn row(&self, line: u64, record: &StringRecord) -> CsvResult<ImportRow> {
        let take = |index: usize| record.get(index).map(str::to_string);

        let title = take(self.title).ok_or(CsvError::MissingColumn {
            line,
            column: "title",
        })?;
        let description = take(self.description).ok_or(CsvError::MissingColumn {
            line,
            column: "description",
        })?;

        // Optional columns: empty cells count as absent
        let optional = |index: Option<usize>| index.and_then(take).filter(|v| !v.is_empty());

        Ok(ImportRow {
            title,
            description,
            id: optional(self.id),
            completed_at: optional(self.completed_at),
            created_at: optional(self.created_at),
            updated_at: optional(self.updated_at),
        })
    }
}
