//! # Search Filters
//!
//! A filter is a set of `(field, needle)` terms combined with OR: a record
//! matches when any listed field contains its needle, ignoring case.

use super::record::Record;

/// One search term
#[derive(Debug, Clone)]
pub struct SearchTerm<F> {
    pub field: F,
    /// Lowercased search string
    needle: String,
}

impl<F: Copy> SearchTerm<F> {
    pub fn new(field: F, needle: &str) -> Self {
        Self {
            field,
            needle: needle.to_lowercase(),
        }
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Case-insensitive substring match. A null field never matches.
    pub fn matches<R: Record<Field = F>>(&self, record: &R) -> bool {
        record
            .field_text(self.field)
            .is_some_and(|text| text.to_lowercase().contains(&self.needle))
    }
}

/// A set of search terms combined with OR logic
#[derive(Debug, Clone)]
pub struct Filter<F> {
    terms: Vec<SearchTerm<F>>,
}

impl<F: Copy> Default for Filter<F> {
    fn default() -> Self {
        Self { terms: Vec::new() }
    }
}

impl<F: Copy> Filter<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same needle searched across several fields
    pub fn any_of(fields: &[F], needle: &str) -> Self {
        fields
            .iter()
            .fold(Self::new(), |filter, field| filter.or(*field, needle))
    }

    pub fn or(mut self, field: F, needle: &str) -> Self {
        self.terms.push(SearchTerm::new(field, needle));
        self
    }

    pub fn terms(&self) -> &[SearchTerm<F>] {
        &self.terms
    }

    /// An empty filter places no constraint
    pub fn matches<R: Record<Field = F>>(&self, record: &R) -> bool {
        self.terms.is_empty() || self.terms.iter().any(|t| t.matches(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::record::{CompletionStatus, Completable, Task, TaskField};

    #[test]
    fn test_case_insensitive_substring() {
        let task = Task::new("Write REPORT", "quarterly");
        let filter = Filter::new().or(TaskField::Title, "report");

        assert!(filter.matches(&task));
        assert!(!Filter::new().or(TaskField::Title, "memo").matches(&task));
    }

    #[test]
    fn test_or_across_fields() {
        let filter = Filter::any_of(&[TaskField::Title, TaskField::Description], "ab");

        assert!(filter.matches(&Task::new("xABx", "none")));
        assert!(filter.matches(&Task::new("none", "cab")));
        assert!(!filter.matches(&Task::new("none", "none")));
    }

    #[test]
    fn test_null_field_is_non_match() {
        let filter = Filter::new().or(TaskField::UpdatedAt, "2024");
        assert!(!filter.matches(&Task::new("t", "d")));
    }

    #[test]
    fn test_completed_marker_is_searchable() {
        let mut task = Task::new("t", "d");
        let filter = Filter::new().or(TaskField::CompletedAt, "COMPLETE");
        assert!(!filter.matches(&task));

        task.set_completion(CompletionStatus::Complete);
        assert!(filter.matches(&task));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter: Filter<TaskField> = Filter::new();
        assert!(filter.matches(&Task::new("a", "b")));
    }

    #[test]
    fn test_needle_is_lowercased_once() {
        let filter = Filter::new().or(TaskField::Title, "MiXeD");
        assert_eq!(filter.terms()[0].needle(), "mixed");
    }
}
