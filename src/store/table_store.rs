//! File-backed table store
//!
//! Owns the in-memory tables and their on-disk mirror. Every mutation holds
//! the write guard across {mutate, persist}, so mutations are applied and
//! persisted one at a time, in lock acquisition order. A failed persist rolls
//! the touched table back to its pre-mutation rows.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

use super::errors::{StoreError, StoreResult};
use super::filter::Filter;
use super::persist::{self, CorruptPolicy, Loaded, Tables};
use super::record::{Completable, CompletionStatus, Record};
use crate::observability::{log_event_at, log_event_with_fields, Event, Severity};

/// Durable, queryable table storage
pub struct TableStore<R: Record> {
    path: PathBuf,
    tables: RwLock<Tables<R>>,
}

impl<R: Record> TableStore<R> {
    /// Load the store from `path`.
    ///
    /// A missing (or blank) file starts an empty store and persists it
    /// immediately. A corrupt file is fatal under [`CorruptPolicy::Fail`];
    /// under [`CorruptPolicy::Reset`] it is moved aside and the store starts
    /// empty.
    pub async fn open(path: impl Into<PathBuf>, on_corrupt: CorruptPolicy) -> StoreResult<Self> {
        let path = path.into();
        let path_str = path.display().to_string();

        let tables = match persist::load_tables::<R>(&path).await? {
            Loaded::Existing(tables) => {
                let rows: usize = tables.values().map(Vec::len).sum();
                log_event_with_fields(
                    Event::StoreLoaded,
                    &[
                        ("path", &path_str),
                        ("tables", &tables.len().to_string()),
                        ("rows", &rows.to_string()),
                    ],
                );
                return Ok(Self::from_parts(path, tables));
            }
            Loaded::Missing => {
                log_event_with_fields(Event::StoreInitialized, &[("path", &path_str)]);
                Tables::new()
            }
            Loaded::Corrupt(reason) => match on_corrupt {
                CorruptPolicy::Fail => {
                    log_event_with_fields(
                        Event::StoreCorrupt,
                        &[("path", &path_str), ("reason", &reason)],
                    );
                    return Err(StoreError::Corrupt { path, reason });
                }
                CorruptPolicy::Reset => {
                    let moved = persist::quarantine(&path).await?;
                    log_event_at(
                        Severity::Warn,
                        Event::StoreCorruptReset,
                        &[
                            ("path", &path_str),
                            ("moved_to", &moved.display().to_string()),
                            ("reason", &reason),
                        ],
                    );
                    Tables::new()
                }
            },
        };

        persist::write_tables(&path, &tables).await?;
        Ok(Self::from_parts(path, tables))
    }

    fn from_parts(path: PathBuf, tables: Tables<R>) -> Self {
        Self {
            path,
            tables: RwLock::new(tables),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rows of `table` in insertion order, narrowed by `filter` when given.
    /// An absent table yields no rows.
    pub async fn select(&self, table: &str, filter: Option<&Filter<R::Field>>) -> Vec<R> {
        let tables = self.tables.read().await;
        let Some(rows) = tables.get(table) else {
            return Vec::new();
        };

        match filter {
            Some(filter) => rows.iter().filter(|r| filter.matches(*r)).cloned().collect(),
            None => rows.clone(),
        }
    }

    /// Find one row by id
    pub async fn get(&self, table: &str, id: &str) -> Option<R> {
        let tables = self.tables.read().await;
        tables.get(table)?.iter().find(|r| r.id() == id).cloned()
    }

    /// Number of rows in `table`
    pub async fn len(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, Vec::len)
    }

    /// Names of all tables, sorted
    pub async fn table_names(&self) -> Vec<String> {
        self.tables.read().await.keys().cloned().collect()
    }

    /// Append `record` to `table`, creating the table if needed.
    ///
    /// Ids are not checked for duplicates; callers supply fresh ones.
    pub async fn insert(&self, table: &str, record: R) -> StoreResult<R> {
        let inserted = record.clone();
        self.mutate(table, |rows| {
            rows.push(record);
            Some(())
        })
        .await?;
        Ok(inserted)
    }

    /// Append a batch of records with a single persist. Returns how many were added.
    ///
    /// Batches may carry ids from outside. A record whose id is already in the
    /// table, or earlier in the same batch, gets a fresh id instead.
    pub async fn insert_many(&self, table: &str, records: Vec<R>) -> StoreResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let count = records.len();
        self.mutate(table, |rows| {
            let mut taken: HashSet<String> = rows.iter().map(|r| r.id().to_string()).collect();
            for mut record in records {
                while !taken.insert(record.id().to_string()) {
                    record.assign_fresh_id();
                }
                rows.push(record);
            }
            Some(())
        })
        .await?;
        Ok(count)
    }

    /// Merge `patch` over the row with `id`. `None` when no such row exists.
    pub async fn update(&self, table: &str, id: &str, patch: R::Patch) -> StoreResult<Option<R>> {
        self.mutate(table, |rows| {
            let row = rows.iter_mut().find(|r| r.id() == id)?;
            row.apply_patch(patch);
            Some(row.clone())
        })
        .await
    }

    /// Remove the first row with `id`, returning it. `None` when no such row exists.
    pub async fn delete(&self, table: &str, id: &str) -> StoreResult<Option<R>> {
        self.mutate(table, |rows| {
            let index = rows.iter().position(|r| r.id() == id)?;
            Some(rows.remove(index))
        })
        .await
    }

    /// Run `change` against one table under the write guard and persist.
    ///
    /// `change` returns `None` when it left the table untouched; nothing is
    /// persisted then. On persist failure the table is restored.
    async fn mutate<T>(
        &self,
        table: &str,
        change: impl FnOnce(&mut Vec<R>) -> Option<T>,
    ) -> StoreResult<Option<T>> {
        let mut tables = self.tables.write().await;
        let previous = tables.get(table).cloned();

        let outcome = change(tables.entry(table.to_string()).or_default());

        let Some(outcome) = outcome else {
            if previous.is_none() {
                tables.remove(table);
            }
            return Ok(None);
        };

        match persist::write_tables(&self.path, &*tables).await {
            Ok(bytes) => {
                log_event_with_fields(
                    Event::StorePersisted,
                    &[("bytes", &bytes.to_string()), ("table", table)],
                );
                Ok(Some(outcome))
            }
            Err(e) => {
                match previous {
                    Some(rows) => {
                        tables.insert(table.to_string(), rows);
                    }
                    None => {
                        tables.remove(table);
                    }
                }
                log_event_at(
                    Severity::Error,
                    Event::StorePersistFailed,
                    &[("error", &e.to_string()), ("table", table)],
                );
                Err(e)
            }
        }
    }
}

impl<R: Completable> TableStore<R> {
    /// Set the completion status of the row with `id`.
    ///
    /// Returns the status that was applied, or `None` when no such row exists.
    pub async fn set_completion_status(
        &self,
        table: &str,
        id: &str,
        status: CompletionStatus,
    ) -> StoreResult<Option<CompletionStatus>> {
        self.mutate(table, |rows| {
            let row = rows.iter_mut().find(|r| r.id() == id)?;
            row.set_completion(status);
            Some(status)
        })
        .await
    }
}
