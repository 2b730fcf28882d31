//! # Table Store
//!
//! A named collection of ordered tables mirrored to a single JSON file.
//!
//! - `select` reads under a shared guard and never mutates.
//! - `insert`, `update`, `delete` and `set_completion_status` run one at a
//!   time and return only after the whole store has been persisted.
//! - A missing id is reported as `None`, never as an error.

pub mod errors;
pub mod filter;
pub mod persist;
pub mod record;
pub mod table_store;

pub use errors::{StoreError, StoreResult};
pub use filter::{Filter, SearchTerm};
pub use persist::CorruptPolicy;
pub use record::{
    now_timestamp, Completable, CompletedMarker, CompletionStatus, Record, Task, TaskField,
    TaskPatch, TASKS_TABLE,
};
pub use table_store::TableStore;

/// The store the service runs on
pub type TaskStore = TableStore<Task>;
