//! taskd - a small file-backed task tracking HTTP service
//!
//! - [`store`]: ordered tables of records mirrored to one JSON file, with
//!   serialized mutations
//! - [`routing`]: `:name` path templates and first-match dispatch
//! - [`http_server`]: task handlers and the axum server around them
//! - [`csv_import`]: CSV rows for bulk import
//! - [`cli`]: `init`, `serve` and `import` commands
//! - [`observability`]: structured JSON logging

pub mod cli;
pub mod csv_import;
pub mod http_server;
pub mod observability;
pub mod routing;
pub mod store;
