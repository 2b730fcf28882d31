//! # HTTP Server Module
//!
//! Serves the task API over axum. Routing is done by [`crate::routing`];
//! axum only accepts connections and applies CORS.

pub mod config;
pub mod errors;
pub mod server;
pub mod task_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
pub use task_routes::{import_csv, task_routes, SharedTaskState, TaskState};
