//! # Routing Errors

use axum::http::Method;
use thiserror::Error;

/// Result type for route registration
pub type RouteResult<T> = Result<T, RouteError>;

/// Errors raised while compiling a path template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("template must start with '/': {0}")]
    NotAbsolute(String),

    #[error("empty segment in template: {0}")]
    EmptySegment(String),

    #[error("invalid parameter name '{name}' in template {template}")]
    InvalidParamName { template: String, name: String },

    #[error("parameter '{name}' appears twice in template {template}")]
    DuplicateParam { template: String, name: String },

    #[error("failed to compile template {template}: {reason}")]
    Compile { template: String, reason: String },
}

/// Errors raised while dispatching a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No route accepts this method and path
    #[error("no route for {method} {path}")]
    RouteNotFound { method: Method, path: String },

    /// Declared JSON body did not parse
    #[error("request body is not valid JSON: {0}")]
    InvalidBody(String),
}
