//! # API Errors
//!
//! Every handler failure maps to a status code and a JSON body of the form
//! `{"error": "...", "code": 400}`. Internal failures are logged in full and
//! answered with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::csv_import::CsvError;
use crate::observability::{log_event_at, Event, Severity};
use crate::routing::DispatchError;
use crate::store::StoreError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// No task with this id
    #[error("task not found: {0}")]
    NotFound(String),

    /// No route for this method and path
    #[error("no route for {method} {path}")]
    RouteNotFound { method: String, path: String },

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Detail is for the operator log only
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.public_message(),
            code: err.status_code().as_u16(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<CsvError> for ApiError {
    fn from(err: CsvError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::RouteNotFound { method, path } => ApiError::RouteNotFound {
                method: method.to_string(),
                path,
            },
            DispatchError::InvalidBody(reason) => ApiError::Validation(format!(
                "request body is not valid JSON: {}",
                reason
            )),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            log_event_at(Severity::Error, Event::RequestFailed, &[("error", detail)]);
        }

        let status = self.status_code();
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("1".to_string()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("disk".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = ApiError::Internal("/var/db.json: permission denied".to_string());
        let body = ErrorResponse::from(&err);

        assert_eq!(body.error, "internal server error");
        assert_eq!(body.code, 500);
    }

    #[test]
    fn test_dispatch_errors_map() {
        let not_found = ApiError::from(DispatchError::RouteNotFound {
            method: Method::GET,
            path: "/x".to_string(),
        });
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.public_message(), "no route for GET /x");

        let bad_body = ApiError::from(DispatchError::InvalidBody("eof".to_string()));
        assert_eq!(bad_body.status_code(), StatusCode::BAD_REQUEST);
    }
}
