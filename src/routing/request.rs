//! Request view handed to route handlers

use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method, Uri};
use serde_json::Value;

use super::errors::DispatchError;
use super::pattern::PathParams;

/// A raw request as received from the HTTP layer
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IncomingRequest {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Attach a JSON body and the matching content type
    pub fn with_json(mut self, body: &Value) -> Self {
        self.headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        self.body = Bytes::from(body.to_string());
        self
    }
}

/// A matched request: path params, query params and the parsed JSON body
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub method: Method,
    pub path: String,
    pub params: PathParams,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    /// Present only for non-empty bodies sent as `application/json`
    pub body: Option<Value>,
}

impl RouteRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// String field of the JSON body, if the body is an object holding one
    pub fn body_str(&self, field: &str) -> Option<&str> {
        self.body.as_ref()?.get(field)?.as_str()
    }
}

/// Whether the headers declare a JSON body (`application/json`, any parameters)
pub fn is_json_content(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Parse the body when it is declared as JSON and non-empty
pub fn parse_json_body(headers: &HeaderMap, body: &Bytes) -> Result<Option<Value>, DispatchError> {
    if body.is_empty() || !is_json_content(headers) {
        return Ok(None);
    }

    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| DispatchError::InvalidBody(e.to_string()))
}
