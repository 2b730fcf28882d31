//! # HTTP Server
//!
//! axum owns the socket; every request falls through to a single handler
//! that hands it to the task route table.

use std::io;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;

use super::config::HttpServerConfig;
use super::errors::ApiError;
use super::task_routes::{task_routes, SharedTaskState};
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::routing::{DispatchError, IncomingRequest, RouteResult, Router};

/// State handed to the fallback handler
#[derive(Clone)]
struct ServerState {
    routes: Arc<Router<SharedTaskState>>,
    tasks: SharedTaskState,
}

/// HTTP server for the task service
pub struct HttpServer {
    config: HttpServerConfig,
    router: axum::Router,
}

impl HttpServer {
    /// Build the server. Fails only if a route template is malformed.
    pub fn new(config: HttpServerConfig, tasks: SharedTaskState) -> RouteResult<Self> {
        let routes = Arc::new(task_routes()?);
        let router = Self::build_router(&config, ServerState { routes, tasks });
        Ok(Self { config, router })
    }

    fn build_router(config: &HttpServerConfig, state: ServerState) -> axum::Router {
        axum::Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(config.cors_layer())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> axum::Router {
        self.router
    }

    /// Bind and serve until Ctrl+C
    pub async fn start(self) -> io::Result<()> {
        let addr = self.config.bind_addr()?;

        let listener = TcpListener::bind(addr).await?;
        log_event_with_fields(Event::Serving, &[("addr", &addr.to_string())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        log_event(Event::ShutdownStart);
    }
}

async fn dispatch(
    State(server): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = IncomingRequest {
        method,
        uri,
        headers,
        body,
    };

    match server.routes.dispatch(server.tasks.clone(), request).await {
        Ok(response) => response,
        Err(err) => {
            if let DispatchError::RouteNotFound { method, path } = &err {
                log_event_with_fields(
                    Event::RouteNotFound,
                    &[("method", method.as_str()), ("path", path)],
                );
            }
            ApiError::from(err).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_import::CsvSource;
    use crate::http_server::task_routes::TaskState;
    use crate::store::{CorruptPolicy, TaskStore};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_server_creation() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::open(dir.path().join("db.json"), CorruptPolicy::Fail)
            .await
            .unwrap();
        let tasks = Arc::new(TaskState::new(
            Arc::new(store),
            CsvSource::new(dir.path().join("data.csv")),
        ));

        let server = HttpServer::new(HttpServerConfig::with_port(8080), tasks).unwrap();
        assert_eq!(server.socket_addr(), "127.0.0.1:8080");
        let _router = server.router();
    }
}
