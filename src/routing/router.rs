//! Method + path template dispatch
//!
//! Routes are tried in registration order and the first one whose method
//! matches exactly and whose template accepts the path wins. The route table
//! is built once and never changes afterwards.

use std::future::Future;
use std::sync::Arc;

use axum::http::Method;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use super::errors::{DispatchError, RouteResult};
use super::pattern::{PathParams, PathPattern};
use super::query::parse_query;
use super::request::{parse_json_body, IncomingRequest, RouteRequest};

/// Type-erased async route handler
pub type BoxedHandler<S> =
    Arc<dyn Fn(S, RouteRequest) -> BoxFuture<'static, Response> + Send + Sync>;

/// A registered (method, template, handler) triple
pub struct Route<S> {
    method: Method,
    pattern: PathPattern,
    handler: BoxedHandler<S>,
}

impl<S> Route<S> {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn template(&self) -> &str {
        self.pattern.template()
    }
}

/// Ordered route table
pub struct Router<S> {
    routes: Vec<Route<S>>,
}

impl<S> Default for Router<S> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<S: Clone + Send + Sync + 'static> Router<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. Fails if the template does not compile.
    pub fn route<F, Fut, T>(
        mut self,
        method: Method,
        template: &str,
        handler: F,
    ) -> RouteResult<Self>
    where
        F: Fn(S, RouteRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: IntoResponse + 'static,
    {
        let pattern = PathPattern::compile(template)?;
        let handler: BoxedHandler<S> = Arc::new(move |state: S, request: RouteRequest| {
            handler(state, request)
                .map(IntoResponse::into_response)
                .boxed()
        });

        self.routes.push(Route {
            method,
            pattern,
            handler,
        });
        Ok(self)
    }

    pub fn routes(&self) -> &[Route<S>] {
        &self.routes
    }

    /// Find the first route accepting `method` and `path`
    pub fn resolve(
        &self,
        method: &Method,
        path: &str,
    ) -> Result<(&Route<S>, PathParams), DispatchError> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| route.pattern.match_path(path).map(|params| (route, params)))
            .ok_or_else(|| DispatchError::RouteNotFound {
                method: method.clone(),
                path: path.to_string(),
            })
    }

    /// Match `request` and run its handler.
    ///
    /// `RouteNotFound` is returned to the caller, which decides how to answer.
    pub async fn dispatch(
        &self,
        state: S,
        request: IncomingRequest,
    ) -> Result<Response, DispatchError> {
        let path = request.uri.path();
        let (route, params) = self.resolve(&request.method, path)?;

        let body = parse_json_body(&request.headers, &request.body)?;
        let route_request = RouteRequest {
            method: request.method.clone(),
            path: path.to_string(),
            params,
            query: parse_query(request.uri.query()),
            headers: request.headers.clone(),
            body,
        };

        Ok((route.handler)(state, route_request).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::{StatusCode, Uri};
    use serde_json::json;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn echo_router() -> Router<&'static str> {
        Router::new()
            .route(Method::GET, "/tasks", |_, _| async { "list".into_response() })
            .unwrap()
            .route(Method::GET, "/tasks/:id", |_, req: RouteRequest| async move {
                format!("get {}", req.param("id").unwrap_or("")).into_response()
            })
            .unwrap()
            .route(Method::PATCH, "/tasks/:id/complete", |state, req: RouteRequest| async move {
                format!(
                    "{} {} {}",
                    state,
                    req.param("id").unwrap_or(""),
                    req.query_value("completed_at").unwrap_or("-")
                )
                .into_response()
            })
            .unwrap()
            .route(Method::POST, "/task", |_, req: RouteRequest| async move {
                req.body_str("title").unwrap_or("none").to_string().into_response()
            })
            .unwrap()
    }

    fn request(method: Method, uri: &str) -> IncomingRequest {
        IncomingRequest::new(method, uri.parse::<Uri>().unwrap())
    }

    #[tokio::test]
    async fn test_dispatch_extracts_params_and_query() {
        let router = echo_router();

        let response = router
            .dispatch("state", request(Method::PATCH, "/tasks/42/complete?completed_at=complete"))
            .await
            .unwrap();

        assert_eq!(body_text(response).await, "state 42 complete");
    }

    #[tokio::test]
    async fn test_dispatch_prefers_registration_order() {
        let router = echo_router();

        let list = router.dispatch("s", request(Method::GET, "/tasks")).await.unwrap();
        assert_eq!(body_text(list).await, "list");

        let one = router.dispatch("s", request(Method::GET, "/tasks/7")).await.unwrap();
        assert_eq!(body_text(one).await, "get 7");
    }

    #[tokio::test]
    async fn test_dispatch_parses_json_body() {
        let router = echo_router();
        let req = request(Method::POST, "/task").with_json(&json!({"title": "milk"}));

        let response = router.dispatch("s", req).await.unwrap();
        assert_eq!(body_text(response).await, "milk");
    }

    #[tokio::test]
    async fn test_dispatch_invalid_json_body() {
        let router = echo_router();
        let mut req = request(Method::POST, "/task").with_json(&json!({}));
        req.body = axum::body::Bytes::from_static(b"{oops");

        let result = router.dispatch("s", req).await;
        assert!(matches!(result, Err(DispatchError::InvalidBody(_))));
    }

    #[tokio::test]
    async fn test_route_not_found() {
        let router = echo_router();

        let wrong_method = router.dispatch("s", request(Method::DELETE, "/tasks")).await;
        assert!(matches!(wrong_method, Err(DispatchError::RouteNotFound { .. })));

        let wrong_path = router.dispatch("s", request(Method::GET, "/nothing")).await;
        assert!(matches!(wrong_path, Err(DispatchError::RouteNotFound { .. })));
    }

    #[test]
    fn test_method_match_is_case_sensitive() {
        let router = echo_router();
        let lowercase = Method::from_bytes(b"get").unwrap();

        assert!(router.resolve(&lowercase, "/tasks").is_err());
        assert!(router.resolve(&Method::GET, "/tasks").is_ok());
    }

    #[test]
    fn test_invalid_template_rejected_at_registration() {
        let result = Router::<()>::new().route(Method::GET, "tasks", |_, _| async {
            StatusCode::OK.into_response()
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_handlers_may_return_any_response_type() {
        let router = Router::<()>::new()
            .route(Method::POST, "/made", |_, _| async {
                (StatusCode::CREATED, "made".to_string())
            })
            .unwrap()
            .route(Method::GET, "/maybe/:id", |_, req: RouteRequest| async move {
                match req.param("id") {
                    Some("ok") => Ok("found".to_string()),
                    _ => Err(StatusCode::NOT_FOUND),
                }
            })
            .unwrap();

        let made = router.dispatch((), request(Method::POST, "/made")).await.unwrap();
        assert_eq!(made.status(), StatusCode::CREATED);
        assert_eq!(body_text(made).await, "made");

        let found = router.dispatch((), request(Method::GET, "/maybe/ok")).await.unwrap();
        assert_eq!(body_text(found).await, "found");

        let missing = router.dispatch((), request(Method::GET, "/maybe/no")).await.unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_route_listing() {
        let router = echo_router();
        let listed: Vec<_> = router
            .routes()
            .iter()
            .map(|r| format!("{} {}", r.method(), r.template()))
            .collect();

        assert_eq!(
            listed,
            vec![
                "GET /tasks",
                "GET /tasks/:id",
                "PATCH /tasks/:id/complete",
                "POST /task"
            ]
        );
    }
}
