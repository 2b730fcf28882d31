//! # Routing
//!
//! Declarative `:name` path templates compiled into matchers, and a
//! dispatcher that hands each request to the first matching route with its
//! path params, query params and JSON body already extracted.

pub mod errors;
pub mod pattern;
pub mod query;
pub mod request;
pub mod router;

pub use errors::{DispatchError, RouteError, RouteResult};
pub use pattern::{PathParams, PathPattern};
pub use query::parse_query;
pub use request::{IncomingRequest, RouteRequest};
pub use router::{BoxedHandler, Route, Router};
