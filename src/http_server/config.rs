//! Listener settings for the task service
//!
//! These fields sit at the top level of `taskd.json` next to the store
//! paths; anything left out falls back to a loopback listener on 3333 that
//! accepts cross-origin requests from anywhere.

use std::io;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Interface the task API listens on
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins browsers may call the task API from. An empty list lets any
    /// origin in; entries that are not valid header values are ignored.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3333
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Loopback listener on `port`
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// `host:port` as written in the config
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parse `host:port` into an address the listener can bind
    pub fn bind_addr(&self) -> io::Result<SocketAddr> {
        let addr = self.socket_addr();
        addr.parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", addr, e),
            )
        })
    }

    /// CORS policy for the task routes. Any method and header is allowed;
    /// only the origin set is configurable.
    pub fn cors_layer(&self) -> CorsLayer {
        let origins = if self.cors_origins.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(
                self.cors_origins
                    .iter()
                    .filter_map(|origin| origin.parse().ok()),
            )
        };

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
