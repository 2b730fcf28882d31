//! Observable events
//!
//! Every lifecycle and store event the service logs is named here, so log
//! consumers can match on a closed set of strings.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & lifecycle
    /// Startup begins
    BootStart,
    /// Configuration loaded
    ConfigLoaded,
    /// Listener bound, ready for requests
    Serving,
    /// Shutdown initiated
    ShutdownStart,

    // Store
    /// Backing file read and parsed
    StoreLoaded,
    /// Backing file absent, store initialized empty
    StoreInitialized,
    /// Backing file unreadable as a table store (FATAL unless reset)
    StoreCorrupt,
    /// Corrupt backing file moved aside, store started empty
    StoreCorruptReset,
    /// Full store written to disk
    StorePersisted,
    /// Persist failed, in-memory mutation rolled back
    StorePersistFailed,

    // Requests
    /// No route matched the request
    RouteNotFound,
    /// Handler failed with an internal error
    RequestFailed,

    // Import
    /// CSV import finished
    ImportComplete,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "TASKD_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::StoreLoaded => "STORE_LOADED",
            Event::StoreInitialized => "STORE_INITIALIZED",
            Event::StoreCorrupt => "STORE_CORRUPT",
            Event::StoreCorruptReset => "STORE_CORRUPT_RESET",
            Event::StorePersisted => "STORE_PERSISTED",
            Event::StorePersistFailed => "STORE_PERSIST_FAILED",
            Event::RouteNotFound => "ROUTE_NOT_FOUND",
            Event::RequestFailed => "REQUEST_FAILED",
            Event::ImportComplete => "IMPORT_COMPLETE",
        }
    }

    /// Whether this event means the process cannot continue
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StoreCorrupt)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
