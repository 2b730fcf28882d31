//! Query string parsing
//!
//! Flat key -> value map. Repeated keys keep the last value seen.

use std::collections::HashMap;

/// Parse a raw (still percent-encoded) query string
pub fn parse_query(raw: Option<&str>) -> HashMap<String, String> {
    match raw {
        Some(raw) => url::form_urlencoded::parse(raw.as_bytes())
            .into_owned()
            .collect(),
        None => HashMap::new(),
    }
}
