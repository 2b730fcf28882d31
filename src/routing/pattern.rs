//! # Path Templates
//!
//! A template like `/tasks/:id/complete` compiles into an anchored regex.
//! Literal segments are escaped, so `/v1.0/files+` matches only itself;
//! each `:name` segment captures one non-empty path segment.

use std::collections::HashMap;

use regex::Regex;

use super::errors::{RouteError, RouteResult};

/// Named values captured from a path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A compiled path template
#[derive(Debug, Clone)]
pub struct PathPattern {
    template: String,
    regex: Regex,
    param_names: Vec<String>,
}

impl PathPattern {
    /// Compile `template`, rejecting malformed or ambiguous parameter names
    pub fn compile(template: &str) -> RouteResult<Self> {
        let Some(rest) = template.strip_prefix('/') else {
            return Err(RouteError::NotAbsolute(template.to_string()));
        };

        let mut source = String::from("^");
        let mut param_names: Vec<String> = Vec::new();

        let segments: Vec<&str> = if rest.is_empty() {
            source.push('/');
            Vec::new()
        } else {
            rest.split('/').collect()
        };

        for segment in segments {
            if segment.is_empty() {
                return Err(RouteError::EmptySegment(template.to_string()));
            }
            source.push('/');

            match segment.strip_prefix(':') {
                Some(name) => {
                    if !is_valid_param_name(name) {
                        return Err(RouteError::InvalidParamName {
                            template: template.to_string(),
                            name: name.to_string(),
                        });
                    }
                    if param_names.iter().any(|n| n == name) {
                        return Err(RouteError::DuplicateParam {
                            template: template.to_string(),
                            name: name.to_string(),
                        });
                    }
                    source.push_str(&format!("(?P<{}>[^/]+)", name));
                    param_names.push(name.to_string());
                }
                None => source.push_str(&regex::escape(segment)),
            }
        }

        source.push('$');

        let regex = Regex::new(&source).map_err(|e| RouteError::Compile {
            template: template.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            template: template.to_string(),
            regex,
            param_names,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Match a literal path (no query string), extracting parameters
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let captures = self.regex.captures(path)?;

        let params = self
            .param_names
            .iter()
            .filter_map(|name| {
                captures
                    .name(name)
                    .map(|m| (name.clone(), m.as_str().to_string()))
            })
            .collect();

        Some(PathParams(params))
    }
}

fn is_valid_param_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
