//! Route matching module
//!
//! Patterns are regular expressions matched against the percent-decoded request
//! path with its leading slash removed, evaluated in declaration order.

use percent_encoding::percent_decode_str;
use regex::Regex;

use super::Handler;
use crate::config::ConfigError;

/// Uncompiled route declaration
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub pattern: String,
    pub handler: Handler,
    pub name: Option<&'static str>,
}

impl RouteEntry {
    pub fn new(pattern: &str, handler: Handler) -> Self {
        Self {
            pattern: pattern.to_string(),
            handler,
            name: None,
        }
    }

    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }
}

/// Compiled route
#[derive(Debug)]
pub struct Route {
    pub pattern: Regex,
    pub handler: Handler,
    pub name: Option<&'static str>,
}

/// Ordered, immutable route table
#[derive(Debug)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Compile every pattern once. Any invalid pattern aborts startup.
    pub fn compile(entries: Vec<RouteEntry>) -> Result<Self, ConfigError> {
        let routes = entries
            .into_iter()
            .map(|entry| {
                let pattern = Regex::new(&entry.pattern).map_err(|source| {
                    ConfigError::InvalidPattern {
                        pattern: entry.pattern.clone(),
                        source,
                    }
                })?;
                Ok(Route {
                    pattern,
                    handler: entry.handler,
                    name: entry.name,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self { routes })
    }

    /// Find the first route whose pattern matches `path`.
    ///
    /// A path that does not decode to UTF-8 matches nothing.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        let decoded = percent_decode_str(path).decode_utf8().ok()?;
        let candidate = decoded.strip_prefix('/').unwrap_or(&*decoded);
        self.routes
            .iter()
            .find(|route| route.pattern.is_match(candidate))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
