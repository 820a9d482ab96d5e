//! Route table core - ordered registration and per-request candidate
//! selection.

use crate::dispatcher::Handler;
use http::Method;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use super::pattern::{ParamVec, PathPattern, PatternError};

/// Method predicate attached to a route entry.
///
/// `Any` is the "all verbs" wildcard: it matches every request method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodFilter {
    /// Matches any HTTP method.
    Any,
    /// Matches exactly one HTTP method.
    Only(Method),
}

impl MethodFilter {
    /// Whether this filter accepts the given request method.
    #[must_use]
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            MethodFilter::Any => true,
            MethodFilter::Only(m) => m == method,
        }
    }
}

impl From<Method> for MethodFilter {
    fn from(method: Method) -> Self {
        MethodFilter::Only(method)
    }
}

impl fmt::Display for MethodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodFilter::Any => f.write_str("ALL"),
            MethodFilter::Only(m) => write!(f, "{m}"),
        }
    }
}

/// Registration kind of a route entry.
///
/// Endpoints are expected to terminate the response; middlewares are
/// expected to optionally continue. The kind is advisory (surfaced by the
/// route catalog); dispatch treats both identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Endpoint,
    Middleware,
}

impl HandlerKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::Endpoint => "endpoint",
            HandlerKind::Middleware => "middleware",
        }
    }
}

/// A registered (method, pattern, kind, handler) tuple.
///
/// Entries are immutable after registration; their relative registration
/// order is the only tie-break for overlapping matches.
pub struct RouteEntry {
    pub method: MethodFilter,
    pub pattern: PathPattern,
    pub kind: HandlerKind,
    pub handler: Handler,
}

impl RouteEntry {
    /// Evaluate this entry against a request.
    ///
    /// An entry matches iff both the method predicate and the structural
    /// path match succeed. Returns the extracted parameters on match.
    #[must_use]
    pub fn matches(&self, method: &Method, path: &str) -> Option<ParamVec> {
        if !self.method.matches(method) {
            return None;
        }
        self.pattern.match_path(path)
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Ordered, append-only sequence of route entries.
///
/// Registration never mutates or removes prior entries, and duplicate
/// method/path pairs are explicitly allowed; overlaps are resolved by
/// registration order at dispatch time, not at registration time.
#[derive(Default)]
pub struct RouteTable {
    entries: Vec<Arc<RouteEntry>>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, compiling its pattern.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the pattern is malformed; this is the
    /// only failure mode, and it fires at registration, not per request.
    pub fn register(
        &mut self,
        method: MethodFilter,
        pattern: &str,
        kind: HandlerKind,
        handler: Handler,
    ) -> Result<(), PatternError> {
        let pattern = PathPattern::compile(pattern)?;
        info!(
            method = %method,
            pattern = %pattern.as_str(),
            kind = kind.as_str(),
            position = self.entries.len(),
            "Route registered"
        );
        self.entries.push(Arc::new(RouteEntry {
            method,
            pattern,
            kind,
            handler,
        }));
        Ok(())
    }

    /// Ordered read-only view of the registered entries.
    #[must_use]
    pub fn entries(&self) -> &[Arc<RouteEntry>] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate every entry against a request in registration order, keeping
    /// the matches. This is the per-request candidate computation; the
    /// resulting list is fixed before chain execution starts.
    #[must_use]
    pub fn candidates(&self, method: &Method, path: &str) -> Vec<(Arc<RouteEntry>, ParamVec)> {
        let matched: Vec<(Arc<RouteEntry>, ParamVec)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                entry
                    .matches(method, path)
                    .map(|params| (Arc::clone(entry), params))
            })
            .collect();
        debug!(
            method = %method,
            path = %path,
            candidates = matched.len(),
            "Candidate list computed"
        );
        matched
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{} {}", e.method, e.pattern.as_str()))
            .collect();
        f.debug_struct("RouteTable")
            .field("entries", &routes)
            .finish()
    }
}
