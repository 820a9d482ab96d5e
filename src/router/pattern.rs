//! Path pattern compilation and matching.
//!
//! Patterns use Express-style syntax: literal segments, named parameters
//! (`:id`) and a trailing catch-all wildcard segment (`(.*)`). A pattern is
//! compiled once into an anchored regex plus an ordered parameter-name list;
//! matching percent-decodes the candidate path before comparison so literal
//! segments containing reserved characters still match.

use regex::Regex;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::sync::Arc;
use thiserror::Error;

/// Maximum number of path parameters before heap allocation.
/// Most routes have ≤4 params; SmallVec keeps the common case on the stack.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the dispatch hot path.
///
/// Param names are `Arc<str>` because they come from the compiled pattern
/// (known at registration time) and `Arc::clone()` is O(1); values are
/// per-request strings extracted from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Error raised when a path pattern fails to compile.
///
/// Compilation happens at registration time, so a malformed pattern is
/// reported immediately instead of silently producing an always-false
/// matcher.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("path pattern `{0}` must start with '/'")]
    MissingLeadingSlash(String),
    #[error("path pattern `{0}` has an empty parameter name")]
    EmptyParamName(String),
    #[error("path pattern `{0}` has an invalid parameter name `{1}` (use [A-Za-z0-9_])")]
    InvalidParamName(String, String),
    #[error("wildcard `(.*)` must be a whole trailing segment in `{0}`")]
    MalformedWildcard(String),
    #[error("failed to compile pattern `{pattern}`: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled path pattern.
///
/// Matching is purely structural (segment count and literal/parameter
/// alignment); the method predicate is evaluated separately by the route
/// table.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    regex: Regex,
    param_names: Vec<Arc<str>>,
    has_wildcard: bool,
}

impl PathPattern {
    /// Compile a pattern string into a reusable matcher.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the pattern is malformed (missing
    /// leading slash, empty or invalid parameter name, or a wildcard that is
    /// not a whole trailing segment).
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(pattern.to_string()));
        }

        let normalized = normalize(pattern);
        if normalized == "/" {
            let regex = Regex::new(r"^/$").map_err(|source| PatternError::Regex {
                pattern: pattern.to_string(),
                source,
            })?;
            return Ok(Self {
                raw: pattern.to_string(),
                regex,
                param_names: Vec::new(),
                has_wildcard: false,
            });
        }

        let segments: Vec<&str> = normalized
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let mut source = String::with_capacity(normalized.len() + 8);
        source.push('^');
        let mut param_names = Vec::new();
        let mut has_wildcard = false;

        for (idx, segment) in segments.iter().enumerate() {
            if *segment == "(.*)" {
                if idx != segments.len() - 1 {
                    return Err(PatternError::MalformedWildcard(pattern.to_string()));
                }
                // Optional rest-of-path: `/static/(.*)` also matches `/static`.
                source.push_str("(?:/(.*))?");
                has_wildcard = true;
            } else if let Some(name) = segment.strip_prefix(':') {
                if name.is_empty() {
                    return Err(PatternError::EmptyParamName(pattern.to_string()));
                }
                if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return Err(PatternError::InvalidParamName(
                        pattern.to_string(),
                        name.to_string(),
                    ));
                }
                source.push_str("/([^/]+)");
                param_names.push(Arc::from(name));
            } else if segment.contains('(') || segment.contains(')') {
                return Err(PatternError::MalformedWildcard(pattern.to_string()));
            } else {
                source.push('/');
                source.push_str(&regex::escape(segment));
            }
        }

        source.push('$');
        let regex = Regex::new(&source).map_err(|source| PatternError::Regex {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            raw: pattern.to_string(),
            regex,
            param_names,
            has_wildcard,
        })
    }

    /// The pattern string as registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Ordered parameter names, as they appear in the pattern.
    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.param_names
    }

    /// Whether the pattern ends in a catch-all wildcard segment.
    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        self.has_wildcard
    }

    /// Match a concrete request path, extracting named parameters.
    ///
    /// The candidate path is percent-decoded before comparison, then
    /// normalized (trailing slash stripped). Returns `None` on no match.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<ParamVec> {
        let decoded: Cow<'_, str> = match urlencoding::decode(path) {
            Ok(d) => d,
            // Invalid percent-escapes fall back to a byte-wise comparison.
            Err(_) => Cow::Borrowed(path),
        };
        let candidate = normalize(&decoded);

        let caps = self.regex.captures(candidate)?;
        let mut params = ParamVec::new();
        for (i, name) in self.param_names.iter().enumerate() {
            if let Some(m) = caps.get(i + 1) {
                params.push((Arc::clone(name), m.as_str().to_string()));
            }
        }
        Some(params)
    }
}

/// Strip a trailing slash so `/users/` and `/users` compare equal; the root
/// path is left alone.
fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}
