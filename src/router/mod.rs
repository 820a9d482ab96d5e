//! # Router Module
//!
//! The router module provides the ordered route table and path matching for
//! Viaduct. Patterns use Express-style syntax (`/users/:id`, `/(.*)`) and
//! are compiled once into regex-based matchers at registration time.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Holding registered route entries in registration order
//! - Compiling path patterns and failing fast on malformed ones
//! - Matching incoming method+path pairs against every entry
//! - Extracting named path parameters from matched routes
//!
//! ## Architecture
//!
//! A two-phase approach:
//!
//! 1. **Compilation**: at registration, a pattern like `/users/:id` is
//!    converted into an anchored regex plus an ordered parameter-name list.
//!
//! 2. **Matching**: per request, every entry is tested in registration
//!    order; the matches form the candidate list the dispatcher consumes.
//!    Candidate paths are percent-decoded before comparison.
//!
//! ## Example
//!
//! ```rust,ignore
//! use viaduct::router::{HandlerKind, MethodFilter, RouteTable};
//!
//! let mut table = RouteTable::new();
//! table.register(MethodFilter::Only(http::Method::GET), "/pets/:id",
//!     HandlerKind::Endpoint, handler)?;
//!
//! let candidates = table.candidates(&http::Method::GET, "/pets/123");
//! assert_eq!(candidates.len(), 1);
//! ```

mod core;
mod pattern;
#[cfg(test)]
mod tests;

pub use core::{HandlerKind, MethodFilter, RouteEntry, RouteTable};
pub use pattern::{ParamVec, PathPattern, PatternError, MAX_INLINE_PARAMS};
