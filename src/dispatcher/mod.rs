//! # Dispatcher Module
//!
//! The dispatcher owns the per-request lifecycle: it filters the route
//! table into an ordered candidate list, drives sequential handler
//! execution through the [`Next`] continuation, and guarantees every
//! request terminates in exactly one response - either produced by a
//! handler or by the error fallback.
//!
//! ## Request Flow
//!
//! 1. Request arrives; the candidate list is computed once, in
//!    registration order (method predicate + structural path match).
//! 2. The chain is seeded with one unconditional advance.
//! 3. Each visited handler either completes the response, mutates state and
//!    calls [`Next::run`], or aborts with [`Next::fail`].
//! 4. Exhaustion or an error lands in the single fallback slot.
//!
//! ## Continuation Semantics
//!
//! `Next` is consumed by value. That makes two contracts from the handler
//! API structural rather than conventional: a handler cannot advance the
//! chain twice, and cannot advance it after it has already done so. The
//! candidate list is popped destructively from the front, so no entry runs
//! twice for one request.
//!
//! Handlers run on `may` coroutines, so `Next::run` is a plain reentrant
//! call: it returns once the rest of the chain has resolved, which lets
//! wrap-around middleware (logging, timing) observe the final response.
//!
//! ## Error Handling
//!
//! - Exhausted candidates invoke the fallback with no error ("not found").
//! - `Next::fail(err)` skips all remaining candidates and invokes the
//!   fallback with `err`.
//! - Handler panics are caught at the dispatch boundary and routed to the
//!   fallback like an explicit error.
//! - The fallback itself is assumed not to panic; there is no second-level
//!   fallback.

mod core;

pub use core::{Dispatcher, ErrorFallback, Handler, Next};
