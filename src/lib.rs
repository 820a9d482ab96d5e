//! # Viaduct
//!
//! **Viaduct** is a coroutine-powered HTTP request-dispatch engine for Rust:
//! an ordered route table, an Express-style middleware chain with explicit
//! continuation control, and a single replaceable error fallback, served
//! over `may_minihttp`.
//!
//! ## Overview
//!
//! Given an incoming request, Viaduct determines which registered handlers
//! apply, executes them in a deterministic order with explicit continuation
//! control, and guarantees every request terminates in exactly one
//! response - either produced by a handler or by the error fallback.
//!
//! ## Architecture
//!
//! The library is organized into a few key modules:
//!
//! - **[`router`]** - ordered route table and regex-based path matching
//!   with named parameters (`/users/:id`) and catch-all wildcards (`/(.*)`)
//! - **[`dispatcher`]** - the match-and-chain engine: per-request candidate
//!   list, the `Next` continuation, and the error fallback slot
//! - **[`server`]** - request/response wrappers and the HTTP server built
//!   on `may_minihttp`
//! - **[`middleware`]** - built-in CORS and logging middlewares (ordinary
//!   handlers, no special dispatch priority)
//! - **[`docs`]** - self-registering route catalog (`/docs`, `/docs.json`)
//! - **[`app`]** - the registration façade and listen/shutdown lifecycle
//!
//! ## Request Flow
//!
//! 1. The transport parses the raw request into a [`server::Request`].
//! 2. The dispatcher evaluates every route entry in registration order
//!    (method predicate + structural path match, percent-decoded) and
//!    fixes the ordered candidate list.
//! 3. The chain is seeded once; each visited handler completes the
//!    response, mutates state and calls `next.run(..)`, or aborts with
//!    `next.fail(err, ..)`.
//! 4. Chain exhaustion or a reported error invokes the single fallback,
//!    which always resolves the response.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use viaduct::{App, AppConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut app = App::new(AppConfig::default())?;
//!
//! app.middleware(Arc::new(|_req, res, next| {
//!     res.set_header("X-Powered-By", "viaduct");
//!     next.run(_req, res);
//! }))?;
//!
//! app.get("/hello/:name", Arc::new(|req, res, _next| {
//!     let name = req.get_param("name").unwrap_or("world").to_string();
//!     res.status(200).send(&format!("hi {name}"));
//! }))?;
//!
//! let handle = app.listen("127.0.0.1:8000")?;
//! handle.join().ok();
//! # Ok(())
//! # }
//! ```
//!
//! ## Runtime Considerations
//!
//! Viaduct uses the `may` coroutine runtime, not tokio or async-std.
//! Handlers run on coroutines, so `next.run(..)` is a plain reentrant call
//! that returns once the rest of the chain has resolved; a handler may
//! perform blocking-style I/O and the runtime interleaves requests. There
//! is no built-in timeout: a handler that neither completes the response
//! nor calls the continuation leaves the request unresolved, which is the
//! same contract every middleware-chaining system hands its handler
//! authors.

pub mod app;
pub mod dispatcher;
pub mod docs;
pub mod middleware;
pub mod router;
pub mod server;

pub use app::{App, AppConfig, AppHandle, AppInfo};
pub use dispatcher::{Dispatcher, ErrorFallback, Handler, Next};
pub use router::{HandlerKind, MethodFilter, ParamVec, PathPattern, PatternError, RouteEntry, RouteTable};
pub use server::{Request, Response};
