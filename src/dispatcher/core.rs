//! Dispatcher core - the per-request match-and-chain hot path.
//!
//! For each request the dispatcher computes the ordered candidate list once,
//! then drives the chain through the [`Next`] continuation. Exactly one of
//! "a handler completed the response" or "the error fallback ran" happens
//! per request, including when handler code panics.

use crate::router::{ParamVec, RouteEntry, RouteTable};
use crate::server::{Request, Response};
use arc_swap::ArcSwap;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// A registered handler function.
///
/// Handlers receive the request, the response, and the continuation. A
/// handler resolves the request by completing the response (it need not
/// touch `next`), continues the chain with [`Next::run`], or aborts to the
/// error fallback with [`Next::fail`].
pub type Handler = Arc<dyn Fn(&mut Request, &mut Response, Next<'_>) + Send + Sync>;

/// The single error-recovery function.
///
/// Invoked with `None` when the candidate list is exhausted without the
/// response being completed, or with `Some(err)` when a handler reported a
/// failure. It is the last line of defense and is assumed not to panic.
pub type ErrorFallback =
    Arc<dyn Fn(Option<anyhow::Error>, &mut Request, &mut Response) + Send + Sync>;

type Candidate = (Arc<RouteEntry>, ParamVec);

/// Continuation handed to each matched handler.
///
/// Owns the not-yet-visited tail of the candidate list, consumed
/// destructively from the front: no entry can run twice for one request.
/// `Next` is consumed by value, so a handler can advance the chain at most
/// once and cannot call it again after completing the response.
pub struct Next<'d> {
    pending: VecDeque<Candidate>,
    fallback: &'d ArcSwap<ErrorFallback>,
}

impl<'d> Next<'d> {
    /// Advance to the next matched candidate with no error.
    ///
    /// If no candidate remains, the error fallback is invoked with no
    /// explicit error (the "not found" shape). Because handlers run on
    /// coroutines, the call returns once the rest of the chain has resolved,
    /// so a middleware may inspect the response afterwards.
    pub fn run(self, req: &mut Request, res: &mut Response) {
        self.advance(None, req, res);
    }

    /// Abort the chain: skip every remaining candidate and invoke the error
    /// fallback with `err`. This is the only early-abort path other than
    /// completing the response.
    pub fn fail(self, err: anyhow::Error, req: &mut Request, res: &mut Response) {
        self.advance(Some(err), req, res);
    }

    fn advance(mut self, err: Option<anyhow::Error>, req: &mut Request, res: &mut Response) {
        if let Some(err) = err {
            debug!(remaining = self.pending.len(), "Handler reported error, aborting chain");
            invoke_fallback(self.fallback, Some(err), req, res);
            return;
        }

        let Some((entry, params)) = self.pending.pop_front() else {
            debug!("Candidate list exhausted, invoking fallback");
            invoke_fallback(self.fallback, None, req, res);
            return;
        };

        // Later-matched params replace earlier ones: each handler sees the
        // bindings specific to its own route.
        req.set_params(params);
        res.set_route(Arc::clone(&entry));

        let handler = Arc::clone(&entry.handler);
        let next = Next {
            pending: self.pending,
            fallback: self.fallback,
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| handler(req, res, next)));
        if let Err(panic) = outcome {
            let message = panic_message(&panic);
            error!(
                pattern = %entry.pattern.as_str(),
                panic_message = %message,
                "Handler panicked"
            );
            // An inner chain step may already have resolved the request
            // before the panic surfaced; the fallback fires only if not.
            if !res.is_ended() {
                invoke_fallback(
                    self.fallback,
                    Some(anyhow::anyhow!("handler panicked: {message}")),
                    req,
                    res,
                );
            }
        }
    }
}

fn invoke_fallback(
    slot: &ArcSwap<ErrorFallback>,
    err: Option<anyhow::Error>,
    req: &mut Request,
    res: &mut Response,
) {
    // Read fresh at invocation time so a late replacement takes effect even
    // for an in-flight request.
    let fallback = slot.load_full();
    (**fallback)(err, req, res);
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Owns the per-request lifecycle from arrival to a single resolved
/// response.
///
/// The route table is immutable once the dispatcher is built; the fallback
/// slot is the only runtime-mutable shared state and is read lock-free at
/// invocation time.
pub struct Dispatcher {
    table: RouteTable,
    fallback: ArcSwap<ErrorFallback>,
}

impl Dispatcher {
    /// Build a dispatcher over a finished route table, with the default
    /// fallback installed.
    #[must_use]
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            fallback: ArcSwap::from_pointee(default_fallback()),
        }
    }

    /// Replace the error fallback.
    ///
    /// Takes effect immediately for subsequent fallback invocations,
    /// including an in-flight request whose fallback has not yet fired.
    pub fn set_error_fallback(&self, fallback: ErrorFallback) {
        self.fallback.store(Arc::new(fallback));
    }

    /// Ordered read-only view of the registered routes.
    #[must_use]
    pub fn routes(&self) -> &[Arc<RouteEntry>] {
        self.table.entries()
    }

    /// Dispatch one request; returns once the response is resolved.
    ///
    /// Computes the candidate list (every matching entry, registration
    /// order), then seeds the chain with one unconditional advance. If a
    /// handler neither completes the response nor calls the continuation,
    /// the chain unwinds unresolved; that is the handler author's contract
    /// to keep, and it is logged here.
    pub fn handle(&self, req: &mut Request, res: &mut Response) {
        let pending: VecDeque<Candidate> = self
            .table
            .candidates(&req.method, &req.path)
            .into_iter()
            .collect();

        let next = Next {
            pending,
            fallback: &self.fallback,
        };
        next.run(req, res);

        if !res.is_ended() {
            warn!(
                method = %req.method,
                path = %req.path,
                "Chain unwound without completing the response"
            );
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.table.len())
            .finish_non_exhaustive()
    }
}

/// Default fallback: fixed client-error status with a generic diagnostic
/// body, echoing the error for diagnostics.
fn default_fallback() -> ErrorFallback {
    Arc::new(|err, _req, res| {
        let detail = err.as_ref().map(std::string::ToString::to_string);
        res.status(400)
            .json(serde_json::json!({ "error": detail, "message": "Something went wrong" }));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::{HandlerKind, MethodFilter};
    use http::Method;

    fn dispatcher_with(entries: Vec<(MethodFilter, &str, Handler)>) -> Dispatcher {
        let mut table = RouteTable::new();
        for (method, pattern, handler) in entries {
            table
                .register(method, pattern, HandlerKind::Endpoint, handler)
                .unwrap();
        }
        Dispatcher::new(table)
    }

    #[test]
    fn test_panic_routed_to_fallback() {
        let dispatcher = dispatcher_with(vec![(
            MethodFilter::Any,
            "/boom",
            Arc::new(|_req: &mut Request, _res: &mut Response, _next: Next<'_>| {
                panic!("kaboom");
            }) as Handler,
        )]);

        let mut req = Request::new(Method::GET, "/boom");
        let mut res = Response::new();
        dispatcher.handle(&mut req, &mut res);
        assert_eq!(res.status_code(), 400);
        assert!(res.is_ended());
        let body = String::from_utf8(res.body_bytes().to_vec()).unwrap();
        assert!(body.contains("kaboom"));
    }

    #[test]
    fn test_fallback_replacement_takes_effect() {
        let dispatcher = dispatcher_with(vec![]);
        dispatcher.set_error_fallback(Arc::new(|_err, _req, res| {
            res.status(404).json(serde_json::json!({ "error": "nope" }));
        }));

        let mut req = Request::new(Method::GET, "/missing");
        let mut res = Response::new();
        dispatcher.handle(&mut req, &mut res);
        assert_eq!(res.status_code(), 404);
    }

    #[test]
    fn test_current_route_recorded_on_response() {
        let dispatcher = dispatcher_with(vec![(
            MethodFilter::Only(Method::GET),
            "/pets/:id",
            Arc::new(|_req: &mut Request, res: &mut Response, _next: Next<'_>| {
                res.status(200).send("ok");
            }) as Handler,
        )]);

        let mut req = Request::new(Method::GET, "/pets/9");
        let mut res = Response::new();
        dispatcher.handle(&mut req, &mut res);
        let route = res.route().unwrap();
        assert_eq!(route.pattern.as_str(), "/pets/:id");
    }
}
