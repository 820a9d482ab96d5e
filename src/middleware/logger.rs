use crate::dispatcher::Handler;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Build a request-logging middleware handler.
///
/// Runs the continuation inline, then emits one structured event with
/// method, path, status, and latency. Because the continuation returns
/// once the rest of the chain has resolved, the logged status is the final
/// one - including a status written by the error fallback.
#[must_use]
pub fn logger() -> Handler {
    Arc::new(|req, res, next| {
        let start = Instant::now();
        let method = req.method.clone();
        let path = req.path.clone();

        next.run(req, res);

        info!(
            method = %method,
            path = %path,
            status = res.status_code(),
            latency_ms = start.elapsed().as_millis() as u64,
            resolved = res.is_ended(),
            "Request completed"
        );
    })
}
