use crate::router::RouteEntry;
use may_minihttp::Response as RawResponse;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

/// Content type inferred from a file extension, for [`Response::send_file`].
fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
        .as_str()
    {
        "html" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "txt" => "text/plain",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

/// Buffered response under construction.
///
/// Handlers set status and headers, write a body, and seal the response
/// with one of the terminal helpers (`json`, `send`, `end`, ...). Once
/// sealed, further writes are ignored - sending a response or advancing the
/// chain to exhaustion are the only two ways a request resolves, and at
/// most one response is ever sent per request.
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    ended: bool,
    route: Option<Arc<RouteEntry>>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Vec::new(),
            ended: false,
            route: None,
        }
    }

    /// Set the response status.
    pub fn status(&mut self, status: u16) -> &mut Self {
        if self.sealed("status") {
            return self;
        }
        self.status = status;
        self
    }

    /// Set (or replace, case-insensitively) a header.
    pub fn set_header(&mut self, name: &str, value: &str) -> &mut Self {
        if self.sealed("set_header") {
            return self;
        }
        self.headers
            .retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Get a header previously set on this response.
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Append body bytes without sealing the response.
    pub fn write(&mut self, bytes: &[u8]) -> &mut Self {
        if self.sealed("write") {
            return self;
        }
        self.body.extend_from_slice(bytes);
        self
    }

    /// Seal the response. Terminal: every write after this is ignored.
    pub fn end(&mut self) {
        self.ended = true;
    }

    /// Write a JSON body and seal the response.
    pub fn json(&mut self, body: Value) {
        if self.sealed("json") {
            return;
        }
        if self.get_header("Content-Type").is_none() {
            self.set_header("Content-Type", "application/json");
        }
        self.body = body.to_string().into_bytes();
        self.end();
    }

    /// Write a text body and seal the response.
    pub fn send(&mut self, body: &str) {
        if self.sealed("send") {
            return;
        }
        if self.get_header("Content-Type").is_none() {
            self.set_header("Content-Type", "text/plain");
        }
        self.body = body.as_bytes().to_vec();
        self.end();
    }

    /// Serve a file from disk and seal the response, inferring the content
    /// type from the extension.
    ///
    /// # Errors
    ///
    /// Returns the I/O error unchanged if the file cannot be read; the
    /// response is left untouched so the handler can route the failure to
    /// the fallback.
    pub fn send_file<P: AsRef<Path>>(&mut self, path: P) -> io::Result<()> {
        if self.sealed("send_file") {
            return Ok(());
        }
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        if self.get_header("Content-Type").is_none() {
            let ct = content_type_for(path);
            self.set_header("Content-Type", ct);
        }
        self.body = bytes;
        self.end();
        Ok(())
    }

    /// Whether the response has been sealed.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// The route entry currently being dispatched, recorded by the
    /// dispatcher for introspective consumers.
    #[must_use]
    pub fn route(&self) -> Option<&Arc<RouteEntry>> {
        self.route.as_ref()
    }

    pub fn set_route(&mut self, route: Arc<RouteEntry>) {
        self.route = Some(route);
    }

    fn sealed(&self, op: &str) -> bool {
        if self.ended {
            debug!(op = op, "Write after end ignored");
        }
        self.ended
    }
}

/// Serialize an accumulated [`Response`] into the raw transport response.
pub fn write_response(raw: &mut RawResponse, res: &Response) {
    raw.status_code(res.status as usize, status_reason(res.status));
    for (name, value) in &res.headers {
        let header = format!("{name}: {value}").into_boxed_str();
        raw.header(Box::leak(header));
    }
    raw.body_vec(res.body.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
    }

    #[test]
    fn test_writes_after_end_are_ignored() {
        let mut res = Response::new();
        res.status(200).send("first");
        res.status(500);
        res.send("second");
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body_bytes(), b"first");
    }

    #[test]
    fn test_json_sets_content_type_and_seals() {
        let mut res = Response::new();
        res.json(json!({ "ok": true }));
        assert!(res.is_ended());
        assert_eq!(res.get_header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_header_replacement_is_case_insensitive() {
        let mut res = Response::new();
        res.set_header("content-type", "text/plain");
        res.set_header("Content-Type", "text/html");
        assert_eq!(res.get_header("CONTENT-TYPE"), Some("text/html"));
    }
}
