use crate::app::AppInfo;
use crate::router::ParamVec;
use http::Method;
use may_minihttp::Request as RawRequest;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-request context handed to every handler.
///
/// Created at request arrival, discarded after the response completes;
/// never reused or pooled. `params` is the writable parameter mapping the
/// dispatcher overwrites with each consulted route's extracted values.
#[derive(Debug, Default)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Request path with the query string stripped, as received on the wire.
    pub path: String,
    /// HTTP headers (lowercase keys).
    pub headers: HashMap<String, String>,
    /// Cookies parsed from the Cookie header.
    pub cookies: HashMap<String, String>,
    /// Parsed query string parameters.
    pub query_params: HashMap<String, String>,
    /// Request body parsed as JSON, if any was sent.
    pub body: Option<serde_json::Value>,
    /// Path parameters bound by the dispatcher for the current route.
    pub params: ParamVec,
    /// Read-only reference to the owning application's metadata.
    pub app: Option<Arc<AppInfo>>,
}

impl Request {
    /// Build a bare request, e.g. for driving the dispatcher directly.
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            ..Self::default()
        }
    }

    /// Get a path parameter by name.
    ///
    /// Last write wins: if duplicate parameter names exist in one pattern,
    /// the later occurrence shadows the earlier one.
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a header by name (case-insensitive per RFC 7230).
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Get a cookie by name.
    #[inline]
    #[must_use]
    pub fn get_cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Get a query parameter by name.
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    /// Replace the bound path parameters; called by the dispatcher as the
    /// chain advances so each handler sees its own route's bindings.
    pub fn set_params(&mut self, params: ParamVec) {
        self.params = params;
    }
}

/// Parse the Cookie header into name/value pairs.
pub fn parse_cookies(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .get("cookie")
        .map(|c| {
            c.split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name = parts.next()?.trim().to_string();
                    let value = parts.next().unwrap_or("").trim().to_string();
                    Some((name, value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse query string parameters from a URL path.
///
/// Extracts everything after the `?` and URL-decodes names and values.
pub fn parse_query_params(path: &str) -> HashMap<String, String> {
    if let Some(pos) = path.find('?') {
        let query_str = &path[pos + 1..];
        url::form_urlencoded::parse(query_str.as_bytes())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    } else {
        HashMap::new()
    }
}

/// Extract a [`Request`] from a raw `may_minihttp` request.
///
/// Pulls out method, path, headers, cookies, query parameters, and - when
/// the body parses as JSON - the body value.
pub fn parse_request(req: RawRequest) -> Request {
    let method = match req.method().parse::<Method>() {
        Ok(m) => m,
        Err(_) => {
            warn!(method = %req.method(), "Unrecognized HTTP method, treating as GET");
            Method::GET
        }
    };
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let cookies = parse_cookies(&headers);
    let query_params = parse_query_params(&raw_path);

    let body = {
        let mut body_str = String::new();
        match req.body().read_to_string(&mut body_str) {
            Ok(size) if size > 0 => serde_json::from_str(&body_str).ok(),
            _ => None,
        }
    };

    debug!(
        method = %method,
        path = %path,
        headers = headers.len(),
        query_params = query_params.len(),
        has_body = body.is_some(),
        "HTTP request parsed"
    );

    Request {
        method,
        path,
        headers,
        cookies,
        query_params,
        body,
        params: ParamVec::new(),
        app: None,
    }
}
