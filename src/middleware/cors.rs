use crate::dispatcher::Handler;
use http::Method;
use std::sync::Arc;

/// CORS (Cross-Origin Resource Sharing) policy.
///
/// Configurable with allowed origins, headers, and methods.
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allowed_methods: Vec<Method>,
}

/// Permissive defaults suitable for development and testing; production
/// deployments should restrict `allowed_origins`.
impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".into()],
            allowed_headers: vec!["Content-Type".into(), "Authorization".into()],
            allowed_methods: vec![
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ],
        }
    }
}

impl CorsConfig {
    /// Restrict to the given origins, keeping default headers and methods.
    #[must_use]
    pub fn for_origins(origins: Vec<String>) -> Self {
        Self {
            allowed_origins: origins,
            ..Self::default()
        }
    }
}

/// Build a CORS middleware handler.
///
/// Preflight `OPTIONS` requests are answered with 204 and CORS headers,
/// completing the response; every other request gets the headers and the
/// chain continues.
#[must_use]
pub fn cors(config: CorsConfig) -> Handler {
    let origins = config.allowed_origins.join(", ");
    let headers = config.allowed_headers.join(", ");
    let methods = config
        .allowed_methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    Arc::new(move |req, res, next| {
        res.set_header("Access-Control-Allow-Origin", &origins)
            .set_header("Access-Control-Allow-Headers", &headers)
            .set_header("Access-Control-Allow-Methods", &methods);

        if req.method == Method::OPTIONS {
            res.status(204).end();
        } else {
            next.run(req, res);
        }
    })
}
