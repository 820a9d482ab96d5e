//! Application façade: registration API, error-fallback setter, and the
//! listen/shutdown lifecycle.
//!
//! `App` collects route registrations into the table, then `listen` (or
//! `build`, for embedding) freezes the table into a [`Dispatcher`] and
//! starts serving. Registration is a setup-time activity; once the
//! dispatcher is built the table is immutable.

use crate::dispatcher::{Dispatcher, ErrorFallback, Handler};
use crate::docs;
use crate::middleware::{cors, logger, CorsConfig};
use crate::router::{HandlerKind, MethodFilter, PatternError, RouteEntry, RouteTable};
use crate::server::{AppService, HttpServer, ServerHandle};
use http::Method;
use std::io;
use std::net::ToSocketAddrs;
use std::sync::Arc;
use tracing::info;

/// Read-only application metadata, shared with every request for handler
/// convenience and surfaced in the route catalog.
#[derive(Debug, Clone)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub host: String,
}

/// Application configuration.
///
/// `allowed_origins` auto-registers the CORS middleware first;
/// `log_requests` auto-registers the logger next. Both are ordinary
/// catch-all entries, so they run before everything registered afterwards.
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub description: String,
    pub host: String,
    pub allowed_origins: Option<Vec<String>>,
    pub log_requests: bool,
    /// Whether `listen` appends the route catalog (`/docs`, `/docs.json`).
    pub docs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Viaduct App".to_string(),
            version: "1.0.0".to_string(),
            description: String::new(),
            host: "localhost:8000".to_string(),
            allowed_origins: None,
            log_requests: false,
            docs: true,
        }
    }
}

/// Registration façade over a route table plus the server lifecycle.
pub struct App {
    table: RouteTable,
    info: Arc<AppInfo>,
    docs: bool,
    fallback: Option<ErrorFallback>,
}

impl App {
    /// Create an application, auto-registering the configured cross-cutting
    /// middlewares.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if a built-in registration fails (the
    /// built-in patterns are static, so this does not happen in practice).
    pub fn new(config: AppConfig) -> Result<Self, PatternError> {
        let info = Arc::new(AppInfo {
            name: config.name,
            version: config.version,
            description: config.description,
            host: config.host,
        });
        let mut app = Self {
            table: RouteTable::new(),
            info,
            docs: config.docs,
            fallback: None,
        };
        if let Some(origins) = config.allowed_origins {
            app.middleware(cors(CorsConfig::for_origins(origins)))?;
        }
        if config.log_requests {
            app.middleware(logger())?;
        }
        Ok(app)
    }

    #[must_use]
    pub fn info(&self) -> &Arc<AppInfo> {
        &self.info
    }

    /// Append an entry to the route table. Duplicates are allowed; order of
    /// registration is the only dispatch tie-break.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the pattern is malformed.
    pub fn register(
        &mut self,
        method: MethodFilter,
        pattern: &str,
        kind: HandlerKind,
        handler: Handler,
    ) -> Result<&mut Self, PatternError> {
        self.table.register(method, pattern, kind, handler)?;
        Ok(self)
    }

    /// Register a GET endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the pattern is malformed.
    pub fn get(&mut self, pattern: &str, handler: Handler) -> Result<&mut Self, PatternError> {
        self.register(
            MethodFilter::Only(Method::GET),
            pattern,
            HandlerKind::Endpoint,
            handler,
        )
    }

    /// Register a POST endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the pattern is malformed.
    pub fn post(&mut self, pattern: &str, handler: Handler) -> Result<&mut Self, PatternError> {
        self.register(
            MethodFilter::Only(Method::POST),
            pattern,
            HandlerKind::Endpoint,
            handler,
        )
    }

    /// Register a PUT endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the pattern is malformed.
    pub fn put(&mut self, pattern: &str, handler: Handler) -> Result<&mut Self, PatternError> {
        self.register(
            MethodFilter::Only(Method::PUT),
            pattern,
            HandlerKind::Endpoint,
            handler,
        )
    }

    /// Register a DELETE endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the pattern is malformed.
    pub fn delete(&mut self, pattern: &str, handler: Handler) -> Result<&mut Self, PatternError> {
        self.register(
            MethodFilter::Only(Method::DELETE),
            pattern,
            HandlerKind::Endpoint,
            handler,
        )
    }

    /// Register a PATCH endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the pattern is malformed.
    pub fn patch(&mut self, pattern: &str, handler: Handler) -> Result<&mut Self, PatternError> {
        self.register(
            MethodFilter::Only(Method::PATCH),
            pattern,
            HandlerKind::Endpoint,
            handler,
        )
    }

    /// Register an any-verb endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the pattern is malformed.
    pub fn all(&mut self, pattern: &str, handler: Handler) -> Result<&mut Self, PatternError> {
        self.register(MethodFilter::Any, pattern, HandlerKind::Endpoint, handler)
    }

    /// Register a catch-all middleware (any verb, every path).
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if registration fails.
    pub fn middleware(&mut self, handler: Handler) -> Result<&mut Self, PatternError> {
        self.register(MethodFilter::Any, "/(.*)", HandlerKind::Middleware, handler)
    }

    /// Register a path-scoped middleware (any verb).
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the pattern is malformed.
    pub fn mount(&mut self, pattern: &str, handler: Handler) -> Result<&mut Self, PatternError> {
        self.register(MethodFilter::Any, pattern, HandlerKind::Middleware, handler)
    }

    /// Install a custom error fallback, replacing the default.
    pub fn error(&mut self, fallback: ErrorFallback) -> &mut Self {
        self.fallback = Some(fallback);
        self
    }

    /// Ordered read-only view of everything registered so far.
    #[must_use]
    pub fn routes(&self) -> &[Arc<RouteEntry>] {
        self.table.entries()
    }

    /// Freeze the table into a dispatcher, appending the route catalog if
    /// configured. For embedding in a custom transport; `listen` calls this
    /// internally.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the catalog registration fails.
    pub fn build(mut self) -> Result<Dispatcher, PatternError> {
        if self.docs {
            docs::register(&mut self.table, &self.info)?;
        }
        let dispatcher = Dispatcher::new(self.table);
        if let Some(fallback) = self.fallback {
            dispatcher.set_error_fallback(fallback);
        }
        Ok(dispatcher)
    }

    /// Build the dispatcher and start serving on `addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dispatcher cannot be built or the address
    /// cannot be bound.
    pub fn listen<A: ToSocketAddrs>(self, addr: A) -> io::Result<AppHandle> {
        let info = Arc::clone(&self.info);
        let dispatcher = Arc::new(
            self.build()
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?,
        );
        let service = AppService::new(Arc::clone(&dispatcher), Arc::clone(&info));
        let server = HttpServer(service).start(addr)?;
        info!(name = %info.name, host = %info.host, "Server started");
        Ok(AppHandle { server, dispatcher })
    }
}

/// Handle to a running application.
///
/// Exposes the server lifecycle plus the live dispatcher, whose error
/// fallback stays replaceable while serving.
pub struct AppHandle {
    server: ServerHandle,
    dispatcher: Arc<Dispatcher>,
}

impl AppHandle {
    /// Wait for the server to accept connections.
    ///
    /// # Errors
    ///
    /// Returns `TimedOut` if the server does not become ready.
    pub fn wait_ready(&self) -> io::Result<()> {
        self.server.wait_ready()
    }

    /// Stop the server gracefully.
    pub fn stop(self) {
        self.server.stop();
    }

    /// Block until the server finishes.
    ///
    /// # Errors
    ///
    /// Returns an error if the server coroutine panicked.
    pub fn join(self) -> std::thread::Result<()> {
        self.server.join()
    }

    /// The live dispatcher backing this server.
    #[must_use]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}
