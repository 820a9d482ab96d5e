//! # Server Module
//!
//! The transport boundary: request/response wrappers, the
//! `may_minihttp` service adapter, and the HTTP server lifecycle. The
//! dispatcher depends only on the [`Request`]/[`Response`] capability
//! surface, never on the raw transport types.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_cookies, parse_query_params, parse_request, Request};
pub use response::{write_response, Response};
pub use service::AppService;
