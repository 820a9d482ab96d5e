//! # Middleware Module
//!
//! Built-in middlewares. These are ordinary handlers - pluggable route
//! entries registered like any other, with no special dispatch priority -
//! that cover the common cross-cutting concerns.

mod cors;
mod logger;

pub use cors::{cors, CorsConfig};
pub use logger::logger;
