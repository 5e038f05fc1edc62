//! HTTP middleware stack for the server.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with `request_id` and `user_id` fields)
//! 3. Request ID (add unique ID to each request)
//!
//! Identity is not middleware: handlers take [`Identity`] or [`RequireUser`].

pub mod auth;
pub mod request_id;

pub use auth::{Identity, RequireUser};
pub use request_id::request_id_middleware;
