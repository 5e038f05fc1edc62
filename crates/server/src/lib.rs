//! GlassSpire server library.
//!
//! The HTTP API as a library so the router can be built in tests and the
//! CLI can reuse configuration and repositories.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
