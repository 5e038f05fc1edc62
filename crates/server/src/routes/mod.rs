//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness
//! GET  /health/ready            - Database ping
//!
//! # Account
//! POST /account                 - Register the profile for the caller's identity
//! GET  /account                 - Current user
//! PUT  /account                 - Update profile
//!
//! # Orders
//! GET  /orders?q=&status=       - Customer: own orders; retailer: all (subscription required)
//! POST /orders                  - Customer: place an order
//! GET  /orders/{id}             - Order with details and participants
//! POST /orders/{id}/advance     - Retailer: move to the next status (subscription required)
//!
//! # Messages
//! GET  /messages/contacts       - Users of the opposite account type
//! GET  /messages/{user_id}      - Conversation; marks received messages read
//! POST /messages/{user_id}      - Send a message
//!
//! # Subscription
//! GET  /subscription            - Plan, fee and effective status
//! PUT  /subscription            - Pay with card details (retailers)
//! ```

pub mod account;
pub mod health;
pub mod messages;
pub mod orders;
pub mod subscription;

use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", get(orders::show))
        .route("/{id}/advance", post(orders::advance))
}

/// Create the message routes router.
pub fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(messages::contacts))
        .route(
            "/{user_id}",
            get(messages::conversation).post(messages::send),
        )
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/account",
            get(account::show)
                .post(account::register)
                .put(account::update),
        )
        .nest("/orders", order_routes())
        .nest("/messages", message_routes())
        .route(
            "/subscription",
            get(subscription::show).put(subscription::pay),
        )
}

/// The full application with health checks, request ids and tracing.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
