//! Integration tests for GlassSpire.
//!
//! # Running Tests
//!
//! ```bash
//! # Domain and router tests (no database needed)
//! cargo test -p glassspire-integration-tests
//!
//! # Database-backed API tests
//! GLASSSPIRE_TEST_DATABASE_URL=postgres://localhost/glassspire_test \
//!     cargo test -p glassspire-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `order_pipeline` - resolver, validator, status machine and aggregates together
//! - `marketplace` - registration, messaging, payments and subscription gating
//! - `api` - the HTTP router, with and without a database
//!
//! This library holds the record builders and app helpers the test files share.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use glassspire_core::models::{Message, Order, OrderDetails, Subscription, User};
use glassspire_core::{
    AccountType, Email, GlassFinish, GlassThickness, MessageId, OrderDetailsId, OrderId,
    OrderStatus, SubscriptionId, SubscriptionPlan, UserId, VerificationStatus,
};
use glassspire_server::config::ServerConfig;
use glassspire_server::db::create_lazy_pool;
use glassspire_server::routes;
use glassspire_server::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

/// Environment variable naming the database for `--ignored` tests.
pub const TEST_DATABASE_ENV: &str = "GLASSSPIRE_TEST_DATABASE_URL";

/// A fixed instant on 2026-03-14, so dates in assertions are stable.
#[must_use]
pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A stored user with the starting statuses for its account type.
///
/// # Panics
///
/// Never: the generated email is always valid.
#[must_use]
#[allow(clippy::missing_panics_doc)]
pub fn user(id: i32, account_type: AccountType) -> User {
    User {
        id: UserId::new(id),
        email: Email::parse(&format!("user{id}@example.com"))
            .unwrap_or_else(|_| unreachable!("generated email is valid")),
        name: format!("User {id}"),
        account_type,
        subscription_status: account_type.initial_subscription_status(),
        phone_number: None,
        address: None,
        verification_status: VerificationStatus::Unverified,
        last_login: None,
        created_at: at(8),
        updated_at: at(8),
    }
}

#[must_use]
pub fn order(id: i32, customer: i32, status: OrderStatus) -> Order {
    Order {
        id: OrderId::new(id),
        customer_id: UserId::new(customer),
        retailer_id: None,
        status,
        created_at: at(9),
        updated_at: at(9),
    }
}

/// A quarter-inch clear sheet, 24 by 42 inches.
#[must_use]
pub fn details(id: i32, order: i32) -> OrderDetails {
    OrderDetails {
        id: OrderDetailsId::new(id),
        order_id: OrderId::new(order),
        glass_thickness: GlassThickness::Quarter,
        glass_finish: GlassFinish::Clear,
        tempering: false,
        dfi_coating: false,
        width: 24.0,
        height: 42.0,
        quantity: 1,
        notes: None,
        image_url: None,
    }
}

#[must_use]
pub fn message(id: i32, from: &User, to: &User, hour: u32) -> Message {
    Message {
        id: MessageId::new(id),
        sender_id: from.id,
        receiver_id: to.id,
        content: format!("message {id}"),
        timestamp: at(hour),
        read: false,
    }
}

/// A retailer subscription paid through `end_date`.
#[must_use]
pub fn subscription(user: &User, end_date: DateTime<Utc>) -> Subscription {
    Subscription {
        id: SubscriptionId::new(1),
        user_id: user.id,
        plan: SubscriptionPlan::Retailer,
        start_date: at(0),
        end_date: Some(end_date),
        payment_method: Some("card".to_owned()),
        card_last4: Some("4242".to_owned()),
    }
}

/// The router on a pool that never connects.
///
/// Only requests that fail before touching the database are meaningful.
///
/// # Panics
///
/// Panics if the placeholder URL fails to parse.
#[must_use]
#[allow(clippy::expect_used)]
pub fn offline_app() -> Router {
    let config = ServerConfig::with_database_url("postgres://glassspire@127.0.0.1:1/glassspire");
    let pool = create_lazy_pool(&config.database_url).expect("placeholder URL parses");
    routes::app(AppState::new(config, pool))
}

/// Send one request and return the status with the parsed JSON body
/// (`Value::Null` for empty or non-JSON bodies).
///
/// # Panics
///
/// Panics if the router itself fails, which axum routers never do.
#[allow(clippy::expect_used)]
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body fits in memory");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Build a request carrying the caller's identity and an optional JSON body.
///
/// # Panics
///
/// Panics on an invalid method or URI.
#[must_use]
#[allow(clippy::expect_used)]
pub fn request(method: &str, uri: &str, user_id: Option<i32>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user_id {
        builder = builder.header("x-user-id", id.to_string());
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("valid request parts")
}
