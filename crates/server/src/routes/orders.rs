//! Order route handlers.
//!
//! Customers place orders and follow their own; retailers with an active
//! subscription see every order and move them through the workshop.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use tracing::instrument;

use glassspire_core::access::management_access;
use glassspire_core::aggregate::{OrderAggregate, OrderFilter, OrderView, build_all};
use glassspire_core::lifecycle::{self, Transition};
use glassspire_core::models::{Order, User};
use glassspire_core::validation::OrderRequest;
use glassspire_core::{AccountType, OrderId, UserId};

use crate::db::{OrderRepository, SubscriptionRepository, UserRepository};
use crate::error::{AppError, JsonBody, Result};
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Orders visible to the caller, newest first, narrowed by the filter.
///
/// GET /orders?q=&status=
#[instrument(skip_all, fields(user_id = %user.id, q = ?filter.q, status = ?filter.status))]
pub async fn index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<OrderAggregate>>> {
    let repo = OrderRepository::new(state.pool());

    let orders = match user.account_type {
        AccountType::Customer => repo.list_for_customer(user.id).await?,
        AccountType::Retailer => {
            ensure_management_access(&state, &user).await?;
            repo.list_all().await?
        }
    };

    let ids: Vec<OrderId> = orders.iter().map(|o| o.id).collect();
    let details = repo.details_for_orders(&ids).await?;
    let aggregates = build_all(orders, &details);
    report_anomalies(&aggregates);

    Ok(Json(filter.apply(aggregates)))
}

/// Validate and place a new order.
///
/// POST /orders
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    JsonBody(request): JsonBody<OrderRequest>,
) -> Result<(StatusCode, Json<OrderAggregate>)> {
    if user.account_type != AccountType::Customer {
        return Err(AppError::Forbidden(
            "only customers can place orders".to_string(),
        ));
    }

    let spec = request.validate()?;
    let aggregate = OrderRepository::new(state.pool())
        .create(user.id, &spec)
        .await?;

    tracing::info!(
        order_id = %aggregate.order.id,
        thickness = %spec.glass_thickness,
        finish = %spec.glass_finish,
        quantity = spec.quantity,
        "Order placed"
    );
    Ok((StatusCode::CREATED, Json(aggregate)))
}

/// One order with its details and the people on both ends.
///
/// GET /orders/{id}
#[instrument(skip_all, fields(user_id = %user.id, order_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderView>> {
    let order = load_visible(&state, &user, id).await?;
    if user.account_type == AccountType::Retailer {
        ensure_management_access(&state, &user).await?;
    }

    let details = OrderRepository::new(state.pool()).details_for(id).await?;
    let aggregate = OrderAggregate { order, details };
    report_anomalies(std::slice::from_ref(&aggregate));

    let mut party_ids = vec![aggregate.order.customer_id];
    party_ids.extend(aggregate.order.retailer_id);
    let parties = UserRepository::new(state.pool()).get_many(&party_ids).await?;
    let participant = |id: UserId| parties.iter().find(|u| u.id == id).map(User::participant);

    let customer = participant(aggregate.order.customer_id);
    let retailer = aggregate.order.retailer_id.and_then(participant);
    Ok(Json(OrderView::new(aggregate, customer, retailer)))
}

/// Move an order to its next status.
///
/// POST /orders/{id}/advance
#[instrument(skip_all, fields(user_id = %user.id, order_id = %id))]
pub async fn advance(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<OrderId>,
) -> Result<Json<Transition>> {
    let order = load_visible(&state, &user, id).await?;
    if user.account_type == AccountType::Retailer {
        ensure_management_access(&state, &user).await?;
    }

    let mut transition = lifecycle::advance(&order, &user.actor(), Utc::now())?;

    if transition.changed() {
        transition.order = OrderRepository::new(state.pool())
            .save_transition(&transition.order)
            .await?;
        tracing::info!(from = %transition.from, to = %transition.to, "Order advanced");
    } else {
        tracing::debug!(status = %transition.from, "Order already ready");
    }

    Ok(Json(transition))
}

/// Load an order the caller may see. Hidden orders read as missing.
async fn load_visible(state: &AppState, user: &User, id: OrderId) -> Result<Order> {
    OrderRepository::new(state.pool())
        .get(id)
        .await?
        .filter(|order| order.visible_to(&user.actor()))
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}

async fn ensure_management_access(state: &AppState, user: &User) -> Result<()> {
    let subscription = SubscriptionRepository::new(state.pool())
        .get_for_user(user.id)
        .await?;
    management_access(user, subscription.as_ref(), Utc::now())?;
    Ok(())
}

fn report_anomalies(aggregates: &[OrderAggregate]) {
    for anomaly in aggregates.iter().filter_map(OrderAggregate::anomaly) {
        tracing::warn!(order_id = %anomaly.order_id, "{anomaly}");
    }
}
