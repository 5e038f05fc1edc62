//! Subscription route handlers.

use axum::{Json, extract::State};
use chrono::Utc;
use tracing::instrument;

use glassspire_core::SubscriptionStatus;
use glassspire_core::payment::CardInput;
use glassspire_core::subscription::{self, PaymentPlan, SubscriptionOverview};

use crate::db::SubscriptionRepository;
use crate::error::{JsonBody, Result};
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Current plan, fee and effective status.
///
/// GET /subscription
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<SubscriptionOverview>> {
    let current = SubscriptionRepository::new(state.pool())
        .get_for_user(user.id)
        .await?;
    Ok(Json(SubscriptionOverview::new(&user, current, Utc::now())))
}

/// Pay for a month of the retailer plan.
///
/// PUT /subscription
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn pay(
    State(state): State<AppState>,
    RequireUser(mut user): RequireUser,
    JsonBody(card): JsonBody<CardInput>,
) -> Result<Json<SubscriptionOverview>> {
    subscription::billable_plan(user.account_type)?;

    let now = Utc::now();
    let summary = card.validate(now.date_naive())?;

    let repo = SubscriptionRepository::new(state.pool());
    let existing = repo.get_for_user(user.id).await?;
    let plan = subscription::apply_payment(&user, existing.as_ref(), summary, now)?;
    let renewed = matches!(plan, PaymentPlan::Renew(_));

    let stored = repo.apply_payment(user.id, &plan).await?;
    user.subscription_status = SubscriptionStatus::Active;

    tracing::info!(
        renewed,
        end_date = ?stored.end_date,
        "Subscription payment applied"
    );
    Ok(Json(SubscriptionOverview::new(&user, Some(stored), now)))
}
