//! Retailer subscriptions.
//!
//! Retailers pay a flat monthly fee. Paying starts or extends the
//! subscription by one calendar month from the moment of payment. Nothing
//! renews on its own: once `end_date` passes the subscription is expired.

use chrono::{DateTime, Months, Utc};
use serde::Serialize;

use crate::models::{Subscription, User};
use crate::payment::CardSummary;
use crate::types::{AccountType, Price, SubscriptionId, SubscriptionPlan, SubscriptionStatus};

/// Retailer plan fee, in cents.
const RETAILER_MONTHLY_CENTS: i64 = 2000;

impl SubscriptionPlan {
    /// What this plan costs per month.
    #[must_use]
    pub fn monthly_fee(self) -> Price {
        match self {
            Self::Customer => Price::usd_cents(0),
            Self::Retailer => Price::usd_cents(RETAILER_MONTHLY_CENTS),
        }
    }
}

/// End of a subscription paid for at `now`.
#[must_use]
pub fn renewal_end(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_add_months(Months::new(1))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// The status that applies at `now`.
///
/// A stored `Active` status whose end date has passed is `Expired`; the
/// stored value is only corrected by the expiry sweep.
#[must_use]
pub fn effective_status(
    stored: SubscriptionStatus,
    end_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> SubscriptionStatus {
    match (stored, end_date) {
        (SubscriptionStatus::Active, Some(end)) if end < now => SubscriptionStatus::Expired,
        _ => stored,
    }
}

/// Effective status of `user` given their subscription row.
#[must_use]
pub fn user_status(
    user: &User,
    subscription: Option<&Subscription>,
    now: DateTime<Utc>,
) -> SubscriptionStatus {
    match user.account_type {
        AccountType::Customer => user.subscription_status,
        AccountType::Retailer => effective_status(
            user.subscription_status,
            subscription.and_then(|s| s.end_date),
            now,
        ),
    }
}

/// Why a payment cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscriptionError {
    #[error("customer accounts are free and cannot subscribe")]
    CustomerPlanNotBilled,
}

/// The plan `account_type` pays for.
///
/// # Errors
///
/// Returns [`SubscriptionError::CustomerPlanNotBilled`] for customers.
pub const fn billable_plan(account_type: AccountType) -> Result<SubscriptionPlan, SubscriptionError> {
    let plan = account_type.plan();
    if plan.is_billed() {
        Ok(plan)
    } else {
        Err(SubscriptionError::CustomerPlanNotBilled)
    }
}

/// Row values for a subscription's first payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub plan: SubscriptionPlan,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub payment_method: &'static str,
    pub card_last4: String,
}

/// Row values for a later payment. `start_date` is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renewal {
    pub id: SubscriptionId,
    pub plan: SubscriptionPlan,
    pub end_date: DateTime<Utc>,
    pub payment_method: &'static str,
    pub card_last4: String,
}

/// What to write for an accepted payment. Either way the user's stored
/// status becomes `Active`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentPlan {
    Create(NewSubscription),
    Renew(Renewal),
}

/// Turn an accepted card into the subscription write for `user`.
///
/// # Errors
///
/// Returns [`SubscriptionError::CustomerPlanNotBilled`] for customers.
pub fn apply_payment(
    user: &User,
    existing: Option<&Subscription>,
    card: CardSummary,
    now: DateTime<Utc>,
) -> Result<PaymentPlan, SubscriptionError> {
    let plan = billable_plan(user.account_type)?;
    let end_date = renewal_end(now);
    Ok(match existing {
        Some(subscription) => PaymentPlan::Renew(Renewal {
            id: subscription.id,
            plan,
            end_date,
            payment_method: card.payment_method,
            card_last4: card.card_last4,
        }),
        None => PaymentPlan::Create(NewSubscription {
            plan,
            start_date: now,
            end_date,
            payment_method: card.payment_method,
            card_last4: card.card_last4,
        }),
    })
}

/// The subscription page: current state plus what it costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionOverview {
    pub status: SubscriptionStatus,
    pub plan: SubscriptionPlan,
    pub monthly_fee: Price,
    pub subscription: Option<Subscription>,
}

impl SubscriptionOverview {
    #[must_use]
    pub fn new(user: &User, subscription: Option<Subscription>, now: DateTime<Utc>) -> Self {
        let plan = user.account_type.plan();
        Self {
            status: user_status(user, subscription.as_ref(), now),
            plan,
            monthly_fee: plan.monthly_fee(),
            subscription,
        }
    }
}
