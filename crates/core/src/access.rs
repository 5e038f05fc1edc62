//! Gate for the retailer's order management screens.

use chrono::{DateTime, Utc};

use crate::models::{Subscription, User};
use crate::subscription::user_status;
use crate::types::{AccountType, SubscriptionStatus};

/// Refusal to open order management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("an active subscription is required (current status: {status})")]
    SubscriptionRequired { status: SubscriptionStatus },
}

/// Check whether `user` may manage orders at `now`.
///
/// Customers are never gated. Retailers need a subscription that is
/// effectively active; trial and expired retailers are refused.
///
/// # Errors
///
/// Returns [`AccessDenied::SubscriptionRequired`] with the effective status.
pub fn management_access(
    user: &User,
    subscription: Option<&Subscription>,
    now: DateTime<Utc>,
) -> Result<(), AccessDenied> {
    if user.account_type == AccountType::Customer {
        return Ok(());
    }
    match user_status(user, subscription, now) {
        SubscriptionStatus::Active => Ok(()),
        status => Err(AccessDenied::SubscriptionRequired { status }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{at, user};
    use crate::types::{SubscriptionId, SubscriptionPlan};

    fn paid_until(user_id: i32, end: DateTime<Utc>) -> Subscription {
        Subscription {
            id: SubscriptionId::new(1),
            user_id: crate::types::UserId::new(user_id),
            plan: SubscriptionPlan::Retailer,
            start_date: at(0),
            end_date: Some(end),
            payment_method: Some("card".to_owned()),
            card_last4: Some("4242".to_owned()),
        }
    }

    #[test]
    fn test_customers_always_pass() {
        assert_eq!(
            management_access(&user(1, AccountType::Customer), None, at(12)),
            Ok(())
        );
    }

    #[test]
    fn test_trial_retailer_is_refused() {
        assert_eq!(
            management_access(&user(2, AccountType::Retailer), None, at(12)),
            Err(AccessDenied::SubscriptionRequired {
                status: SubscriptionStatus::Trial
            })
        );
    }

    #[test]
    fn test_active_retailer_passes_until_end_date() {
        let mut retailer = user(2, AccountType::Retailer);
        retailer.subscription_status = SubscriptionStatus::Active;
        let sub = paid_until(2, at(18));

        assert_eq!(management_access(&retailer, Some(&sub), at(12)), Ok(()));
        assert_eq!(
            management_access(&retailer, Some(&sub), at(19)),
            Err(AccessDenied::SubscriptionRequired {
                status: SubscriptionStatus::Expired
            })
        );
    }

    #[test]
    fn test_stored_expired_is_refused() {
        let mut retailer = user(2, AccountType::Retailer);
        retailer.subscription_status = SubscriptionStatus::Expired;
        assert!(management_access(&retailer, None, at(12)).is_err());
    }
}
