//! Status enums persisted on users, orders and subscriptions.
//!
//! Each enum maps to a `PostgreSQL` enum type in the `glassspire` schema when
//! the `postgres` feature is enabled, and to its lowercase `snake_case` name in
//! JSON.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a variant of one of these enums.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseStatusError {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseStatusError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Position of an order in the fulfillment pipeline.
///
/// The pipeline is linear: `Received -> Cut -> Tempered -> Ready`. There are
/// no backward or skipping moves, and `Ready` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "glassspire.order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Received,
    Cut,
    Tempered,
    Ready,
}

impl OrderStatus {
    /// Every state, in pipeline order.
    pub const ALL: [Self; 4] = [Self::Received, Self::Cut, Self::Tempered, Self::Ready];

    /// The state that follows this one.
    ///
    /// Total over all states. `Ready` maps to itself so that a repeated
    /// advance is harmless.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Received => Self::Cut,
            Self::Cut => Self::Tempered,
            Self::Tempered | Self::Ready => Self::Ready,
        }
    }

    /// Whether the order has left the workshop pipeline.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Wire and database name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Cut => "cut",
            Self::Tempered => "tempered",
            Self::Ready => "ready",
        }
    }

    /// Human-readable label shown to customers and retailers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Received => "Order Received",
            Self::Cut => "Glass Cut",
            Self::Tempered => "Glass Tempered",
            Self::Ready => "Ready for Pickup",
        }
    }

    /// Caption for the retailer's advance button, or `None` once ready.
    #[must_use]
    pub const fn next_action_label(self) -> Option<&'static str> {
        match self {
            Self::Received => Some("Mark as Cut"),
            Self::Cut => Some("Mark as Tempered"),
            Self::Tempered => Some("Mark as Ready"),
            Self::Ready => None,
        }
    }
}

/// Label for a raw persisted status value.
///
/// Known statuses get their [`OrderStatus::label`]; anything else is returned
/// unchanged.
#[must_use]
pub fn display_label(raw: &str) -> &str {
    match raw.parse::<OrderStatus>() {
        Ok(status) => status.label(),
        Err(_) => raw,
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError::new("order status", s))
    }
}

/// Which side of the marketplace a user is on.
///
/// Fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "glassspire.account_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Places orders; free.
    Customer,
    /// Fulfills orders; pays a subscription.
    Retailer,
}

impl AccountType {
    /// The account type on the other side of a conversation.
    #[must_use]
    pub const fn counterpart(self) -> Self {
        match self {
            Self::Customer => Self::Retailer,
            Self::Retailer => Self::Customer,
        }
    }

    /// Subscription status a new account starts with.
    ///
    /// Customers are never billed, so they start (and stay) active.
    #[must_use]
    pub const fn initial_subscription_status(self) -> SubscriptionStatus {
        match self {
            Self::Customer => SubscriptionStatus::Active,
            Self::Retailer => SubscriptionStatus::Trial,
        }
    }

    /// The plan this account is billed under.
    #[must_use]
    pub const fn plan(self) -> SubscriptionPlan {
        match self {
            Self::Customer => SubscriptionPlan::Customer,
            Self::Retailer => SubscriptionPlan::Retailer,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Retailer => write!(f, "retailer"),
        }
    }
}

impl FromStr for AccountType {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "retailer" => Ok(Self::Retailer),
            _ => Err(ParseStatusError::new("account type", s)),
        }
    }
}

/// Billing state of a user. Only meaningful for retailers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "glassspire.subscription_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Trial,
    Active,
    Expired,
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trial => write!(f, "trial"),
            Self::Active => write!(f, "active"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// Email verification state for users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "glassspire.verification_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Unverified,
    Verified,
}

/// Plan recorded on a subscription row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "glassspire.subscription_plan", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    Customer,
    Retailer,
}

impl SubscriptionPlan {
    /// Whether this plan is ever charged.
    #[must_use]
    pub const fn is_billed(self) -> bool {
        matches!(self, Self::Retailer)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_next_walks_the_pipeline() {
        assert_eq!(OrderStatus::Received.next(), OrderStatus::Cut);
        assert_eq!(OrderStatus::Cut.next(), OrderStatus::Tempered);
        assert_eq!(OrderStatus::Tempered.next(), OrderStatus::Ready);
        assert_eq!(
            OrderStatus::Received.next().next().next(),
            OrderStatus::Ready
        );
    }

    #[test]
    fn test_next_is_idempotent_at_ready() {
        assert_eq!(OrderStatus::Ready.next(), OrderStatus::Ready);
        assert_eq!(OrderStatus::Ready.next().next(), OrderStatus::Ready);
    }

    #[test]
    fn test_next_never_moves_backwards() {
        for status in OrderStatus::ALL {
            assert!(status.next() as u8 >= status as u8);
        }
    }

    #[test]
    fn test_only_ready_is_terminal() {
        let terminal: Vec<_> = OrderStatus::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![OrderStatus::Ready]);
    }

    #[test]
    fn test_default_is_received() {
        assert_eq!(OrderStatus::default(), OrderStatus::Received);
    }

    #[test]
    fn test_labels() {
        assert_eq!(OrderStatus::Received.label(), "Order Received");
        assert_eq!(OrderStatus::Ready.label(), "Ready for Pickup");
        assert_eq!(OrderStatus::Tempered.next_action_label(), Some("Mark as Ready"));
        assert_eq!(OrderStatus::Ready.next_action_label(), None);
    }

    #[test]
    fn test_display_label_passes_unknown_values_through() {
        assert_eq!(display_label("cut"), "Glass Cut");
        assert_eq!(display_label("polished"), "polished");
        assert_eq!(display_label(""), "");
    }

    #[test]
    fn test_order_status_parse_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("READY".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_status_json_is_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Tempered).unwrap_or_default();
        assert_eq!(json, "\"tempered\"");
    }

    #[test]
    fn test_account_type_counterpart_and_defaults() {
        assert_eq!(AccountType::Customer.counterpart(), AccountType::Retailer);
        assert_eq!(AccountType::Retailer.counterpart(), AccountType::Customer);
        assert_eq!(
            AccountType::Customer.initial_subscription_status(),
            SubscriptionStatus::Active
        );
        assert_eq!(
            AccountType::Retailer.initial_subscription_status(),
            SubscriptionStatus::Trial
        );
        assert!(!AccountType::Customer.plan().is_billed());
        assert!(AccountType::Retailer.plan().is_billed());
    }

    #[test]
    fn test_account_type_from_str() {
        assert_eq!("retailer".parse::<AccountType>(), Ok(AccountType::Retailer));
        let err = "admin".parse::<AccountType>().unwrap_err();
        assert_eq!(err.to_string(), "invalid account type: admin");
    }
}
