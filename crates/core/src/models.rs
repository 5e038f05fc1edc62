//! Records stored by the application.
//!
//! These mirror the tables one-to-one. With the `postgres` feature they can be
//! read straight out of a query with `sqlx::query_as`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    AccountType, Email, GlassFinish, GlassThickness, MessageId, OrderDetailsId, OrderId,
    OrderStatus, SubscriptionId, SubscriptionPlan, SubscriptionStatus, UserId,
    VerificationStatus,
};

/// A registered customer or retailer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    /// Fixed at registration.
    pub account_type: AccountType,
    /// Only consulted for retailers.
    pub subscription_status: SubscriptionStatus,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub verification_status: VerificationStatus,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The acting party for permission checks.
    #[must_use]
    pub const fn actor(&self) -> Actor {
        Actor {
            user_id: self.id,
            account_type: self.account_type,
        }
    }

    /// Public identity shown next to orders and conversations.
    #[must_use]
    pub fn participant(&self) -> Participant {
        Participant {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            account_type: self.account_type,
        }
    }
}

/// Who is performing an operation.
///
/// Always passed explicitly; nothing in this crate reads a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub account_type: AccountType,
}

/// Identity of the other party on an order or in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub account_type: AccountType,
}

/// Order header. Its glass specification lives in [`OrderDetails`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Order {
    pub id: OrderId,
    /// Owning customer; never changes.
    pub customer_id: UserId,
    /// Retailer handling the order, once one has advanced it.
    pub retailer_id: Option<UserId>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Whether `actor` may view this order.
    ///
    /// Customers see only their own orders; retailers see every order.
    #[must_use]
    pub fn visible_to(&self, actor: &Actor) -> bool {
        match actor.account_type {
            AccountType::Customer => self.customer_id == actor.user_id,
            AccountType::Retailer => true,
        }
    }
}

/// The glass specification attached to exactly one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct OrderDetails {
    pub id: OrderDetailsId,
    pub order_id: OrderId,
    pub glass_thickness: GlassThickness,
    pub glass_finish: GlassFinish,
    pub tempering: bool,
    pub dfi_coating: bool,
    /// Inches.
    pub width: f64,
    /// Inches.
    pub height: f64,
    pub quantity: i32,
    pub notes: Option<String>,
    /// Reference image held by external storage.
    pub image_url: Option<String>,
}

/// A direct message between a customer and a retailer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Flipped by the receiver viewing the conversation.
    pub read: bool,
}

/// A retailer's billing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub plan: SubscriptionPlan,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub card_last4: Option<String>,
}
