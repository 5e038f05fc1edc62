//! Moving an order along the fulfillment pipeline.
//!
//! Only retailers move orders. Advancing a `ready` order is allowed and
//! changes nothing, so a double-clicked button is harmless. The caller
//! persists the returned order; concurrent advances resolve last-write-wins.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Actor, Order};
use crate::types::{AccountType, OrderId, OrderStatus, UserId};

/// Refusal to move an order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionRefused {
    /// Customers only watch their orders progress.
    #[error("only retailers can update order {order_id} (user {user_id} is a customer)")]
    NotRetailer { order_id: OrderId, user_id: UserId },
}

/// Result of a permitted advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: OrderStatus,
    pub to: OrderStatus,
    /// The order as it should now be stored.
    pub order: Order,
}

impl Transition {
    /// False when the order was already ready.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Advance `order` one step on behalf of `actor`.
///
/// A retailer advancing an unassigned order becomes its retailer. On a ready
/// order the returned order is identical to the input, `updated_at` included.
///
/// # Errors
///
/// Returns [`TransitionRefused::NotRetailer`] when the actor is a customer;
/// the order is left untouched.
pub fn advance(
    order: &Order,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<Transition, TransitionRefused> {
    match actor.account_type {
        AccountType::Customer => Err(TransitionRefused::NotRetailer {
            order_id: order.id,
            user_id: actor.user_id,
        }),
        AccountType::Retailer => {
            let from = order.status;
            let to = from.next();
            let mut next = order.clone();
            if from != to {
                next.status = to;
                next.updated_at = now;
                next.retailer_id.get_or_insert(actor.user_id);
            }
            Ok(Transition {
                from,
                to,
                order: next,
            })
        }
    }
}
