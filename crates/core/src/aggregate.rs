//! Joins order headers with their details for display.
//!
//! Every order is created together with exactly one details row, so a header
//! without details means the data is damaged. The aggregate is still built
//! (with no details) and [`OrderAggregate::anomaly`] says what is missing;
//! callers report it and carry on.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Order, OrderDetails, Participant};
use crate::types::{OrderId, OrderStatus};

/// Lookup of a details row by its order.
pub trait DetailsLookup {
    fn details_for(&self, order_id: OrderId) -> Option<OrderDetails>;
}

impl DetailsLookup for [OrderDetails] {
    fn details_for(&self, order_id: OrderId) -> Option<OrderDetails> {
        self.iter().find(|d| d.order_id == order_id).cloned()
    }
}

impl DetailsLookup for Vec<OrderDetails> {
    fn details_for(&self, order_id: OrderId) -> Option<OrderDetails> {
        self.as_slice().details_for(order_id)
    }
}

impl DetailsLookup for HashMap<OrderId, OrderDetails> {
    fn details_for(&self, order_id: OrderId) -> Option<OrderDetails> {
        self.get(&order_id).cloned()
    }
}

/// An order header with no matching details row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("order {order_id} has no details record")]
pub struct DataIntegrityAnomaly {
    pub order_id: OrderId,
}

/// Order header plus its glass specification.
///
/// Serializes as the header's fields with a `details` field added.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderAggregate {
    #[serde(flatten)]
    pub order: Order,
    pub details: Option<OrderDetails>,
}

impl OrderAggregate {
    /// Pair an order with whatever details row the lookup holds for it.
    #[must_use]
    pub fn assemble<L>(order: Order, lookup: &L) -> Self
    where
        L: DetailsLookup + ?Sized,
    {
        let details = lookup.details_for(order.id);
        Self { order, details }
    }

    /// Set when the details row is missing.
    #[must_use]
    pub fn anomaly(&self) -> Option<DataIntegrityAnomaly> {
        match self.details {
            Some(_) => None,
            None => Some(DataIntegrityAnomaly {
                order_id: self.order.id,
            }),
        }
    }
}

/// Assemble every order, one lookup each, keeping input order.
pub fn build_all<I, L>(orders: I, lookup: &L) -> Vec<OrderAggregate>
where
    I: IntoIterator<Item = Order>,
    L: DetailsLookup + ?Sized,
{
    orders
        .into_iter()
        .map(|order| OrderAggregate::assemble(order, lookup))
        .collect()
}

/// An order with the people on both ends, for the order detail screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub aggregate: OrderAggregate,
    pub status_label: &'static str,
    pub next_action: Option<&'static str>,
    pub customer: Option<Participant>,
    pub retailer: Option<Participant>,
}

impl OrderView {
    #[must_use]
    pub fn new(
        aggregate: OrderAggregate,
        customer: Option<Participant>,
        retailer: Option<Participant>,
    ) -> Self {
        let status = aggregate.order.status;
        Self {
            aggregate,
            status_label: status.label(),
            next_action: status.next_action_label(),
            customer,
            retailer,
        }
    }
}

/// Search box and status tab on the order list.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct OrderFilter {
    /// Matched against the order number, finish and thickness.
    pub q: Option<String>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    #[must_use]
    pub fn matches(&self, aggregate: &OrderAggregate) -> bool {
        if self
            .status
            .is_some_and(|status| aggregate.order.status != status)
        {
            return false;
        }

        let Some(query) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
            return true;
        };
        let query = query.to_lowercase();

        if aggregate.order.id.to_string().contains(&query) {
            return true;
        }
        aggregate.details.as_ref().is_some_and(|d| {
            d.glass_finish.as_str().contains(&query)
                || d.glass_thickness.as_str().to_lowercase().contains(&query)
        })
    }

    /// Keep the aggregates this filter matches.
    #[must_use]
    pub fn apply(&self, aggregates: Vec<OrderAggregate>) -> Vec<OrderAggregate> {
        aggregates.into_iter().filter(|a| self.matches(a)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::fixtures::{details, order, user};
    use crate::types::{AccountType, GlassFinish, GlassThickness};

    #[test]
    fn test_assemble_with_details() {
        let store = vec![details(1, 4), details(2, 5)];
        let agg = OrderAggregate::assemble(order(5, 1, OrderStatus::Tempered), &store);
        assert_eq!(agg.order.id, OrderId::new(5));
        assert_eq!(agg.order.status, OrderStatus::Tempered);
        assert_eq!(agg.details.as_ref().unwrap().order_id, OrderId::new(5));
        assert_eq!(agg.anomaly(), None);
    }

    #[test]
    fn test_assemble_without_details_flags_anomaly() {
        let store: Vec<OrderDetails> = Vec::new();
        let agg = OrderAggregate::assemble(order(5, 1, OrderStatus::Tempered), &store);
        assert!(agg.details.is_none());
        assert_eq!(
            agg.anomaly(),
            Some(DataIntegrityAnomaly {
                order_id: OrderId::new(5)
            })
        );
    }

    #[test]
    fn test_serializes_flat_with_details_field() {
        let store: HashMap<OrderId, OrderDetails> =
            [(OrderId::new(5), details(9, 5))].into_iter().collect();
        let agg = OrderAggregate::assemble(order(5, 1, OrderStatus::Tempered), &store);
        let json = serde_json::to_value(&agg).unwrap();
        assert_eq!(json["id"], 5);
        assert_eq!(json["status"], "tempered");
        assert_eq!(json["details"]["order_id"], 5);

        let missing = OrderAggregate::assemble(order(6, 1, OrderStatus::Cut), &store);
        let json = serde_json::to_value(&missing).unwrap();
        assert!(json["details"].is_null());
    }

    #[test]
    fn test_build_all_keeps_order() {
        let store = vec![details(1, 2)];
        let aggs = build_all(
            vec![
                order(3, 1, OrderStatus::Received),
                order(2, 1, OrderStatus::Cut),
            ],
            store.as_slice(),
        );
        let ids: Vec<_> = aggs.iter().map(|a| a.order.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 2]);
        assert!(aggs[0].anomaly().is_some());
        assert!(aggs[1].anomaly().is_none());
    }

    #[test]
    fn test_view_labels_and_participants() {
        let store = vec![details(1, 5)];
        let agg = OrderAggregate::assemble(order(5, 1, OrderStatus::Cut), &store);
        let customer = user(1, AccountType::Customer).participant();
        let view = OrderView::new(agg, Some(customer), None);
        assert_eq!(view.status_label, "Glass Cut");
        assert_eq!(view.next_action, Some("Mark as Tempered"));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["customer"]["id"], 1);
        assert!(json["retailer"].is_null());
    }

    fn catalog() -> Vec<OrderAggregate> {
        let mut mirror = details(2, 12);
        mirror.glass_finish = GlassFinish::Mirror;
        mirror.glass_thickness = GlassThickness::NineSixteenthsLaminated;
        let store = vec![details(1, 7), mirror];
        build_all(
            vec![
                order(7, 1, OrderStatus::Received),
                order(12, 1, OrderStatus::Ready),
                order(30, 1, OrderStatus::Ready),
            ],
            &store,
        )
    }

    fn ids(aggs: &[OrderAggregate]) -> Vec<i32> {
        aggs.iter().map(|a| a.order.id.as_i32()).collect()
    }

    #[test]
    fn test_filter_by_status() {
        let filter = OrderFilter {
            status: Some(OrderStatus::Ready),
            ..OrderFilter::default()
        };
        assert_eq!(ids(&filter.apply(catalog())), vec![12, 30]);
    }

    #[test]
    fn test_filter_by_query() {
        let by_finish = OrderFilter {
            q: Some("MIRR".to_owned()),
            ..OrderFilter::default()
        };
        assert_eq!(ids(&by_finish.apply(catalog())), vec![12]);

        let by_thickness = OrderFilter {
            q: Some("laminated".to_owned()),
            ..OrderFilter::default()
        };
        assert_eq!(ids(&by_thickness.apply(catalog())), vec![12]);

        let by_id = OrderFilter {
            q: Some("3".to_owned()),
            ..OrderFilter::default()
        };
        assert_eq!(ids(&by_id.apply(catalog())), vec![30]);

        let blank = OrderFilter {
            q: Some("  ".to_owned()),
            ..OrderFilter::default()
        };
        assert_eq!(blank.apply(catalog()).len(), 3);
    }
}
