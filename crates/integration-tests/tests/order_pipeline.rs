//! Order form to workshop: resolve the size, validate, advance, display.
//!
//! Pure core behaviour only; no database or server involved.

#![allow(clippy::unwrap_used)]

use glassspire_core::aggregate::{OrderAggregate, OrderFilter, build_all};
use glassspire_core::dimensions::{self, DimensionInput, Dimensions, MeasurementUnit};
use glassspire_core::lifecycle::{self, TransitionRefused};
use glassspire_core::validation::{self, OrderDraft, OrderRejection, OrderRequest};
use glassspire_core::{AccountType, GlassFinish, GlassThickness, OrderStatus, UserId};
use glassspire_integration_tests::{at, details, order, user};
use serde_json::json;

fn draft(thickness: &str, finish: &str) -> OrderDraft {
    OrderDraft {
        glass_thickness: thickness.to_owned(),
        glass_finish: finish.to_owned(),
        ..OrderDraft::default()
    }
}

#[test]
fn test_inches_pass_through() {
    for (w, h) in [(0.5, 0.5), (12.0, 18.0), (47.25, 96.125)] {
        let input = DimensionInput {
            width: w.to_string(),
            height: h.to_string(),
            ..DimensionInput::default()
        };
        assert_eq!(
            dimensions::resolve(MeasurementUnit::Inches, &input),
            Dimensions::new(w, h)
        );
    }
}

#[test]
fn test_feet_and_inches_combine() {
    for (wf, wi, hf, hi) in [(0.0, 0.0, 0.0, 0.0), (1.0, 6.0, 2.0, 0.5), (8.0, 11.0, 0.0, 7.0)] {
        let input = DimensionInput {
            width_feet: wf.to_string(),
            width_inches: wi.to_string(),
            height_feet: hf.to_string(),
            height_inches: hi.to_string(),
            ..DimensionInput::default()
        };
        assert_eq!(
            dimensions::resolve(MeasurementUnit::FeetAndInches, &input),
            Dimensions::new(wf * 12.0 + wi, hf * 12.0 + hi)
        );
    }
}

#[test]
fn test_bad_sizes_are_rejected_per_side() {
    let good = draft("1/4", "clear");
    for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        assert_eq!(
            validation::validate(&good, Dimensions::new(bad, 10.0)),
            Err(OrderRejection::InvalidWidth)
        );
        assert_eq!(
            validation::validate(&good, Dimensions::new(10.0, bad)),
            Err(OrderRejection::InvalidHeight)
        );
    }
}

#[test]
fn test_first_failing_check_wins() {
    assert_eq!(
        validation::validate(&draft("", "clear"), Dimensions::new(10.0, 10.0)),
        Err(OrderRejection::MissingThickness)
    );
    // Width is checked before the missing thickness
    assert_eq!(
        validation::validate(&draft("", "clear"), Dimensions::new(0.0, 10.0)),
        Err(OrderRejection::InvalidWidth)
    );
    assert_eq!(
        validation::validate(&draft("", ""), Dimensions::new(10.0, 10.0)),
        Err(OrderRejection::MissingThickness)
    );
    assert_eq!(
        validation::validate(&draft("1/4", ""), Dimensions::new(10.0, 10.0)),
        Err(OrderRejection::MissingFinish)
    );
}

#[test]
fn test_feet_form_end_to_end() {
    let request: OrderRequest = serde_json::from_value(json!({
        "unit": "feet_and_inches",
        "width_feet": "2",
        "width_inches": "",
        "height_feet": "3",
        "height_inches": "6",
        "glass_thickness": "1/4",
        "glass_finish": "clear",
    }))
    .unwrap();

    let spec = request.validate().unwrap();
    assert_eq!(spec.width, 24.0);
    assert_eq!(spec.height, 42.0);
    assert_eq!(spec.glass_thickness, GlassThickness::Quarter);
    assert_eq!(spec.glass_finish, GlassFinish::Clear);
    assert_eq!(spec.quantity, 1);
    assert_eq!(OrderStatus::default(), OrderStatus::Received);
}

#[test]
fn test_missing_thickness_end_to_end() {
    let request: OrderRequest = serde_json::from_value(json!({
        "width": "10",
        "height": "10",
        "glass_finish": "grey",
    }))
    .unwrap();
    assert_eq!(request.validate(), Err(OrderRejection::MissingThickness));
}

#[test]
fn test_unparsable_width_is_invalid() {
    let request: OrderRequest = serde_json::from_value(json!({
        "width": "ten",
        "height": "10",
        "glass_thickness": "1/2",
        "glass_finish": "mirror",
    }))
    .unwrap();
    assert_eq!(request.validate(), Err(OrderRejection::InvalidWidth));
}

#[test]
fn test_next_is_total_and_settles_at_ready() {
    let received = OrderStatus::Received;
    assert_eq!(received.next().next().next(), OrderStatus::Ready);
    assert_eq!(OrderStatus::Ready.next(), OrderStatus::Ready);
    for status in OrderStatus::ALL {
        assert!(OrderStatus::ALL.contains(&status.next()));
    }
}

#[test]
fn test_customer_cannot_advance() {
    let customer = user(1, AccountType::Customer);
    let o = order(5, 1, OrderStatus::Cut);

    let err = lifecycle::advance(&o, &customer.actor(), at(12)).unwrap_err();
    assert!(matches!(err, TransitionRefused::NotRetailer { .. }));
    assert_eq!(o.status, OrderStatus::Cut);
}

#[test]
fn test_retailer_walks_order_to_ready() {
    let retailer = user(50, AccountType::Retailer).actor();
    let mut current = order(5, 1, OrderStatus::Received);
    let mut seen = vec![current.status];

    for hour in 10..15 {
        let transition = lifecycle::advance(&current, &retailer, at(hour)).unwrap();
        current = transition.order;
        seen.push(current.status);
    }

    assert_eq!(
        seen,
        [
            OrderStatus::Received,
            OrderStatus::Cut,
            OrderStatus::Tempered,
            OrderStatus::Ready,
            OrderStatus::Ready,
            OrderStatus::Ready,
        ]
    );
    // Stamped by the last real move, not the no-ops
    assert_eq!(current.updated_at, at(12));
    assert_eq!(current.retailer_id, Some(UserId::new(50)));
}

#[test]
fn test_aggregate_with_and_without_details() {
    let header = order(5, 1, OrderStatus::Tempered);
    let store = vec![details(9, 5)];

    let found = OrderAggregate::assemble(header.clone(), &store);
    assert_eq!(found.details, Some(details(9, 5)));
    assert!(found.anomaly().is_none());

    let json = serde_json::to_value(&found).unwrap();
    assert_eq!(json["id"], 5);
    assert_eq!(json["status"], "tempered");
    assert_eq!(json["details"]["order_id"], 5);

    let missing = OrderAggregate::assemble(header, &Vec::new());
    assert!(missing.details.is_none());
    assert_eq!(missing.anomaly().map(|a| a.order_id), Some(missing.order.id));
    assert!(serde_json::to_value(&missing).unwrap()["details"].is_null());
}

#[test]
fn test_order_list_filters() {
    let orders = vec![
        order(1, 1, OrderStatus::Received),
        order(2, 1, OrderStatus::Ready),
        order(3, 2, OrderStatus::Received),
    ];
    let mut store = vec![details(11, 1), details(13, 3)];
    if let Some(d) = store.last_mut() {
        d.glass_finish = GlassFinish::Bronze;
    }

    let all = build_all(orders, &store);
    assert_eq!(all.iter().filter(|a| a.anomaly().is_some()).count(), 1);

    let received = OrderFilter {
        status: Some(OrderStatus::Received),
        ..OrderFilter::default()
    };
    assert_eq!(received.apply(all.clone()).len(), 2);

    let bronze = OrderFilter {
        q: Some("Bronze".to_owned()),
        ..OrderFilter::default()
    };
    let hits = bronze.apply(all);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits.first().map(|a| a.order.id.as_i32()), Some(3));
}
