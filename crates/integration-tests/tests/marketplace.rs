//! Customers and retailers meeting: sign-up, messages, the retailer plan.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, NaiveDate};
use glassspire_core::access::{AccessDenied, management_access};
use glassspire_core::account::{ProfileError, ProfileUpdate, Registration};
use glassspire_core::messaging::{self, Conversation, MessageDraft, MessageError};
use glassspire_core::payment::{CardError, CardField, CardInput};
use glassspire_core::subscription::{
    self, PaymentPlan, SubscriptionError, SubscriptionOverview, effective_status, renewal_end,
};
use glassspire_core::{AccountType, SubscriptionPlan, SubscriptionStatus};
use glassspire_integration_tests::{at, message, subscription, user};

fn card() -> CardInput {
    CardInput {
        card_number: "4242 4242 4242 4242".to_owned(),
        expiry: "12/30".to_owned(),
        cvc: "123".to_owned(),
        cardholder_name: "Rosa Glazier".to_owned(),
    }
}

fn today() -> NaiveDate {
    at(12).date_naive()
}

#[test]
fn test_registration_sets_starting_statuses() {
    let retailer = Registration {
        name: "  Spire Glass Co ".to_owned(),
        email: "shop@spire.example".to_owned(),
        account_type: AccountType::Retailer,
    }
    .validate()
    .unwrap();
    assert_eq!(retailer.name, "Spire Glass Co");
    assert_eq!(retailer.subscription_status, SubscriptionStatus::Trial);

    let customer = Registration {
        name: "Ann".to_owned(),
        email: "ann@example.com".to_owned(),
        account_type: AccountType::Customer,
    }
    .validate()
    .unwrap();
    assert_ne!(customer.subscription_status, SubscriptionStatus::Trial);
}

#[test]
fn test_profile_reports_every_missing_field() {
    let errors = ProfileUpdate {
        name: "Ann".to_owned(),
        email: "not-an-email".to_owned(),
        ..ProfileUpdate::default()
    }
    .validate()
    .unwrap_err();

    assert_eq!(
        errors.0,
        [
            ProfileError::InvalidEmail,
            ProfileError::PhoneRequired,
            ProfileError::AddressRequired,
        ]
    );
}

#[test]
fn test_conversation_between_customer_and_retailer() {
    let ann = user(1, AccountType::Customer);
    let shop = user(50, AccountType::Retailer);
    messaging::ensure_counterparts(&ann, &shop).unwrap();
    assert_eq!(
        messaging::contact_type(ann.account_type),
        AccountType::Retailer
    );

    let sent = vec![message(1, &ann, &shop, 9), message(3, &ann, &shop, 11)];
    let received = vec![message(2, &shop, &ann, 10)];
    let mut conversation = Conversation::merge(sent, received);

    let order: Vec<i32> = conversation.messages.iter().map(|m| m.id.as_i32()).collect();
    assert_eq!(order, [1, 2, 3]);

    // Opening the thread reads only what was sent to the viewer
    assert_eq!(conversation.unread_for(shop.id).len(), 2);
    assert_eq!(conversation.mark_read_by(shop.id), 2);
    assert!(conversation.unread_for(shop.id).is_empty());
    assert_eq!(conversation.unread_for(ann.id).len(), 1);
}

#[test]
fn test_messages_need_content_and_a_counterpart() {
    assert_eq!(MessageDraft::new("  \n").unwrap_err(), MessageError::EmptyContent);
    assert_eq!(MessageDraft::new(" hi ").unwrap().content(), "hi");

    let ann = user(1, AccountType::Customer);
    let bob = user(2, AccountType::Customer);
    assert_eq!(
        messaging::ensure_counterparts(&ann, &bob),
        Err(MessageError::SameAccountType {
            account_type: AccountType::Customer
        })
    );
    assert_eq!(
        messaging::ensure_counterparts(&ann, &ann),
        Err(MessageError::SelfAddressed)
    );
}

#[test]
fn test_trial_retailer_pays_then_manages_orders() {
    let now = at(12);
    let mut shop = user(50, AccountType::Retailer);

    assert_eq!(
        management_access(&shop, None, now),
        Err(AccessDenied::SubscriptionRequired {
            status: SubscriptionStatus::Trial
        })
    );

    let summary = card().validate(today()).unwrap();
    assert_eq!(summary.card_last4, "4242");

    let PaymentPlan::Create(new) = subscription::apply_payment(&shop, None, summary, now).unwrap()
    else {
        panic!("first payment creates the subscription");
    };
    assert_eq!(new.plan, SubscriptionPlan::Retailer);
    assert_eq!(new.start_date, now);
    assert_eq!(new.end_date, renewal_end(now));

    shop.subscription_status = SubscriptionStatus::Active;
    let stored = subscription(&shop, new.end_date);
    management_access(&shop, Some(&stored), now).unwrap();

    let overview = SubscriptionOverview::new(&shop, Some(stored), now);
    assert_eq!(overview.status, SubscriptionStatus::Active);
    assert!(!overview.monthly_fee.is_free());
}

#[test]
fn test_second_payment_renews_in_place() {
    let now = at(12);
    let mut shop = user(50, AccountType::Retailer);
    shop.subscription_status = SubscriptionStatus::Active;
    let existing = subscription(&shop, now - Duration::days(3));

    let summary = card().validate(today()).unwrap();
    let PaymentPlan::Renew(renewal) =
        subscription::apply_payment(&shop, Some(&existing), summary, now).unwrap()
    else {
        panic!("later payments renew");
    };
    assert_eq!(renewal.id, existing.id);
    assert_eq!(renewal.end_date, renewal_end(now));
}

#[test]
fn test_lapsed_subscription_is_expired() {
    let now = at(12);
    let mut shop = user(50, AccountType::Retailer);
    shop.subscription_status = SubscriptionStatus::Active;
    let lapsed = subscription(&shop, now - Duration::hours(1));

    assert_eq!(
        effective_status(shop.subscription_status, lapsed.end_date, now),
        SubscriptionStatus::Expired
    );
    assert_eq!(
        management_access(&shop, Some(&lapsed), now),
        Err(AccessDenied::SubscriptionRequired {
            status: SubscriptionStatus::Expired
        })
    );
}

#[test]
fn test_customers_are_never_gated_or_billed() {
    let now = at(12);
    let ann = user(1, AccountType::Customer);
    management_access(&ann, None, now).unwrap();

    let summary = card().validate(today()).unwrap();
    assert_eq!(
        subscription::apply_payment(&ann, None, summary, now),
        Err(SubscriptionError::CustomerPlanNotBilled)
    );
    assert!(SubscriptionOverview::new(&ann, None, now).monthly_fee.is_free());
}

#[test]
fn test_bad_card_lists_each_field() {
    let errors = CardInput {
        card_number: "4242 4242 4242 4241".to_owned(),
        expiry: "01/20".to_owned(),
        cvc: "12a".to_owned(),
        cardholder_name: " ".to_owned(),
    }
    .validate(today())
    .unwrap_err();

    assert_eq!(errors.0.len(), 4);
    assert_eq!(errors.get(CardField::CardNumber), Some(&CardError::NumberChecksum));
    assert_eq!(errors.get(CardField::Expiry), Some(&CardError::Expired));
    assert_eq!(errors.get(CardField::CardholderName), Some(&CardError::NameRequired));
    assert!(!format!("{:?}", card()).contains("4242"));
}
