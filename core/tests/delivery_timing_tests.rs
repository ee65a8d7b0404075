// tests/delivery_timing_tests.rs
mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::*;
use packtrack::{
  delay_message, estimate_delivery, is_delayed, CustomerId, DelaySeverity, FulfillmentStage, LifecycleConfig,
  NewOrder, OrderLifecycle,
};

#[test]
fn test_estimate_is_exactly_nine_hours_after_creation() {
  let samples = [
    t0(),
    Utc.with_ymd_and_hms(2023, 12, 31, 20, 30, 15).single().unwrap(),
    Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).single().unwrap(),
    t0() + Duration::milliseconds(123),
  ];
  for created_at in samples {
    assert_eq!(estimate_delivery(created_at), created_at + Duration::hours(9));
  }
  assert_eq!(
    estimate_delivery(t0()),
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single().unwrap()
  );
}

#[test]
fn test_never_delayed_once_in_customer_hands() {
  let estimate = estimate_delivery(t0());
  for stage in [FulfillmentStage::OutForDelivery, FulfillmentStage::Delivered] {
    for hours_late in [0, 1, 5, 48, 10_000] {
      assert!(!is_delayed(estimate + Duration::hours(hours_late), stage, estimate));
    }
  }
}

#[test]
fn test_delayed_only_strictly_after_estimate() {
  let estimate = estimate_delivery(t0());
  for stage in [
    FulfillmentStage::Pending,
    FulfillmentStage::Received,
    FulfillmentStage::Preparing,
    FulfillmentStage::Configuring,
  ] {
    assert!(!is_delayed(estimate - Duration::minutes(1), stage, estimate));
    assert!(!is_delayed(estimate, stage, estimate));
    assert!(is_delayed(estimate + Duration::seconds(1), stage, estimate));
  }
}

#[test]
fn test_delay_message_tiers() {
  let estimate = estimate_delivery(t0());

  let mild = delay_message(estimate + Duration::minutes(59), estimate);
  assert!(mild.starts_with("Sorry"));
  assert!(!mild.chars().any(|c| c.is_ascii_digit()));

  let one = delay_message(estimate + Duration::minutes(60), estimate);
  assert!(one.contains("delayed by approximately 1 hour."));

  let two = delay_message(estimate + Duration::minutes(179), estimate);
  assert!(two.contains("delayed by approximately 2 hours"));

  let escalated = delay_message(estimate + Duration::hours(3), estimate);
  assert!(escalated.contains("contact support"));
  assert!(!escalated.chars().any(|c| c.is_ascii_digit()));

  assert_eq!(
    DelaySeverity::classify(estimate + Duration::hours(26), estimate),
    DelaySeverity::Escalated
  );
  assert_eq!(
    DelaySeverity::classify(estimate - Duration::hours(2), estimate),
    DelaySeverity::Minor
  );
}

#[test]
fn test_preparing_order_two_hours_late() {
  setup_tracing();
  let lc = lifecycle();
  let mut order = free_order(&lc);
  advance_to(&lc, &mut order, FulfillmentStage::Preparing);

  let estimate = order.estimated_delivery().unwrap();
  let now = estimate + Duration::hours(2);
  assert!(is_delayed(now, order.stage(), estimate));
  assert!(lc.is_delayed(&order, now));
  assert_eq!(
    lc.delay_severity(&order, now),
    Some(DelaySeverity::Moderate { hours: 2 })
  );
  let message = lc.delay_message(&order, now).unwrap();
  assert!(message.contains("delayed by approximately 2 hours"), "{}", message);

  advance_to(&lc, &mut order, FulfillmentStage::OutForDelivery);
  assert!(!lc.is_delayed(&order, now));
  assert_eq!(lc.delay_message(&order, now), None);
}

#[test]
fn test_unpaid_order_has_no_estimate_and_is_not_delayed() {
  let lc = lifecycle();
  let order = device_order(&lc);
  assert_eq!(order.estimated_delivery(), None);
  assert!(!lc.is_delayed(&order, t0() + Duration::days(3)));
}

#[test]
fn test_configured_service_window() {
  let lc = OrderLifecycle::new(LifecycleConfig {
    service_window_hours: 24,
    ..LifecycleConfig::default()
  })
  .unwrap();
  let order = lc.create_order(NewOrder::new(CustomerId::new(), false, sample_address()), t0());
  assert_eq!(order.estimated_delivery(), Some(t0() + Duration::hours(24)));
  assert_eq!(lc.estimate_delivery(t0()), t0() + Duration::hours(24));
  // The free function keeps the fixed window.
  assert_eq!(estimate_delivery(t0()), t0() + Duration::hours(9));
}

#[test]
fn test_estimate_saturates_at_the_end_of_time() {
  let latest = DateTime::<Utc>::MAX_UTC;
  assert_eq!(estimate_delivery(latest), latest);
  assert_eq!(estimate_delivery(latest - Duration::hours(1)), latest);
  assert!(!is_delayed(latest, FulfillmentStage::Preparing, estimate_delivery(latest)));
}
