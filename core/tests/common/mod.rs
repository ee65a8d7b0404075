// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use chrono::{DateTime, Duration, TimeZone, Utc};
use packtrack::{
  CustomerId, DeliveryAddress, FulfillmentStage, LifecycleConfig, NewOrder, Order, OrderLifecycle, SettlementOutcome,
};
use tracing::Level;

// --- Common Fixtures ---

/// 2024-01-01T00:00:00Z, the reference creation instant used across tests.
pub fn t0() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap()
}

pub fn at_minutes(minutes: i64) -> DateTime<Utc> {
  t0() + Duration::minutes(minutes)
}

pub fn sample_address() -> DeliveryAddress {
  DeliveryAddress {
    street_lines: vec!["Unit 4".to_string(), "12 Harbour Road".to_string()],
    city: "Wellington".to_string(),
    region: "Wellington Region".to_string(),
    contact_number: "+64 21 555 0101".to_string(),
  }
}

pub fn lifecycle() -> OrderLifecycle {
  OrderLifecycle::new(LifecycleConfig::default()).unwrap()
}

/// Zero-cost order: starts `received` / `completed`.
pub fn free_order(lifecycle: &OrderLifecycle) -> Order {
  lifecycle.create_order(NewOrder::new(CustomerId::new(), false, sample_address()), t0())
}

/// Device order with payment outstanding: starts `pending` / `pending`.
pub fn device_order(lifecycle: &OrderLifecycle) -> Order {
  lifecycle.create_order(NewOrder::new(CustomerId::new(), true, sample_address()), t0())
}

/// Device order that has been paid for with reference `pi_123`.
pub fn paid_device_order(lifecycle: &OrderLifecycle) -> Order {
  let mut order = device_order(lifecycle);
  lifecycle
    .record_settlement(&mut order, SettlementOutcome::captured("pi_123"), at_minutes(5))
    .unwrap();
  order
}

/// Walks `order` forward one stage at a time until it reaches `target`,
/// advancing the clock by ten minutes per step.
pub fn advance_to(lifecycle: &OrderLifecycle, order: &mut Order, target: FulfillmentStage) {
  let mut minute = 10;
  while order.stage() != target {
    let next = order.stage().next().expect("target lies beyond the terminal stage");
    lifecycle.advance(order, next, at_minutes(minute)).unwrap();
    minute += 10;
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
