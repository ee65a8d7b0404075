// tests/state_machine_tests.rs
mod common;

use common::*;
use packtrack::{selectable_stages, stage_index, FulfillmentStage, LifecycleError, Order, OrderLifecycle, Transition};
use std::str::FromStr;

#[test]
fn test_stage_index_follows_pipeline_order() {
  let indices: Vec<usize> = FulfillmentStage::ALL.iter().map(|s| stage_index(*s)).collect();
  assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
  assert_eq!(stage_index(FulfillmentStage::OutForDelivery), 4);
  assert_eq!(FulfillmentStage::Delivered.next(), None);
  assert_eq!(FulfillmentStage::Configuring.next(), Some(FulfillmentStage::OutForDelivery));
}

#[test]
fn test_stage_names_parse_and_display() {
  for stage in FulfillmentStage::ALL {
    assert_eq!(FulfillmentStage::from_str(stage.as_str()).unwrap(), stage);
    assert_eq!(stage.to_string(), stage.as_str());
  }
  assert_eq!(
    FulfillmentStage::from_str("out_for_delivery").unwrap(),
    FulfillmentStage::OutForDelivery
  );
  assert!(FulfillmentStage::from_str("shipped").is_err());
}

#[test]
fn test_selectable_stages_are_current_and_next_only() {
  assert_eq!(
    selectable_stages(FulfillmentStage::Preparing),
    vec![FulfillmentStage::Preparing, FulfillmentStage::Configuring]
  );
  assert_eq!(
    selectable_stages(FulfillmentStage::Delivered),
    vec![FulfillmentStage::Delivered]
  );
}

#[test]
fn test_advance_walks_the_full_pipeline_and_records_audit_trail() {
  setup_tracing();
  let lc = lifecycle();
  let mut order = free_order(&lc);
  assert_eq!(order.stage(), FulfillmentStage::Received);

  let mut previous_index = stage_index(order.stage());
  let targets = [
    FulfillmentStage::Preparing,
    FulfillmentStage::Configuring,
    FulfillmentStage::OutForDelivery,
    FulfillmentStage::Delivered,
  ];
  for (i, target) in targets.iter().enumerate() {
    let now = at_minutes(30 * (i as i64 + 1));
    let transition = lc.advance(&mut order, *target, now).unwrap();
    assert!(matches!(transition, Transition::Advanced { to, .. } if to == *target));
    assert!(stage_index(order.stage()) >= previous_index);
    previous_index = stage_index(order.stage());
    assert_eq!(order.audit_trail().entered_at(*target), Some(now));
  }

  assert_eq!(order.stage(), FulfillmentStage::Delivered);
  // received + four advances
  assert_eq!(order.audit_trail().len(), 5);
  assert!(!order.audit_trail().contains(FulfillmentStage::Pending));
}

#[test]
fn test_advance_to_current_stage_is_a_no_op() {
  setup_tracing();
  let lc = lifecycle();
  let mut order = free_order(&lc);
  let before = order.clone();

  let transition = lc
    .advance(&mut order, FulfillmentStage::Received, at_minutes(90))
    .unwrap();
  assert_eq!(transition, Transition::Unchanged(FulfillmentStage::Received));
  assert_eq!(order, before);
}

/// Fresh order sitting at `stage`, on its happy path.
fn order_at(lc: &OrderLifecycle, stage: FulfillmentStage) -> Order {
  if stage == FulfillmentStage::Pending {
    // Unpaid; a pending order with completed payment does not exist.
    return device_order(lc);
  }
  let mut order = free_order(lc);
  advance_to(lc, &mut order, stage);
  order
}

#[test]
fn test_advance_allows_only_current_or_next_stage() {
  setup_tracing();
  let lc = lifecycle();

  for current in FulfillmentStage::ALL {
    for target in FulfillmentStage::ALL {
      let mut order = order_at(&lc, current);
      let snapshot = order.clone();
      let result = lc.advance(&mut order, target, at_minutes(500));

      // Leaving `pending` additionally needs a completed payment.
      let allowed = target == current
        || (current.next() == Some(target) && current != FulfillmentStage::Pending);

      match result {
        Ok(Transition::Unchanged(stage)) if allowed && target == current => {
          assert_eq!(stage, current);
          assert_eq!(order, snapshot);
        }
        Ok(Transition::Advanced { from, to }) if allowed && target != current => {
          assert_eq!((from, to), (current, target));
          assert_eq!(order.stage(), target);
          assert_eq!(order.version(), snapshot.version() + 1);
        }
        Err(LifecycleError::InvalidTransition { from, to }) if !allowed => {
          assert_eq!((from, to), (current, target));
          // Refused calls leave the order untouched.
          assert_eq!(order, snapshot);
        }
        other => panic!("{} -> {}: allowed = {}, got {:?}", current, target, allowed, other),
      }
    }
  }
}

#[test]
fn test_pending_order_cannot_advance_before_payment() {
  setup_tracing();
  let lc = lifecycle();
  let mut order = device_order(&lc);
  assert_eq!(order.stage(), FulfillmentStage::Pending);

  let result = lc.advance(&mut order, FulfillmentStage::Received, at_minutes(1));
  assert!(matches!(
    result,
    Err(LifecycleError::InvalidTransition {
      from: FulfillmentStage::Pending,
      to: FulfillmentStage::Received
    })
  ));
  assert!(order.audit_trail().is_empty());
  assert_eq!(order.estimated_delivery(), None);
}

#[test]
fn test_delivered_at_set_only_on_delivery() {
  setup_tracing();
  let lc = lifecycle();
  let mut order = free_order(&lc);

  while let Some(next) = order.stage().next() {
    assert_eq!(order.delivered_at(), None, "delivered_at set early at {}", order.stage());
    lc.advance(&mut order, next, at_minutes(60)).unwrap();
  }

  assert_eq!(order.stage(), FulfillmentStage::Delivered);
  assert_eq!(order.delivered_at(), Some(at_minutes(60)));

  // Re-asserting the terminal stage does not touch the timestamp.
  lc.advance(&mut order, FulfillmentStage::Delivered, at_minutes(600)).unwrap();
  assert_eq!(order.delivered_at(), Some(at_minutes(60)));
  assert_eq!(
    order.audit_trail().entered_at(FulfillmentStage::Delivered),
    Some(at_minutes(60))
  );
}

#[test]
fn test_estimated_delivery_not_recomputed_by_later_advances() {
  setup_tracing();
  let lc = lifecycle();
  let mut order = free_order(&lc);
  let estimate = order.estimated_delivery().unwrap();

  advance_to(&lc, &mut order, FulfillmentStage::OutForDelivery);
  assert_eq!(order.estimated_delivery(), Some(estimate));
}

#[test]
fn test_each_genuine_transition_bumps_version() {
  let lc = lifecycle();
  let mut order = free_order(&lc);
  assert_eq!(order.version(), 0);

  lc.advance(&mut order, FulfillmentStage::Preparing, at_minutes(10)).unwrap();
  assert_eq!(order.version(), 1);
  lc.advance(&mut order, FulfillmentStage::Preparing, at_minutes(20)).unwrap();
  assert_eq!(order.version(), 1);
  let _ = lc.advance(&mut order, FulfillmentStage::Delivered, at_minutes(30));
  assert_eq!(order.version(), 1);
}
