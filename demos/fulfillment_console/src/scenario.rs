// demos/fulfillment_console/src/scenario.rs

use anyhow::{bail, Result};
use chrono::{Duration, Utc};
use packtrack::{
  selectable_stages, CustomerId, DeliveryAddress, FulfillmentService, FulfillmentStage, InMemoryOrderStore,
  LifecycleError, NewOrder, Order, ProofReference, SettlementOutcome,
};
use tracing::{info, instrument, warn};

type Service = FulfillmentService<InMemoryOrderStore>;

fn demo_address() -> DeliveryAddress {
  DeliveryAddress {
    street_lines: vec!["Shop 3".to_string(), "88 Cuba Street".to_string()],
    city: "Wellington".to_string(),
    region: "Wellington Region".to_string(),
    contact_number: "+64 4 555 0199".to_string(),
  }
}

fn print_snapshot(label: &str, order: &Order) -> Result<()> {
  println!("--- {} ---", label);
  println!("{}", serde_json::to_string_pretty(order)?);
  Ok(())
}

/// Device order: pending until the (simulated) gateway captures payment, then
/// stepped through every stage by an operator, then signed off with a photo.
#[instrument(skip_all)]
pub async fn run_paid_order(service: &Service) -> Result<()> {
  let created_at = Utc::now();
  let customer = CustomerId::new();

  let order = service
    .place_order(NewOrder::new(customer, true, demo_address()), created_at)
    .await?;
  info!(order_id = %order.id(), total_cost_cents = order.total_cost_cents(), "Device order placed.");

  // Not visible to the customer until paid.
  if !service.customer_history(customer).await?.is_empty() {
    bail!("unpaid order leaked into customer history");
  }

  let mut order = service
    .record_settlement(
      order.id(),
      SettlementOutcome::captured(format!("pi_demo_{}", order.id().0.simple())),
      created_at + Duration::minutes(2),
    )
    .await?;
  print_snapshot("after settlement", &order)?;

  let mut clock = created_at + Duration::minutes(2);
  while let Some(next) = order.stage().next() {
    info!(
      current = %order.stage(),
      selectable = ?selectable_stages(order.stage()),
      "Operator picks next stage."
    );
    clock = clock + Duration::minutes(45);
    let (updated, _) = service.advance(order.id(), next, Some(order.version()), clock).await?;
    order = updated;
  }

  // A second operator acting on the pre-delivery screen gets refused.
  match service
    .advance(order.id(), FulfillmentStage::Delivered, Some(order.version() - 1), clock)
    .await
  {
    Err(err @ LifecycleError::StaleRead { .. }) => warn!(error = %err, "Stale operator action refused, as expected."),
    other => bail!("expected a stale read, got {:?}", other),
  }

  let order = service
    .attach_proof(
      order.id(),
      ProofReference::Url(format!("https://cdn.example.com/proofs/{}.jpg", order.id())),
      Some(order.version()),
    )
    .await?;
  print_snapshot("delivered with proof", &order)?;
  Ok(())
}

/// Free starter pack: settled as waived at creation, then left sitting to show
/// the delay tiers a customer would see.
#[instrument(skip_all)]
pub async fn run_free_order(service: &Service) -> Result<()> {
  let created_at = Utc::now();
  let order = service
    .place_order(NewOrder::new(CustomerId::new(), false, demo_address()), created_at)
    .await?;
  print_snapshot("free order", &order)?;

  let estimate = order.estimated_delivery().unwrap_or(created_at);
  for minutes_late in [-30_i64, 20, 130, 200] {
    let now = estimate + Duration::minutes(minutes_late);
    match service.delay_notice(order.id(), now).await? {
      Some(message) => info!(minutes_late, %message, "Delay notice."),
      None => info!(minutes_late, "On schedule."),
    }
  }
  Ok(())
}
