// packtrack/examples/basic_lifecycle.rs

use chrono::{Duration, Utc};
use packtrack::{
  CustomerId, DeliveryAddress, FulfillmentStage, LifecycleError, LifecycleResult, NewOrder, OrderLifecycle,
  ProofReference, SettlementOutcome,
};
use tracing::info;

fn main() -> LifecycleResult<()> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Lifecycle Example ---");

  // 1. A lifecycle with the default 9h SLA and pricing
  let lifecycle = OrderLifecycle::default();
  let created_at = Utc::now();

  // 2. A device order arrives with payment outstanding
  let address = DeliveryAddress {
    street_lines: vec!["42 Example Lane".to_string()],
    city: "Christchurch".to_string(),
    region: "Canterbury".to_string(),
    contact_number: "+64 3 555 0123".to_string(),
  };
  let mut order = lifecycle.create_order(NewOrder::new(CustomerId::new(), true, address), created_at);
  info!(stage = %order.stage(), payment = %order.payment(), "Created.");

  // 3. Skipping ahead is refused
  match lifecycle.advance(&mut order, FulfillmentStage::Preparing, created_at) {
    Err(e @ LifecycleError::InvalidTransition { .. }) => info!("Refused as expected: {}", e),
    other => info!("Unexpected: {:?}", other),
  }

  // 4. Gateway captures payment; the order moves to `received` on its own
  lifecycle.record_settlement(&mut order, SettlementOutcome::captured("pi_123"), created_at)?;
  info!(stage = %order.stage(), estimated = ?order.estimated_delivery(), "Paid.");

  // 5. Step through the rest of the pipeline
  let mut now = created_at;
  while let Some(next) = order.stage().next() {
    now = now + Duration::hours(1);
    lifecycle.advance(&mut order, next, now)?;
    info!(stage = %order.stage(), delayed = lifecycle.is_delayed(&order, now), "Advanced.");
  }

  // 6. Doorstep photo
  lifecycle.attach_proof(&mut order, ProofReference::Handle("photos/doorstep-001".to_string()))?;

  for (stage, at) in order.audit_trail().iter() {
    info!("{:>16} entered at {}", stage, at);
  }
  info!(delivered_at = ?order.delivered_at(), "Done.");
  Ok(())
}
