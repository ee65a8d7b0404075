// demos/fulfillment_console/src/main.rs

//! Walks one paid starter-pack order and one free order through the whole
//! fulfillment lifecycle against the in-memory store, printing each snapshot.

mod scenario;

use anyhow::Context;
use packtrack::{FulfillmentService, InMemoryOrderStore, LifecycleConfig, OrderLifecycle};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting fulfillment console...");

  let config = LifecycleConfig::from_env().context("Failed to load lifecycle configuration")?;
  let lifecycle = OrderLifecycle::new(config).context("Invalid lifecycle configuration")?;
  let service = FulfillmentService::new(lifecycle, Arc::new(InMemoryOrderStore::new()));

  scenario::run_paid_order(&service).await?;
  scenario::run_free_order(&service).await?;

  tracing::info!(orders_stored = service.store().len(), "Fulfillment console finished.");
  Ok(())
}
