// packtrack/src/service.rs

//! Read-validate-write orchestration over an [`OrderStore`].
//!
//! Each mutating call loads one order, runs the matching
//! [`OrderLifecycle`] rule on a copy, and writes it back with a
//! compare-and-swap on the version that was read. Conflicts surface as
//! `StaleRead`; retrying is the caller's decision.

use crate::core::order::{CustomerId, Order, OrderId, ProofReference};
use crate::core::payment::SettlementOutcome;
use crate::core::stage::FulfillmentStage;
use crate::error::{LifecycleError, LifecycleResult};
use crate::lifecycle::{NewOrder, OrderLifecycle, Transition};
use crate::store::OrderStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{event, instrument, Level};

pub struct FulfillmentService<S: OrderStore> {
  lifecycle: OrderLifecycle,
  store: Arc<S>,
}

impl<S: OrderStore> Clone for FulfillmentService<S> {
  fn clone(&self) -> Self {
    Self {
      lifecycle: self.lifecycle.clone(),
      store: Arc::clone(&self.store),
    }
  }
}

impl<S: OrderStore> FulfillmentService<S> {
  pub fn new(lifecycle: OrderLifecycle, store: Arc<S>) -> Self {
    Self { lifecycle, store }
  }

  pub fn lifecycle(&self) -> &OrderLifecycle {
    &self.lifecycle
  }

  pub fn store(&self) -> &Arc<S> {
    &self.store
  }

  /// Creates and persists a new order.
  #[instrument(name = "FulfillmentService::place_order", skip_all, err(Display))]
  pub async fn place_order(&self, request: NewOrder, now: DateTime<Utc>) -> LifecycleResult<Order> {
    let order = self.lifecycle.create_order(request, now);
    self.store.save(&order, None).await?;
    Ok(order)
  }

  pub async fn order(&self, order_id: OrderId) -> LifecycleResult<Order> {
    self.store.load(order_id).await
  }

  /// Operator-driven stage change. `seen_version` is the version the operator's
  /// screen was rendered from; if the order moved on since, the request is stale.
  #[instrument(name = "FulfillmentService::advance", skip(self, now), err(Display))]
  pub async fn advance(
    &self,
    order_id: OrderId,
    target: FulfillmentStage,
    seen_version: Option<u64>,
    now: DateTime<Utc>,
  ) -> LifecycleResult<(Order, Transition)> {
    self
      .mutate(order_id, seen_version, |lifecycle, order| lifecycle.advance(order, target, now))
      .await
  }

  /// Applies the payment gateway's verdict.
  #[instrument(name = "FulfillmentService::record_settlement", skip(self, now), err(Display))]
  pub async fn record_settlement(
    &self,
    order_id: OrderId,
    outcome: SettlementOutcome,
    now: DateTime<Utc>,
  ) -> LifecycleResult<Order> {
    let (order, ()) = self
      .mutate(order_id, None, |lifecycle, order| {
        lifecycle.record_settlement(order, outcome, now)
      })
      .await?;
    Ok(order)
  }

  #[instrument(name = "FulfillmentService::attach_proof", skip(self, proof), err(Display))]
  pub async fn attach_proof(
    &self,
    order_id: OrderId,
    proof: ProofReference,
    seen_version: Option<u64>,
  ) -> LifecycleResult<Order> {
    let (order, ()) = self
      .mutate(order_id, seen_version, |lifecycle, order| lifecycle.attach_proof(order, proof))
      .await?;
    Ok(order)
  }

  /// The customer's order history: only orders whose payment completed.
  pub async fn customer_history(&self, customer_id: CustomerId) -> LifecycleResult<Vec<Order>> {
    let orders = self.store.list_by_customer(customer_id).await?;
    Ok(orders.into_iter().filter(Order::is_visible).collect())
  }

  /// Delay notice for the order as of `now`, if it is running late.
  pub async fn delay_notice(&self, order_id: OrderId, now: DateTime<Utc>) -> LifecycleResult<Option<String>> {
    let order = self.store.load(order_id).await?;
    Ok(self.lifecycle.delay_message(&order, now))
  }

  async fn mutate<T, F>(&self, order_id: OrderId, seen_version: Option<u64>, apply: F) -> LifecycleResult<(Order, T)>
  where
    F: FnOnce(&OrderLifecycle, &mut Order) -> LifecycleResult<T>,
  {
    let loaded = self.store.load(order_id).await?;
    let read_version = loaded.version();

    if let Some(seen) = seen_version {
      if seen != read_version {
        event!(Level::WARN, %order_id, seen, read_version, "Operator acted on an outdated order.");
        return Err(LifecycleError::StaleRead {
          order_id,
          expected: seen,
          found: read_version,
        });
      }
    }

    let mut order = loaded;
    let output = apply(&self.lifecycle, &mut order)?;

    // No-op transitions leave the version alone; nothing to write.
    if order.version() != read_version {
      self.store.save(&order, Some(read_version)).await?;
    }
    Ok((order, output))
  }
}
