// packtrack/src/store.rs

//! The persistence seam.
//!
//! The engine does not own storage. Hosts implement [`OrderStore`] over their
//! data store; the contract is atomic per-record writes guarded by the
//! order's `version` (compare-and-swap), which is what keeps two dashboard
//! sessions from interleaving transitions on the same order.

use crate::core::order::{CustomerId, Order, OrderId};
use crate::error::{LifecycleError, LifecycleResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, Level};

#[async_trait]
pub trait OrderStore: Send + Sync + 'static {
  /// Fetches a single order. Missing orders are `OrderNotFound`.
  async fn load(&self, order_id: OrderId) -> LifecycleResult<Order>;

  /// Writes the full record.
  ///
  /// `expected_version` is the version the caller read before mutating.
  /// `None` means "insert; the order must not exist yet". If the stored
  /// version differs, the write is refused with `StaleRead`.
  async fn save(&self, order: &Order, expected_version: Option<u64>) -> LifecycleResult<()>;

  /// Every order of `customer_id`, unfiltered. Visibility filtering happens
  /// in [`FulfillmentService::customer_history`](crate::service::FulfillmentService::customer_history).
  async fn list_by_customer(&self, customer_id: CustomerId) -> LifecycleResult<Vec<Order>>;
}

/// Process-local store, for tests, demos and single-node deployments.
///
/// Clones share the same underlying map. The lock is blocking and is only
/// held for the duration of a map operation, never across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore(Arc<RwLock<HashMap<OrderId, Order>>>);

impl InMemoryOrderStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.0.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.read().is_empty()
  }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
  async fn load(&self, order_id: OrderId) -> LifecycleResult<Order> {
    self
      .0
      .read()
      .get(&order_id)
      .cloned()
      .ok_or(LifecycleError::OrderNotFound { order_id })
  }

  async fn save(&self, order: &Order, expected_version: Option<u64>) -> LifecycleResult<()> {
    let mut orders = self.0.write();
    let stored_version = orders.get(&order.id()).map(Order::version);

    match (expected_version, stored_version) {
      (None, None) => {}
      (Some(expected), Some(found)) if expected == found => {}
      (expected, found) => {
        event!(
          Level::WARN,
          order_id = %order.id(),
          ?expected,
          ?found,
          "Compare-and-swap failed on save."
        );
        return Err(match (expected, found) {
          (Some(_), None) => LifecycleError::OrderNotFound { order_id: order.id() },
          (expected, found) => LifecycleError::StaleRead {
            order_id: order.id(),
            // An insert expects "nothing"; report that as version 0.
            expected: expected.unwrap_or(0),
            found: found.unwrap_or(0),
          },
        });
      }
    }

    orders.insert(order.id(), order.clone());
    Ok(())
  }

  async fn list_by_customer(&self, customer_id: CustomerId) -> LifecycleResult<Vec<Order>> {
    let mut orders: Vec<Order> = self
      .0
      .read()
      .values()
      .filter(|order| order.customer_id() == customer_id)
      .cloned()
      .collect();
    orders.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    Ok(orders)
  }
}
