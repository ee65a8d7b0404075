// packtrack/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::core::order::OrderId;
use crate::core::payment::PaymentState;
use crate::core::stage::FulfillmentStage;

/// Every failure the lifecycle engine reports.
///
/// The first four variants are local validation failures: the caller surfaces
/// a message, refuses the action, and may re-fetch the order and try again.
/// The remaining variants come from collaborators (store, configuration).
#[derive(Debug, Error)]
pub enum LifecycleError {
  #[error("Invalid fulfillment transition from '{from}' to '{to}'")]
  InvalidTransition { from: FulfillmentStage, to: FulfillmentStage },

  #[error("Order {order_id} already settled (payment is '{payment}')")]
  AlreadySettled { order_id: OrderId, payment: PaymentState },

  #[error("Cannot {action} for order {order_id} while it is '{stage}'")]
  InvalidState {
    order_id: OrderId,
    stage: FulfillmentStage,
    action: &'static str,
  },

  #[error("Stale read for order {order_id}: expected version {expected}, found {found}")]
  StaleRead { order_id: OrderId, expected: u64, found: u64 },

  #[error("Order not found: {order_id}")]
  OrderNotFound { order_id: OrderId },

  #[error("Configuration error: {message}")]
  Configuration { message: String },

  #[error("Order store failure. Source: {source}")]
  Store {
    #[source]
    source: AnyhowError,
  },
}

impl LifecycleError {
  /// True for the failures a caller is expected to recover from by
  /// re-fetching the order and re-attempting.
  pub fn is_retryable(&self) -> bool {
    matches!(self, LifecycleError::StaleRead { .. })
  }
}

// Store backends speak anyhow; this is where their failures enter the taxonomy.
impl From<AnyhowError> for LifecycleError {
  fn from(err: AnyhowError) -> Self {
    // A backend may hand back one of our own errors wrapped in anyhow
    // (e.g. a CAS conflict it detected itself). Unwrap it instead of nesting.
    match err.downcast::<LifecycleError>() {
      Ok(lifecycle_err) => lifecycle_err,
      Err(source) => LifecycleError::Store { source },
    }
  }
}

pub type LifecycleResult<T, E = LifecycleError> = std::result::Result<T, E>;
