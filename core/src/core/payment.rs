// packtrack/src/core/payment.rs

//! The payment axis of an order. Independent of fulfillment, except that
//! fulfillment cannot leave `pending` until payment is `completed`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `pending → completed` or `pending → failed`. Both outcomes are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
  Pending,
  Completed,
  Failed,
}

impl PaymentState {
  pub fn is_terminal(self) -> bool {
    !matches!(self, PaymentState::Pending)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      PaymentState::Pending => "pending",
      PaymentState::Completed => "completed",
      PaymentState::Failed => "failed",
    }
  }
}

impl fmt::Display for PaymentState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(self.as_str())
  }
}

/// What ties an order to money actually moving (or explicitly not moving).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reference", rename_all = "snake_case")]
pub enum Settlement {
  /// No successful settlement yet (payment pending or failed).
  #[default]
  Unpaid,
  /// Zero-cost order; nothing was charged.
  Waived,
  /// Gateway-authorized charge, identified by the gateway's opaque reference.
  Captured(String),
}

impl Settlement {
  pub fn reference(&self) -> Option<&str> {
    match self {
      Settlement::Captured(reference) => Some(reference.as_str()),
      Settlement::Unpaid | Settlement::Waived => None,
    }
  }
}

/// The result handed over by the payment gateway (or by the ordering flow for
/// free orders). This component never talks to the gateway itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOutcome {
  /// Charge authorized; `reference` is the gateway's settlement identifier.
  Captured { reference: String },
  /// Nothing to charge.
  Waived,
  /// Gateway declined or errored. The reference, when the gateway supplied
  /// one, is kept for logging only.
  Failed { reference: Option<String> },
}

impl SettlementOutcome {
  pub fn captured(reference: impl Into<String>) -> Self {
    SettlementOutcome::Captured {
      reference: reference.into(),
    }
  }

  /// Payment state the order lands in after this outcome.
  pub fn payment_state(&self) -> PaymentState {
    match self {
      SettlementOutcome::Captured { .. } | SettlementOutcome::Waived => PaymentState::Completed,
      SettlementOutcome::Failed { .. } => PaymentState::Failed,
    }
  }

  /// Settlement recorded on the order after this outcome.
  pub fn settlement(&self) -> Settlement {
    match self {
      SettlementOutcome::Captured { reference } => Settlement::Captured(reference.clone()),
      SettlementOutcome::Waived => Settlement::Waived,
      SettlementOutcome::Failed { .. } => Settlement::Unpaid,
    }
  }
}
