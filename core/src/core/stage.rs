// packtrack/src/core/stage.rs

//! The fixed fulfillment pipeline a starter pack moves through.
//!
//! ```text
//! pending → received → preparing → configuring → out_for_delivery → delivered
//! ```
//!
//! `pending` is the only stage not reachable from another stage, and
//! `delivered` is terminal. Movement is strictly forward, one stage at a time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical handling progress of a single package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStage {
  /// Awaiting payment; nothing has been handed to the warehouse yet.
  Pending,
  Received,
  Preparing,
  /// The companion device (if any) is being provisioned.
  Configuring,
  OutForDelivery,
  Delivered,
}

impl FulfillmentStage {
  /// All stages in pipeline order.
  pub const ALL: [FulfillmentStage; 6] = [
    FulfillmentStage::Pending,
    FulfillmentStage::Received,
    FulfillmentStage::Preparing,
    FulfillmentStage::Configuring,
    FulfillmentStage::OutForDelivery,
    FulfillmentStage::Delivered,
  ];

  /// Fixed 0-based ordinal of this stage in the pipeline.
  pub fn index(self) -> usize {
    match self {
      FulfillmentStage::Pending => 0,
      FulfillmentStage::Received => 1,
      FulfillmentStage::Preparing => 2,
      FulfillmentStage::Configuring => 3,
      FulfillmentStage::OutForDelivery => 4,
      FulfillmentStage::Delivered => 5,
    }
  }

  /// The stage immediately after this one, or `None` once delivered.
  pub fn next(self) -> Option<FulfillmentStage> {
    Self::ALL.get(self.index() + 1).copied()
  }

  pub fn is_terminal(self) -> bool {
    self == FulfillmentStage::Delivered
  }

  /// Whether moving from `self` to `target` is allowed: staying put, or
  /// stepping to the immediate successor.
  pub fn can_advance_to(self, target: FulfillmentStage) -> bool {
    target == self || self.next() == Some(target)
  }

  /// Once the package is en route or delivered, SLA delay no longer applies.
  pub fn is_in_customer_hands(self) -> bool {
    matches!(self, FulfillmentStage::OutForDelivery | FulfillmentStage::Delivered)
  }

  /// Stable wire/storage name, also used as the audit-trail key.
  pub fn as_str(self) -> &'static str {
    match self {
      FulfillmentStage::Pending => "pending",
      FulfillmentStage::Received => "received",
      FulfillmentStage::Preparing => "preparing",
      FulfillmentStage::Configuring => "configuring",
      FulfillmentStage::OutForDelivery => "out_for_delivery",
      FulfillmentStage::Delivered => "delivered",
    }
  }
}

/// Ordinal position of `stage`; used for progress comparison and UI gating.
pub fn stage_index(stage: FulfillmentStage) -> usize {
  stage.index()
}

/// The stages an operator may pick for an order currently at `current`:
/// the current stage itself and, unless terminal, the one right after it.
/// Earlier stages are shown as completed and never offered again.
pub fn selectable_stages(current: FulfillmentStage) -> Vec<FulfillmentStage> {
  let mut stages = vec![current];
  if let Some(next) = current.next() {
    stages.push(next);
  }
  stages
}

impl fmt::Display for FulfillmentStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(self.as_str())
  }
}

/// Returned when a stage name does not match any pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown fulfillment stage: '{0}'")]
pub struct UnknownStage(pub String);

impl FromStr for FulfillmentStage {
  type Err = UnknownStage;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .iter()
      .copied()
      .find(|stage| stage.as_str() == s)
      .ok_or_else(|| UnknownStage(s.to_string()))
  }
}
