// packtrack/src/core/order.rs

//! The order record and the value types hanging off it.
//!
//! Fields are crate-private: every mutation goes through
//! [`OrderLifecycle`](crate::lifecycle::OrderLifecycle) so the stage, payment
//! and audit invariants cannot be bypassed by a caller holding an `Order`.

use crate::core::payment::{PaymentState, Settlement};
use crate::core::stage::FulfillmentStage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

macro_rules! id_newtype {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(pub Uuid);

    impl $name {
      pub fn new() -> Self {
        Self(Uuid::new_v4())
      }
    }

    impl Default for $name {
      fn default() -> Self {
        Self::new()
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
      }
    }

    impl From<Uuid> for $name {
      fn from(id: Uuid) -> Self {
        Self(id)
      }
    }
  };
}

id_newtype!(
  /// Unique order identifier.
  OrderId
);
id_newtype!(
  /// The customer who owns the order.
  CustomerId
);
id_newtype!(MerchantId);

/// Where the starter pack goes. Validated upstream by the address-collection
/// flow; captured once and never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
  pub street_lines: Vec<String>,
  pub city: String,
  pub region: String,
  pub contact_number: String,
}

/// Append-only record of when the order entered each stage.
///
/// Serialized as a map keyed by stage name (`"received"`, `"out_for_delivery"`, ...)
/// with RFC 3339 instants as values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditTrail(BTreeMap<FulfillmentStage, DateTime<Utc>>);

impl AuditTrail {
  pub fn new() -> Self {
    Self::default()
  }

  /// Records `at` for `stage` unless an entry already exists.
  /// Returns whether a new entry was written.
  pub(crate) fn record_once(&mut self, stage: FulfillmentStage, at: DateTime<Utc>) -> bool {
    if self.0.contains_key(&stage) {
      return false;
    }
    self.0.insert(stage, at);
    true
  }

  pub fn entered_at(&self, stage: FulfillmentStage) -> Option<DateTime<Utc>> {
    self.0.get(&stage).copied()
  }

  pub fn contains(&self, stage: FulfillmentStage) -> bool {
    self.0.contains_key(&stage)
  }

  /// Entries in pipeline order.
  pub fn iter(&self) -> impl Iterator<Item = (FulfillmentStage, DateTime<Utc>)> + '_ {
    self.0.iter().map(|(stage, at)| (*stage, *at))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

/// Photo evidence captured at the doorstep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProofReference {
  /// Publicly reachable image URL.
  Url(String),
  /// Opaque handle into the binary/object store.
  Handle(String),
}

/// The central entity: one starter-pack order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
  pub(crate) id: OrderId,
  pub(crate) customer_id: CustomerId,
  pub(crate) merchant_id: Option<MerchantId>,

  pub(crate) includes_device: bool,
  pub(crate) device_cost_cents: u32,
  pub(crate) total_cost_cents: u32,

  pub(crate) stage: FulfillmentStage,
  pub(crate) payment: PaymentState,
  pub(crate) settlement: Settlement,

  pub(crate) address: DeliveryAddress,

  pub(crate) created_at: DateTime<Utc>,
  pub(crate) delivered_at: Option<DateTime<Utc>>,
  pub(crate) estimated_delivery: Option<DateTime<Utc>>,

  pub(crate) audit_trail: AuditTrail,
  pub(crate) proof: Option<ProofReference>,

  // Bumped on every committed mutation; the store compares it on save.
  #[serde(default)]
  pub(crate) version: u64,
}

impl Order {
  pub fn id(&self) -> OrderId {
    self.id
  }

  pub fn customer_id(&self) -> CustomerId {
    self.customer_id
  }

  pub fn merchant_id(&self) -> Option<MerchantId> {
    self.merchant_id
  }

  pub fn includes_device(&self) -> bool {
    self.includes_device
  }

  pub fn device_cost_cents(&self) -> u32 {
    self.device_cost_cents
  }

  pub fn total_cost_cents(&self) -> u32 {
    self.total_cost_cents
  }

  pub fn stage(&self) -> FulfillmentStage {
    self.stage
  }

  pub fn payment(&self) -> PaymentState {
    self.payment
  }

  pub fn settlement(&self) -> &Settlement {
    &self.settlement
  }

  pub fn address(&self) -> &DeliveryAddress {
    &self.address
  }

  pub fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }

  pub fn delivered_at(&self) -> Option<DateTime<Utc>> {
    self.delivered_at
  }

  pub fn estimated_delivery(&self) -> Option<DateTime<Utc>> {
    self.estimated_delivery
  }

  pub fn audit_trail(&self) -> &AuditTrail {
    &self.audit_trail
  }

  pub fn proof(&self) -> Option<&ProofReference> {
    self.proof.as_ref()
  }

  pub fn version(&self) -> u64 {
    self.version
  }

  /// Customer-facing listings only ever show orders whose payment completed.
  pub fn is_visible(&self) -> bool {
    self.payment == PaymentState::Completed
  }

  pub(crate) fn bump_version(&mut self) {
    self.version += 1;
  }
}

/// Total price of an order in cents: base cost plus, when the companion
/// device is included, the device cost.
pub fn total_cost_cents(includes_device: bool, base_cost_cents: u32, device_cost_cents: u32) -> u32 {
  if includes_device {
    base_cost_cents.saturating_add(device_cost_cents)
  } else {
    base_cost_cents
  }
}
