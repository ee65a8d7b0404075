// packtrack/src/lifecycle.rs

//! The Order Lifecycle Manager.
//!
//! `OrderLifecycle` owns every rule that changes an [`Order`]: stage
//! transitions, payment settlement, SLA derivation and proof capture. All
//! operations are synchronous and work on a single order snapshot; any I/O
//! (loading, saving, talking to the gateway) happens before or after, in the
//! caller. Each operation validates first and only then mutates, so a
//! refused call leaves the order untouched.

use crate::config::LifecycleConfig;
use crate::core::order::{
  total_cost_cents, AuditTrail, CustomerId, DeliveryAddress, MerchantId, Order, OrderId, ProofReference,
};
use crate::core::payment::{PaymentState, Settlement, SettlementOutcome};
use crate::core::stage::FulfillmentStage;
use crate::core::timing::{self, DelaySeverity};
use crate::error::{LifecycleError, LifecycleResult};
use chrono::{DateTime, Utc};
use tracing::{event, instrument, Level};

/// What the ordering flow hands over when a customer checks out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
  pub customer_id: CustomerId,
  pub merchant_id: Option<MerchantId>,
  pub includes_device: bool,
  pub address: DeliveryAddress,
}

impl NewOrder {
  pub fn new(customer_id: CustomerId, includes_device: bool, address: DeliveryAddress) -> Self {
    Self {
      customer_id,
      merchant_id: None,
      includes_device,
      address,
    }
  }

  pub fn with_merchant(mut self, merchant_id: MerchantId) -> Self {
    self.merchant_id = Some(merchant_id);
    self
  }
}

/// Outcome of a successful [`OrderLifecycle::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
  /// Target equals the current stage; nothing changed.
  Unchanged(FulfillmentStage),
  Advanced { from: FulfillmentStage, to: FulfillmentStage },
}

#[derive(Debug, Clone, Default)]
pub struct OrderLifecycle {
  config: LifecycleConfig,
}

impl OrderLifecycle {
  pub fn new(config: LifecycleConfig) -> LifecycleResult<Self> {
    config.validate()?;
    Ok(Self { config })
  }

  pub fn config(&self) -> &LifecycleConfig {
    &self.config
  }

  /// Builds a new order.
  ///
  /// Pricing is fixed here and never recomputed. A zero-cost order has no
  /// outstanding payment: it goes through the settlement path as `Waived` and
  /// comes out `received`/`completed`. Anything with a price starts
  /// `pending`/`pending` and waits for [`record_settlement`](Self::record_settlement).
  #[instrument(
    name = "OrderLifecycle::create_order",
    skip_all,
    fields(customer_id = %request.customer_id, includes_device = request.includes_device)
  )]
  pub fn create_order(&self, request: NewOrder, now: DateTime<Utc>) -> Order {
    let total = total_cost_cents(
      request.includes_device,
      self.config.base_cost_cents,
      self.config.device_cost_cents,
    );

    let mut order = Order {
      id: OrderId::new(),
      customer_id: request.customer_id,
      merchant_id: request.merchant_id,
      includes_device: request.includes_device,
      device_cost_cents: self.config.device_cost_cents,
      total_cost_cents: total,
      stage: FulfillmentStage::Pending,
      payment: PaymentState::Pending,
      settlement: Settlement::Unpaid,
      address: request.address,
      created_at: now,
      delivered_at: None,
      estimated_delivery: None,
      audit_trail: AuditTrail::new(),
      proof: None,
      version: 0,
    };

    if total == 0 {
      self.apply_settlement(&mut order, &SettlementOutcome::Waived, now);
    }

    event!(
      Level::INFO,
      order_id = %order.id,
      total_cost_cents = total,
      stage = %order.stage,
      payment = %order.payment,
      "Order created."
    );
    order
  }

  /// Moves `order` to `target`, which must be its current stage (no-op) or
  /// the stage right after it. Fulfillment cannot move at all until payment
  /// has completed.
  #[instrument(
    name = "OrderLifecycle::advance",
    skip_all,
    fields(order_id = %order.id, from = %order.stage, to = %target),
    err(Display)
  )]
  pub fn advance(
    &self,
    order: &mut Order,
    target: FulfillmentStage,
    now: DateTime<Utc>,
  ) -> LifecycleResult<Transition> {
    let from = order.stage;
    if target == from {
      event!(Level::DEBUG, "Target equals current stage; nothing to do.");
      return Ok(Transition::Unchanged(from));
    }

    if !from.can_advance_to(target) || order.payment != PaymentState::Completed {
      event!(Level::WARN, payment = %order.payment, "Refusing fulfillment transition.");
      return Err(LifecycleError::InvalidTransition { from, to: target });
    }

    self.enter_stage(order, target, now);
    order.bump_version();
    event!(Level::INFO, "Order advanced.");
    Ok(Transition::Advanced { from, to: target })
  }

  /// Records the gateway outcome for `order`.
  ///
  /// Payment settles exactly once. A completed payment pulls a still-pending
  /// order into `received`.
  #[instrument(
    name = "OrderLifecycle::record_settlement",
    skip_all,
    fields(order_id = %order.id, payment = %order.payment),
    err(Display)
  )]
  pub fn record_settlement(
    &self,
    order: &mut Order,
    outcome: SettlementOutcome,
    now: DateTime<Utc>,
  ) -> LifecycleResult<()> {
    if order.payment.is_terminal() {
      event!(Level::WARN, "Payment already settled.");
      return Err(LifecycleError::AlreadySettled {
        order_id: order.id,
        payment: order.payment,
      });
    }

    self.apply_settlement(order, &outcome, now);
    order.bump_version();
    Ok(())
  }

  /// Attaches (or replaces) the delivery photo. Only delivered orders accept
  /// proof, and attaching it leaves the audit trail alone.
  #[instrument(
    name = "OrderLifecycle::attach_proof",
    skip_all,
    fields(order_id = %order.id, stage = %order.stage),
    err(Display)
  )]
  pub fn attach_proof(&self, order: &mut Order, proof: ProofReference) -> LifecycleResult<()> {
    if order.stage != FulfillmentStage::Delivered {
      event!(Level::WARN, "Proof rejected before delivery.");
      return Err(LifecycleError::InvalidState {
        order_id: order.id,
        stage: order.stage,
        action: "attach delivery proof",
      });
    }

    if order.proof.is_some() {
      event!(Level::INFO, "Replacing existing delivery proof.");
    }
    order.proof = Some(proof);
    order.bump_version();
    Ok(())
  }

  /// `created_at` plus the configured service window.
  pub fn estimate_delivery(&self, created_at: DateTime<Utc>) -> DateTime<Utc> {
    timing::estimate_delivery_within(created_at, self.config.service_window())
  }

  /// Whether `order` has missed its estimate as of `now`. Orders that have not
  /// been received yet carry no estimate and are never delayed.
  pub fn is_delayed(&self, order: &Order, now: DateTime<Utc>) -> bool {
    order
      .estimated_delivery
      .map_or(false, |estimate| timing::is_delayed(now, order.stage, estimate))
  }

  /// Severity of the delay, if `order` is delayed as of `now`.
  pub fn delay_severity(&self, order: &Order, now: DateTime<Utc>) -> Option<DelaySeverity> {
    if !self.is_delayed(order, now) {
      return None;
    }
    order
      .estimated_delivery
      .map(|estimate| DelaySeverity::classify(now, estimate))
  }

  /// Customer-facing delay notice, if `order` is delayed as of `now`.
  pub fn delay_message(&self, order: &Order, now: DateTime<Utc>) -> Option<String> {
    self.delay_severity(order, now).map(DelaySeverity::message)
  }

  // --- internals: mutate without validation or version bump ---

  fn apply_settlement(&self, order: &mut Order, outcome: &SettlementOutcome, now: DateTime<Utc>) {
    order.payment = outcome.payment_state();
    order.settlement = outcome.settlement();

    match outcome {
      SettlementOutcome::Failed { reference } => {
        event!(Level::WARN, gateway_reference = ?reference, "Payment failed.");
      }
      SettlementOutcome::Captured { reference } => {
        event!(Level::INFO, settlement_reference = %reference, "Payment captured.");
      }
      SettlementOutcome::Waived => {
        event!(Level::INFO, "Payment waived for zero-cost order.");
      }
    }

    if order.payment == PaymentState::Completed && order.stage == FulfillmentStage::Pending {
      self.enter_stage(order, FulfillmentStage::Received, now);
    }
  }

  fn enter_stage(&self, order: &mut Order, stage: FulfillmentStage, now: DateTime<Utc>) {
    order.stage = stage;

    if !order.audit_trail.record_once(stage, now) {
      event!(Level::DEBUG, stage = %stage, "Audit entry already present; keeping original.");
    }

    match stage {
      FulfillmentStage::Received if order.estimated_delivery.is_none() => {
        let estimate = self.estimate_delivery(order.created_at);
        event!(Level::DEBUG, estimated_delivery = %estimate, "Estimated delivery derived.");
        order.estimated_delivery = Some(estimate);
      }
      FulfillmentStage::Delivered if order.delivered_at.is_none() => {
        order.delivered_at = Some(now);
      }
      _ => {}
    }
  }
}

/// Whether `order` may appear in the owning customer's order history.
pub fn is_visible(order: &Order) -> bool {
  order.is_visible()
}
