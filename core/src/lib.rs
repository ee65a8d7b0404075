// src/lib.rs

//! packtrack: the fulfillment lifecycle engine for starter-pack orders.
//!
//! An order moves along one fixed pipeline
//! (`pending → received → preparing → configuring → out_for_delivery → delivered`)
//! while an independent payment axis settles exactly once. On top of that the
//! crate provides:
//!  - Monotonic, one-step-at-a-time stage transitions with an append-only audit trail.
//!  - Payment settlement with an explicit `Unpaid | Waived | Captured` settlement record.
//!  - Delivery SLA estimation and pure, caller-clocked delay classification.
//!  - Delivery-proof capture gated on the `delivered` stage.
//!  - An async `OrderStore` seam with compare-and-swap saves, an in-memory
//!    implementation, and a `FulfillmentService` that ties the two together.

pub mod config;
pub mod core;
pub mod error;
pub mod lifecycle;
pub mod service;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::core::order::{AuditTrail, CustomerId, DeliveryAddress, MerchantId, Order, OrderId, ProofReference};
pub use crate::core::payment::{PaymentState, Settlement, SettlementOutcome};
pub use crate::core::stage::{selectable_stages, stage_index, FulfillmentStage, UnknownStage};
pub use crate::core::timing::{delay_message, estimate_delivery, is_delayed, DelaySeverity, SERVICE_WINDOW_HOURS};

pub use crate::config::{LifecycleConfig, MAX_SERVICE_WINDOW_HOURS};
pub use crate::error::{LifecycleError, LifecycleResult};
pub use crate::lifecycle::{is_visible, NewOrder, OrderLifecycle, Transition};
pub use crate::service::FulfillmentService;
pub use crate::store::{InMemoryOrderStore, OrderStore};

/*
    Typical flow:
    1. Build an `OrderLifecycle` (defaults, or `LifecycleConfig::from_env()`).
    2. Wrap it with your `OrderStore` in a `FulfillmentService`.
    3. `place_order` at checkout. Free orders come back `received`; paid ones
       stay `pending` until the gateway answers.
    4. Feed the gateway result to `record_settlement`.
    5. Operators step the order forward with `advance`, passing the version
       their screen was rendered from.
    6. Once `delivered`, `attach_proof` with the doorstep photo.
    7. Poll-free delay checks: `is_delayed` / `delay_message` with your own `now`.
*/
