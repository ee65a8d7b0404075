pub mod order;
pub mod payment;
pub mod stage;
pub mod timing;

// Re-export key types for easier access from other modules (and lib.rs)
pub use order::{AuditTrail, CustomerId, DeliveryAddress, MerchantId, Order, OrderId, ProofReference};
pub use payment::{PaymentState, Settlement, SettlementOutcome};
pub use stage::{selectable_stages, stage_index, FulfillmentStage, UnknownStage};
pub use timing::{delay_message, estimate_delivery, is_delayed, DelaySeverity};
