// packtrack/src/core/timing.rs

//! Delivery SLA derivation and delay classification.
//!
//! Everything here is a pure function of its arguments. Callers pass their own
//! `now`, so polling UIs and tests drive the same code without timers.

use crate::core::stage::FulfillmentStage;
use chrono::{DateTime, Duration, Utc};

/// Hours in the fixed delivery service window.
pub const SERVICE_WINDOW_HOURS: i64 = 9;

/// The fixed delivery service window.
pub fn service_window() -> Duration {
  Duration::hours(SERVICE_WINDOW_HOURS)
}

/// `created_at` plus the fixed 9-hour service window.
pub fn estimate_delivery(created_at: DateTime<Utc>) -> DateTime<Utc> {
  estimate_delivery_within(created_at, service_window())
}

/// Same as [`estimate_delivery`], for a configured window. Saturates at
/// `DateTime::<Utc>::MAX_UTC` instead of overflowing.
pub fn estimate_delivery_within(created_at: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
  created_at
    .checked_add_signed(window)
    .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Whether the order has missed its estimate.
///
/// Always false once the package is out for delivery or delivered.
pub fn is_delayed(now: DateTime<Utc>, stage: FulfillmentStage, estimated_delivery: DateTime<Utc>) -> bool {
  if stage.is_in_customer_hands() {
    return false;
  }
  now > estimated_delivery
}

/// How badly an order is running late.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelaySeverity {
  /// Less than one hour past the estimate.
  Minor,
  /// Between one and three hours past; carries the whole hours elapsed.
  Moderate { hours: i64 },
  /// Three hours or more; handled as an operational incident.
  Escalated,
}

impl DelaySeverity {
  /// Classifies the time elapsed past `estimated_delivery`. A `now` at or
  /// before the estimate counts as zero elapsed.
  pub fn classify(now: DateTime<Utc>, estimated_delivery: DateTime<Utc>) -> Self {
    let elapsed_hours = (now - estimated_delivery).num_hours().max(0);
    match elapsed_hours {
      0 => DelaySeverity::Minor,
      1 | 2 => DelaySeverity::Moderate { hours: elapsed_hours },
      _ => DelaySeverity::Escalated,
    }
  }

  pub fn message(self) -> String {
    match self {
      DelaySeverity::Minor => "Sorry, your order is running a little behind schedule. It should arrive shortly.".to_string(),
      DelaySeverity::Moderate { hours } => {
        let unit = if hours == 1 { "hour" } else { "hours" };
        format!("Sorry, your order is delayed by approximately {} {}.", hours, unit)
      }
      DelaySeverity::Escalated => {
        "Your order is taking much longer than expected. Please contact support so we can look into it.".to_string()
      }
    }
  }
}

/// Customer-facing delay notice for an order past `estimated_delivery`.
pub fn delay_message(now: DateTime<Utc>, estimated_delivery: DateTime<Utc>) -> String {
  DelaySeverity::classify(now, estimated_delivery).message()
}
