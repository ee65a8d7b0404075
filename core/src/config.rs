// packtrack/src/config.rs

use crate::core::timing::SERVICE_WINDOW_HOURS;
use crate::error::{LifecycleError, LifecycleResult};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;

/// Default companion device price, in cents.
pub const DEFAULT_DEVICE_COST_CENTS: u32 = 4_900;

/// Starter packs themselves are free; only the device costs money.
pub const DEFAULT_BASE_COST_CENTS: u32 = 0;

/// Longest service window accepted, one year.
pub const MAX_SERVICE_WINDOW_HOURS: i64 = 24 * 365;

/// Tunables for [`OrderLifecycle`](crate::lifecycle::OrderLifecycle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
  pub service_window_hours: i64,
  pub base_cost_cents: u32,
  pub device_cost_cents: u32,
}

impl Default for LifecycleConfig {
  fn default() -> Self {
    Self {
      service_window_hours: SERVICE_WINDOW_HOURS,
      base_cost_cents: DEFAULT_BASE_COST_CENTS,
      device_cost_cents: DEFAULT_DEVICE_COST_CENTS,
    }
  }
}

impl LifecycleConfig {
  /// Reads `PACKTRACK_*` variables (loading `.env` if present). Unset variables
  /// keep their defaults; malformed ones are a configuration error.
  pub fn from_env() -> LifecycleResult<Self> {
    dotenvy::dotenv().ok();

    let defaults = Self::default();
    let config = Self {
      service_window_hours: parse_var("PACKTRACK_SERVICE_WINDOW_HOURS", defaults.service_window_hours)?,
      base_cost_cents: parse_var("PACKTRACK_BASE_COST_CENTS", defaults.base_cost_cents)?,
      device_cost_cents: parse_var("PACKTRACK_DEVICE_COST_CENTS", defaults.device_cost_cents)?,
    };
    config.validate()?;

    tracing::info!(
      service_window_hours = config.service_window_hours,
      base_cost_cents = config.base_cost_cents,
      device_cost_cents = config.device_cost_cents,
      "Lifecycle configuration loaded."
    );
    Ok(config)
  }

  pub fn validate(&self) -> LifecycleResult<()> {
    if self.service_window_hours <= 0 {
      return Err(LifecycleError::Configuration {
        message: format!(
          "service window must be a positive number of hours, got {}",
          self.service_window_hours
        ),
      });
    }
    if self.service_window_hours > MAX_SERVICE_WINDOW_HOURS {
      return Err(LifecycleError::Configuration {
        message: format!(
          "service window must be at most {} hours, got {}",
          MAX_SERVICE_WINDOW_HOURS, self.service_window_hours
        ),
      });
    }
    Ok(())
  }

  /// The configured window. Out-of-range values (only possible on a config
  /// that skipped [`validate`](Self::validate)) are clamped into range.
  pub fn service_window(&self) -> Duration {
    Duration::hours(self.service_window_hours.clamp(1, MAX_SERVICE_WINDOW_HOURS))
  }
}

fn parse_var<T>(name: &str, default: T) -> LifecycleResult<T>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  match env::var(name) {
    Ok(raw) => raw.trim().parse::<T>().map_err(|e| LifecycleError::Configuration {
      message: format!("Invalid {}: {}", name, e),
    }),
    Err(env::VarError::NotPresent) => Ok(default),
    Err(e) => Err(LifecycleError::Configuration {
      message: format!("Unreadable environment variable '{}': {}", name, e),
    }),
  }
}
