use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TimerError;
use sleeper_model::Preset;

/// Length of a timer minute, in milliseconds.
pub const DEFAULT_MINUTE_MS: u64 = 60_000;

/// Upper bound for `minute_ms`; keeps `minute * TIMER_MAX` far from `Instant` overflow.
pub const MAX_MINUTE_MS: u64 = 86_400_000;

/// Name given to the worker thread.
pub const DEFAULT_THREAD_NAME: &str = "sleeper-timer";

/// Timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Length of one timer minute in milliseconds.
    pub minute_ms: u64,
    /// Name of the worker thread.
    pub thread_name: String,
    /// Fixed entries offered by the host.
    pub presets: Vec<Preset>,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            minute_ms: DEFAULT_MINUTE_MS,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            presets: Preset::DEFAULTS.to_vec(),
        }
    }
}

impl TimerConfig {
    /// Real length of one timer minute.
    #[inline]
    pub fn minute(&self) -> Duration {
        Duration::from_millis(self.minute_ms)
    }

    /// Checks values that cannot be expressed in the types alone.
    ///
    /// Called by [`crate::TimerController::spawn`] before the worker starts.
    pub fn validate(&self) -> Result<(), TimerError> {
        if self.minute_ms == 0 || self.minute_ms > MAX_MINUTE_MS {
            return Err(TimerError::InvalidConfig(format!(
                "minute_ms must be within 1..={MAX_MINUTE_MS}, got {}",
                self.minute_ms
            )));
        }
        if self.thread_name.is_empty() {
            return Err(TimerError::InvalidConfig("thread_name must not be empty".into()));
        }
        Ok(())
    }
}
