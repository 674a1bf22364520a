//! Host-facing lifecycle wrapper.
//!
//! Maps the host's activate/deactivate hooks onto a [`TimerController`].
//! Each activation builds a new command cell and worker; nothing is global.
use std::fmt;

use tracing::{info, instrument};

use crate::{
    config::TimerConfig,
    controller::{CommandSeq, TimerController},
    error::TimerError,
    expiry::ExpiryHandle,
    worker::TimerStatus,
};
use sleeper_model::{Preset, RawMinutes};

/// Timer plugin with strictly paired activation and deactivation.
pub struct TimerPlugin {
    config: TimerConfig,
    expiry: ExpiryHandle,
    controller: Option<TimerController>,
}

impl TimerPlugin {
    /// Create an inactive plugin.
    pub fn new(config: TimerConfig, expiry: ExpiryHandle) -> Self {
        Self {
            config,
            expiry,
            controller: None,
        }
    }

    /// Spawn the worker. Fails if already active or if the thread cannot be created.
    #[instrument(level = "debug", skip(self))]
    pub fn on_activate(&mut self) -> Result<(), TimerError> {
        if self.controller.is_some() {
            return Err(TimerError::AlreadyActive);
        }
        let controller = TimerController::spawn(&self.config, self.expiry.clone())?;
        self.controller = Some(controller);
        info!("timer plugin activated");
        Ok(())
    }

    /// Shut the worker down and wait for it. Returns its final status.
    #[instrument(level = "debug", skip(self))]
    pub fn on_deactivate(&mut self) -> Result<TimerStatus, TimerError> {
        let controller = self.controller.take().ok_or(TimerError::NotActive)?;
        let status = controller.shutdown_and_join()?;
        info!(state = ?status.state, "timer plugin deactivated");
        Ok(status)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.controller.is_some()
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Fixed entries this plugin offers.
    pub fn presets(&self) -> &[Preset] {
        &self.config.presets
    }

    /// Active controller, if any.
    pub fn controller(&self) -> Option<&TimerController> {
        self.controller.as_ref()
    }

    pub fn arm(&mut self, minutes: RawMinutes) -> Result<CommandSeq, TimerError> {
        self.active()?.arm(minutes)
    }

    pub fn arm_or_default(&mut self, minutes: RawMinutes) -> Result<CommandSeq, TimerError> {
        Ok(self.active()?.arm_or_default(minutes))
    }

    pub fn arm_preset(&mut self, preset: Preset) -> Result<CommandSeq, TimerError> {
        Ok(self.active()?.arm_preset(preset))
    }

    pub fn cancel(&mut self) -> Result<CommandSeq, TimerError> {
        Ok(self.active()?.cancel())
    }

    pub fn status(&self) -> Result<TimerStatus, TimerError> {
        self.controller
            .as_ref()
            .map(TimerController::status)
            .ok_or(TimerError::NotActive)
    }

    fn active(&mut self) -> Result<&mut TimerController, TimerError> {
        self.controller.as_mut().ok_or(TimerError::NotActive)
    }
}

impl fmt::Debug for TimerPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerPlugin")
            .field("config", &self.config)
            .field("expiry", &"<handle>")
            .field("controller", &self.controller)
            .finish()
    }
}
