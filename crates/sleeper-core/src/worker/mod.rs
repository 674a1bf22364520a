//! Timer worker: the background loop that owns the deadline.
//!
//! States: `Idle` (blocked without deadline), `Armed` (blocked until the
//! deadline or a new command), and the terminal `Fired` / `Terminated`.
//! Every consumed command fully replaces the previous configuration.
mod status;
pub use status::{TimerState, TimerStatus};
pub(crate) use status::StatusBoard;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{debug, info, warn};

use crate::{
    cell::{CommandSeq, SharedCommandCell, Wake},
    expiry::ExpiryHandle,
};
use sleeper_model::Command;

/// Background half of the timer. Consumed by [`TimerWorker::run`].
pub(crate) struct TimerWorker {
    cell: Arc<SharedCommandCell>,
    status: Arc<StatusBoard>,
    expiry: ExpiryHandle,
    minute: Duration,
}

impl TimerWorker {
    pub(crate) fn new(
        cell: Arc<SharedCommandCell>,
        status: Arc<StatusBoard>,
        expiry: ExpiryHandle,
        minute: Duration,
    ) -> Self {
        Self {
            cell,
            status,
            expiry,
            minute,
        }
    }

    /// Run until Shutdown is observed or the armed deadline is reached.
    pub(crate) fn run(self) {
        debug!(minute_ms = self.minute.as_millis() as u64, "timer worker started");

        let mut state = TimerState::Idle;
        let mut applied: CommandSeq = 0;

        loop {
            let deadline = match state {
                TimerState::Armed { deadline, .. } => Some(deadline),
                _ => None,
            };

            match self.cell.wait(deadline) {
                Wake::Consumed { command, seq } => {
                    applied = seq;
                    state = self.apply(command, state);
                    self.status.set(TimerStatus { state, applied });

                    if state.is_final() {
                        info!("timer worker terminated");
                        return;
                    }
                }
                Wake::DeadlineReached => {
                    self.status.set(TimerStatus {
                        state: TimerState::Fired,
                        applied,
                    });
                    info!("timer expired, invoking expiry action");
                    self.expiry.on_expiry();
                    return;
                }
            }
        }
    }

    /// Compute the state that follows `command`.
    fn apply(&self, command: Command, current: TimerState) -> TimerState {
        debug!(?command, from = ?current, "command consumed");

        match command {
            Command::Shutdown => TimerState::Terminated,
            Command::Cancel => {
                if current.is_armed() {
                    info!("timer cancelled");
                }
                TimerState::Idle
            }
            Command::Arm(raw) => match command.armed() {
                Some(minutes) => {
                    let deadline = Instant::now() + minutes.as_duration(self.minute);
                    info!(%minutes, "timer armed");
                    TimerState::Armed { minutes, deadline }
                }
                None => {
                    warn!(minutes = raw, "out-of-range timer value treated as cancel");
                    TimerState::Idle
                }
            },
        }
    }
}
