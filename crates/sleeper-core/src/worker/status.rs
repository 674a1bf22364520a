use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::cell::CommandSeq;
use sleeper_model::Minutes;

/// State of the timer worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// No countdown; the worker waits for a command.
    Idle,
    /// Counting down towards `deadline`.
    Armed { minutes: Minutes, deadline: Instant },
    /// The deadline was reached and the expiry action was invoked. Terminal.
    Fired,
    /// The worker observed Shutdown and exited. Terminal.
    Terminated,
}

impl TimerState {
    /// Returns `true` once the worker has exited (or is about to).
    #[inline]
    pub fn is_final(&self) -> bool {
        matches!(self, TimerState::Fired | TimerState::Terminated)
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        matches!(self, TimerState::Armed { .. })
    }
}

/// Snapshot of the worker after its last transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerStatus {
    pub state: TimerState,
    /// Sequence number of the last command the worker consumed; 0 before the first.
    pub applied: CommandSeq,
}

impl Default for TimerStatus {
    fn default() -> Self {
        Self {
            state: TimerState::Idle,
            applied: 0,
        }
    }
}

/// Worker-written, controller-read status with change notification.
#[derive(Debug, Default)]
pub(crate) struct StatusBoard {
    status: Mutex<TimerStatus>,
    changed: Condvar,
}

impl StatusBoard {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&self, status: TimerStatus) {
        *self.status.lock() = status;
        self.changed.notify_all();
    }

    pub(crate) fn snapshot(&self) -> TimerStatus {
        *self.status.lock()
    }

    /// Wait until the worker applied `seq` (or a later command), exited, or `timeout` elapsed.
    pub(crate) fn wait_applied(&self, seq: CommandSeq, timeout: Duration) -> TimerStatus {
        let until = Instant::now() + timeout;
        let mut status = self.status.lock();
        while status.applied < seq && !status.state.is_final() {
            if self.changed.wait_until(&mut status, until).timed_out() {
                break;
            }
        }
        *status
    }
}
