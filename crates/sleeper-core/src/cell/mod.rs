//! Single-slot hand-off between the controller and the timer worker.
//!
//! A monitor: one mutex-guarded [`CellState`] plus a condition variable.
//! The cell holds at most one unconsumed command; publishing overwrites it.
use std::time::Instant;

use parking_lot::{Condvar, Mutex};
use tracing::trace;

use sleeper_model::Command;

/// Sequence number stamped on every published command, starting at 1.
pub type CommandSeq = u64;

#[derive(Debug, Default)]
struct CellState {
    /// The worker has not consumed `latest` yet.
    pending: bool,
    /// Sticky: set by the first Shutdown, never cleared.
    shutdown_requested: bool,
    latest: Command,
    seq: CommandSeq,
}

/// Why [`SharedCommandCell::wait`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wake {
    /// A command was pending and has been consumed.
    Consumed { command: Command, seq: CommandSeq },
    /// The deadline passed with nothing pending.
    DeadlineReached,
}

#[derive(Debug, Default)]
pub(crate) struct SharedCommandCell {
    state: Mutex<CellState>,
    cond: Condvar,
}

impl SharedCommandCell {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Replace the latest command and wake the worker.
    ///
    /// An unconsumed previous command is dropped. Returns the sequence number
    /// assigned to `cmd`.
    pub(crate) fn publish(&self, cmd: Command) -> CommandSeq {
        let mut state = self.state.lock();
        if state.pending {
            trace!(superseded = ?state.latest, seq = state.seq, "unconsumed command superseded");
        }
        state.latest = cmd;
        state.pending = true;
        if cmd.is_shutdown() {
            state.shutdown_requested = true;
        }
        state.seq += 1;

        // signal while holding the lock
        self.cond.notify_one();
        state.seq
    }

    /// Block until a command is pending or `deadline` passes.
    ///
    /// `None` waits indefinitely. The pending flag is always checked before the
    /// deadline, under the same lock acquisition, so a command published before
    /// the worker declares expiry always wins. Once shutdown was requested the
    /// consumed command is reported as [`Command::Shutdown`] regardless of what
    /// was published last.
    pub(crate) fn wait(&self, deadline: Option<Instant>) -> Wake {
        let mut state = self.state.lock();
        loop {
            if state.pending {
                state.pending = false;
                let command = if state.shutdown_requested {
                    Command::Shutdown
                } else {
                    state.latest
                };
                return Wake::Consumed {
                    command,
                    seq: state.seq,
                };
            }

            match deadline {
                None => self.cond.wait(&mut state),
                Some(at) => {
                    if Instant::now() >= at {
                        return Wake::DeadlineReached;
                    }
                    // Spurious and timed-out wakeups both loop back to the pending check.
                    let _ = self.cond.wait_until(&mut state, at);
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.state.lock().pending
    }

    #[cfg(test)]
    pub(crate) fn is_shutdown_requested(&self) -> bool {
        self.state.lock().shutdown_requested
    }
}
