use crate::domain::{Minutes, RawMinutes};

/// Instruction handed from the controller to the timer worker.
///
/// `Arm` keeps the caller's raw value rather than a [`Minutes`]: the worker
/// validates it again and treats anything out of range as [`Command::Cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Start (or restart) the countdown.
    Arm(RawMinutes),
    /// Drop the active countdown, if any.
    #[default]
    Cancel,
    /// Stop the worker. Sticky once published.
    Shutdown,
}

impl Command {
    /// Builds an `Arm` command from an already validated value.
    pub fn arm(minutes: Minutes) -> Self {
        Command::Arm(minutes.into())
    }

    /// Returns the countdown this command configures, if any.
    ///
    /// Only an `Arm` with an in-range value yields `Some`.
    ///
    /// # Examples
    /// ```
    /// use sleeper_model::Command;
    ///
    /// assert_eq!(Command::Arm(30).armed().map(|m| m.get()), Some(30));
    /// assert_eq!(Command::Arm(0).armed(), None);
    /// assert_eq!(Command::Cancel.armed(), None);
    /// ```
    pub fn armed(&self) -> Option<Minutes> {
        match *self {
            Command::Arm(raw) => Minutes::new(raw).ok(),
            Command::Cancel | Command::Shutdown => None,
        }
    }

    #[inline]
    pub fn is_shutdown(&self) -> bool {
        matches!(self, Command::Shutdown)
    }
}
