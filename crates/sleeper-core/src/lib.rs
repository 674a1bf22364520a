pub mod config;
pub mod controller;
pub mod error;
pub mod expiry;
pub mod plugin;
pub mod worker;

mod cell;

pub use config::TimerConfig;
pub use controller::{CommandSeq, TimerController};
pub use error::TimerError;
pub use expiry::{ExpiryAction, ExpiryHandle, NoOpExpiry, expiry_fn, noop_expiry};
pub use plugin::TimerPlugin;
pub use worker::{TimerState, TimerStatus};

pub mod prelude {
    pub use crate::config::TimerConfig;
    pub use crate::controller::TimerController;
    pub use crate::error::TimerError;
    pub use crate::expiry::{ExpiryAction, ExpiryHandle};
    pub use crate::plugin::TimerPlugin;
    pub use crate::worker::{TimerState, TimerStatus};
}
