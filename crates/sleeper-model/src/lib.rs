mod domain;
pub use domain::{Minutes, Preset, RawMinutes};
pub use domain::{TIMER_DEFAULT, TIMER_MAX, TIMER_MIN};

mod command;
pub use command::Command;

mod error;
pub use error::{ModelError, ModelResult};
