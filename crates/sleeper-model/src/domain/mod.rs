mod constants;
pub use constants::{TIMER_DEFAULT, TIMER_MAX, TIMER_MIN};

mod minutes;
pub use minutes::Minutes;

mod preset;
pub use preset::Preset;

/// Unvalidated timer value in minutes, as supplied by a caller.
///
/// Anything outside `TIMER_MIN..=TIMER_MAX` means "no active timer".
pub type RawMinutes = i64;
