//! Timer range constants.

/// Smallest timer value, in minutes.
pub const TIMER_MIN: u16 = 1;

/// Largest timer value, in minutes.
pub const TIMER_MAX: u16 = 999;

/// Value used by the adjustable entry point when the supplied value is unusable.
pub const TIMER_DEFAULT: u16 = 60;
