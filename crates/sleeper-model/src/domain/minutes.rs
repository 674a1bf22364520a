use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

use super::{RawMinutes, TIMER_DEFAULT, TIMER_MAX, TIMER_MIN};
use crate::error::{ModelError, ModelResult};

/// Timer value in whole minutes, guaranteed to be within `TIMER_MIN..=TIMER_MAX`.
///
/// The length of a "minute" is not fixed here: [`Minutes::as_duration`] takes
/// the unit so that callers (and tests) can scale it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMinutes")]
#[serde(into = "RawMinutes")]
pub struct Minutes(u16);

impl Minutes {
    /// Validates a raw value.
    ///
    /// # Examples
    /// ```
    /// use sleeper_model::Minutes;
    ///
    /// assert_eq!(Minutes::new(30).unwrap().get(), 30);
    /// assert!(Minutes::new(0).is_err());
    /// assert!(Minutes::new(1000).is_err());
    /// ```
    pub fn new(raw: RawMinutes) -> ModelResult<Self> {
        if Self::in_range(raw) {
            Ok(Self(raw as u16))
        } else {
            Err(ModelError::OutOfRange(raw))
        }
    }

    /// Compile-time constructor for built-in values.
    pub(crate) const fn const_new(raw: u16) -> Self {
        assert!(raw >= TIMER_MIN && raw <= TIMER_MAX);
        Self(raw)
    }

    /// Validates a raw value, substituting [`TIMER_DEFAULT`] when it is out of range.
    pub fn or_default(raw: RawMinutes) -> Self {
        Self::new(raw).unwrap_or_default()
    }

    /// Returns `true` if `raw` would be accepted by [`Minutes::new`].
    #[inline]
    pub fn in_range(raw: RawMinutes) -> bool {
        (TIMER_MIN as RawMinutes..=TIMER_MAX as RawMinutes).contains(&raw)
    }

    #[inline]
    pub fn get(self) -> u16 {
        self.0
    }

    /// Total span of this value when one minute lasts `unit`.
    pub fn as_duration(self, unit: Duration) -> Duration {
        unit * u32::from(self.0)
    }
}

impl Default for Minutes {
    fn default() -> Self {
        Self(TIMER_DEFAULT)
    }
}

impl TryFrom<RawMinutes> for Minutes {
    type Error = ModelError;
    fn try_from(raw: RawMinutes) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<Minutes> for RawMinutes {
    fn from(m: Minutes) -> Self {
        RawMinutes::from(m.0)
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}
