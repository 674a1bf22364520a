use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::Minutes;
use crate::error::ModelError;

/// A fixed timer entry offered by the host's menu.
///
/// Rendered and parsed as `"<minutes>m"`, e.g. `"30m"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct Preset(Minutes);

impl Preset {
    /// Entries shown when no custom list is configured.
    pub const DEFAULTS: [Preset; 4] = [
        Preset(Minutes::const_new(30)),
        Preset(Minutes::const_new(60)),
        Preset(Minutes::const_new(90)),
        Preset(Minutes::const_new(120)),
    ];

    pub fn new(minutes: Minutes) -> Self {
        Self(minutes)
    }

    #[inline]
    pub fn minutes(&self) -> Minutes {
        self.0
    }
}

impl FromStr for Preset {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidPreset(s.to_string());

        let digits = s.trim().strip_suffix('m').ok_or_else(invalid)?;
        if digits.is_empty() || digits.len() > 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let raw: i64 = digits.parse().map_err(|_| invalid())?;
        Minutes::new(raw).map(Self).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Preset {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Preset> for String {
    fn from(p: Preset) -> Self {
        p.to_string()
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
