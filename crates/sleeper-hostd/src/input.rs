use std::str::FromStr;

use sleeper_model::{Preset, RawMinutes};

/// One line typed into the host, mapped onto a timer operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostInput {
    /// `<n>m`: fixed menu entry.
    Preset(Preset),
    /// `set <n>`: adjustable entry; out-of-range values fall back to the default.
    Set(RawMinutes),
    Cancel,
    Status,
    Help,
    Quit,
}

impl FromStr for HostInput {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim().to_ascii_lowercase();
        let mut words = line.split_whitespace();

        let input = match (words.next(), words.next()) {
            (Some("cancel"), None) => HostInput::Cancel,
            (Some("status"), None) => HostInput::Status,
            (Some("help" | "?"), None) => HostInput::Help,
            (Some("quit" | "exit"), None) => HostInput::Quit,
            (Some("set"), Some(value)) => value
                .parse()
                .map(HostInput::Set)
                .map_err(|_| format!("not a number: {value}"))?,
            (Some(label), None) if label.ends_with('m') => label
                .parse()
                .map(HostInput::Preset)
                .map_err(|e| e.to_string())?,
            _ => return Err(format!("unknown input: {}", s.trim())),
        };

        if words.next().is_some() {
            return Err(format!("unexpected trailing input: {}", s.trim()));
        }
        Ok(input)
    }
}
