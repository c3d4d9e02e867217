use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One of the three timer modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[serde(rename = "pomodoro")]
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Work => "Pomodoro",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Phase {
    type Err = ValidationError;

    /// Accepts the serialized names plus the short forms typed at the prompt.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pomodoro" | "work" | "focus" | "w" => Ok(Phase::Work),
            "shortbreak" | "short_break" | "short-break" | "short" | "sb" => Ok(Phase::ShortBreak),
            "longbreak" | "long_break" | "long-break" | "long" | "lb" => Ok(Phase::LongBreak),
            other => Err(ValidationError::InvalidValue {
                field: "phase".into(),
                message: format!("unknown phase '{other}' (expected pomodoro, short or long)"),
            }),
        }
    }
}
