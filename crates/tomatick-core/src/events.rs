use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every timer state change produces an Event.
/// The session fans them out to effect sinks; renderers may print them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// User jumped to another phase; any countdown in progress was dropped.
    ModeSwitched {
        from: Phase,
        to: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase ran out while running. Fired exactly once per expiry.
    PhaseCompleted {
        completed: Phase,
        next: Phase,
        completed_work_sessions: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Running flag after this event.
    pub fn running(&self) -> bool {
        matches!(self, Event::TimerStarted { .. })
    }

    pub fn is_expiry(&self) -> bool {
        matches!(self, Event::PhaseCompleted { .. })
    }

}
