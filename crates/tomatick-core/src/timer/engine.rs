//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` once per
//! elapsed second while the timer is running (see [`crate::ticker::Ticker`]).
//!
//! ## State Transitions
//!
//! ```text
//!            start            tick (remaining hits 0)
//! Stopped ----------> Running -----------------------> Stopped (next phase)
//!    ^                   |
//!    +--- pause/reset ---+
//!    +--- switch_mode ---+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerSettings::default());
//! engine.start();
//! // Once per second:
//! engine.tick(); // Returns Some(Event::PhaseCompleted) when the phase expires
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Phase, TimerSettings};
use crate::events::Event;

/// Read-only view of the engine handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub remaining_secs: u64,
    /// `remaining_secs` formatted as `MM:SS`.
    pub display: String,
    pub running: bool,
    pub completed_work_sessions: u32,
}

/// Core timer engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    settings: TimerSettings,
    phase: Phase,
    remaining_secs: u64,
    running: bool,
    completed_work_sessions: u32,
}

impl TimerEngine {
    /// Create a stopped engine in the work phase with a full countdown.
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            settings,
            phase: Phase::Work,
            remaining_secs: settings.duration_secs(Phase::Work),
            running: false,
            completed_work_sessions: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    pub fn total_secs(&self) -> u64 {
        self.settings.duration_secs(self.phase)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            display: format_clock(self.remaining_secs),
            running: self.running,
            completed_work_sessions: self.completed_work_sessions,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Returns `None` when already running or when there is no time left.
    pub fn start(&mut self) -> Option<Event> {
        if self.running || self.remaining_secs == 0 {
            return None;
        }
        self.running = true;
        debug!(phase = %self.phase, remaining = self.remaining_secs, "timer started");
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Returns `None` when the timer was not running.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        debug!(phase = %self.phase, remaining = self.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Restore the full countdown of the current phase.
    pub fn reset(&mut self) -> Event {
        self.running = false;
        self.remaining_secs = self.total_secs();
        debug!(phase = %self.phase, "timer reset");
        Event::TimerReset {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Jump to `target`, abandoning any countdown in progress.
    ///
    /// An abandoned work phase never counts as a completed session.
    pub fn switch_mode(&mut self, target: Phase) -> Event {
        let from = self.phase;
        self.running = false;
        self.phase = target;
        self.remaining_secs = self.total_secs();
        debug!(%from, to = %target, "mode switched");
        Event::ModeSwitched {
            from,
            to: target,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Advance one second. Returns `Some(Event::PhaseCompleted)` when the
    /// countdown reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running || self.remaining_secs == 0 {
            return None;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            return Some(self.expire());
        }
        None
    }

    /// Replace the phase lengths used by future (re)initializations.
    /// The countdown in progress keeps its remaining time.
    pub fn set_settings(&mut self, settings: TimerSettings) {
        self.settings = settings;
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Composite expiry transition. Only reachable from `tick()`.
    fn expire(&mut self) -> Event {
        self.running = false;
        let completed = self.phase;
        let next = match completed {
            Phase::Work => {
                self.completed_work_sessions = self.completed_work_sessions.saturating_add(1);
                self.settings.break_after(self.completed_work_sessions)
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        };
        self.phase = next;
        self.remaining_secs = self.total_secs();
        info!(
            %completed,
            %next,
            sessions = self.completed_work_sessions,
            "phase completed"
        );
        Event::PhaseCompleted {
            completed,
            next,
            completed_work_sessions: self.completed_work_sessions,
            at: Utc::now(),
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}

/// Format seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
