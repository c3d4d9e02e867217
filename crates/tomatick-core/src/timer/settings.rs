use serde::{Deserialize, Serialize};

use super::Phase;

/// Phase lengths the engine uses whenever it (re)initializes the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    /// Work length in minutes.
    pub pomodoro_min: u32,
    pub short_break_min: u32,
    pub long_break_min: u32,
    /// Every N-th completed work session is followed by a long break.
    pub long_break_interval: u32,
}

impl TimerSettings {
    pub fn duration_min(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.pomodoro_min,
            Phase::ShortBreak => self.short_break_min,
            Phase::LongBreak => self.long_break_min,
        }
    }

    /// Phase length in seconds.
    ///
    /// Uses saturating arithmetic so oversized values never wrap.
    pub fn duration_secs(&self, phase: Phase) -> u64 {
        u64::from(self.duration_min(phase)).saturating_mul(60)
    }

    /// Break that follows the `completed`-th work session (1-indexed).
    pub fn break_after(&self, completed: u32) -> Phase {
        // An interval of zero would divide by zero; treat it as "every session".
        let interval = self.long_break_interval.max(1);
        if completed % interval == 0 {
            Phase::LongBreak
        } else {
            Phase::ShortBreak
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            pomodoro_min: 25,
            short_break_min: 5,
            long_break_min: 15,
            long_break_interval: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_durations() {
        let s = TimerSettings::default();
        assert_eq!(s.duration_secs(Phase::Work), 1500);
        assert_eq!(s.duration_secs(Phase::ShortBreak), 300);
        assert_eq!(s.duration_secs(Phase::LongBreak), 900);
    }

    #[test]
    fn every_fourth_session_earns_a_long_break() {
        let s = TimerSettings::default();
        let breaks: Vec<Phase> = (1..=8).map(|k| s.break_after(k)).collect();
        assert_eq!(
            breaks,
            vec![
                Phase::ShortBreak,
                Phase::ShortBreak,
                Phase::ShortBreak,
                Phase::LongBreak,
                Phase::ShortBreak,
                Phase::ShortBreak,
                Phase::ShortBreak,
                Phase::LongBreak,
            ]
        );
    }

    #[test]
    fn zero_interval_does_not_panic() {
        let s = TimerSettings {
            long_break_interval: 0,
            ..TimerSettings::default()
        };
        assert_eq!(s.break_after(3), Phase::LongBreak);
    }
}
