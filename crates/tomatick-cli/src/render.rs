//! Line-oriented rendering of timer snapshots, events and tasks.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tomatick_core::{format_clock, Config, Event, TaskList, TimerSnapshot};

use crate::input::HELP;

const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
const CLEAR_LINE: &str = "\r\x1b[2K";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Human-readable lines. `live` rewrites the countdown in place.
    Text { live: bool },
    /// One JSON object per line.
    Json,
}

pub struct Renderer<W> {
    out: W,
    mode: Mode,
    animation: Arc<AtomicBool>,
    frame: usize,
    /// A countdown line without newline is on screen.
    pending_line: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, mode: Mode, animation: Arc<AtomicBool>) -> Self {
        Self {
            out,
            mode,
            animation,
            frame: 0,
            pending_line: false,
        }
    }

    pub fn banner(&mut self, config: &Config) -> io::Result<()> {
        if self.mode == Mode::Json {
            return Ok(());
        }
        let t = &config.timer;
        self.line(format_args!(
            "tomatick: pomodoro {}m, short break {}m, long break {}m every {} sessions. type 'help' for commands.",
            t.pomodoro, t.short_break, t.long_break, t.long_break_interval
        ))
    }

    pub fn status(&mut self, snap: &TimerSnapshot) -> io::Result<()> {
        match self.mode {
            Mode::Json => self.json("snapshot", snap),
            Mode::Text { .. } => {
                let text = self.status_text(snap);
                self.line(text)
            }
        }
    }

    /// Called once per tick while running.
    pub fn countdown(&mut self, snap: &TimerSnapshot) -> io::Result<()> {
        if self.animation.load(Ordering::Relaxed) {
            self.frame = (self.frame + 1) % FRAMES.len();
        }
        match self.mode {
            Mode::Json => self.json("snapshot", snap),
            Mode::Text { live: true } => {
                let text = self.status_text(snap);
                write!(self.out, "{CLEAR_LINE}{text}")?;
                self.pending_line = true;
                self.out.flush()
            }
            Mode::Text { live: false } => {
                if snap.remaining_secs % 60 == 0 {
                    self.status(snap)
                } else {
                    Ok(())
                }
            }
        }
    }

    pub fn event(&mut self, event: &Event) -> io::Result<()> {
        if self.mode == Mode::Json {
            return self.json_raw(event);
        }
        match event {
            Event::TimerStarted {
                phase,
                remaining_secs,
                ..
            } => self.line(format_args!("started {phase} at {}", format_clock(*remaining_secs))),
            Event::TimerPaused {
                phase,
                remaining_secs,
                ..
            } => self.line(format_args!("paused {phase} at {}", format_clock(*remaining_secs))),
            Event::TimerReset {
                phase,
                remaining_secs,
                ..
            } => self.line(format_args!("reset {phase} to {}", format_clock(*remaining_secs))),
            Event::ModeSwitched {
                to, remaining_secs, ..
            } => self.line(format_args!("switched to {to} ({})", format_clock(*remaining_secs))),
            Event::PhaseCompleted {
                completed,
                next,
                completed_work_sessions,
                ..
            } => self.line(format_args!(
                "{completed} complete! sessions: {completed_work_sessions}. next: {next}. type 'start' to begin."
            )),
        }
    }

    pub fn tasks(&mut self, tasks: &TaskList) -> io::Result<()> {
        if self.mode == Mode::Json {
            let list: Vec<_> = tasks.iter().collect();
            return self.json("tasks", &serde_json::json!({ "tasks": list }));
        }
        if tasks.is_empty() {
            return self.line("no tasks");
        }
        for (i, task) in tasks.iter().enumerate() {
            let mark = if task.completed { 'x' } else { ' ' };
            self.line(format_args!("{:>3}. [{mark}] {}", i + 1, task.text))?;
        }
        self.line(format_args!("{} of {} open", tasks.remaining(), tasks.len()))
    }

    pub fn settings(&mut self, config: &Config) -> io::Result<()> {
        if self.mode == Mode::Json {
            return self.json("settings", config);
        }
        let text = toml::to_string_pretty(config).map_err(io::Error::other)?;
        for l in text.lines().filter(|l| !l.is_empty()) {
            self.line(l)?;
        }
        Ok(())
    }

    pub fn notice(&mut self, message: &str) -> io::Result<()> {
        match self.mode {
            Mode::Json => self.json("notice", &serde_json::json!({ "message": message })),
            Mode::Text { .. } => self.line(message),
        }
    }

    pub fn error(&mut self, error: &dyn Display) -> io::Result<()> {
        match self.mode {
            Mode::Json => self.json(
                "error",
                &serde_json::json!({ "message": error.to_string() }),
            ),
            Mode::Text { .. } => self.line(format_args!("error: {error}")),
        }
    }

    pub fn help(&mut self) -> io::Result<()> {
        if self.mode == Mode::Json {
            return self.json("notice", &serde_json::json!({ "message": HELP }));
        }
        for l in HELP.lines() {
            self.line(l)?;
        }
        Ok(())
    }

    fn status_text(&self, snap: &TimerSnapshot) -> String {
        let (marker, state) = if snap.running {
            (FRAMES[self.frame], "running")
        } else {
            ('-', "stopped")
        };
        format!(
            "{marker} [{}] {} {state}, sessions: {}",
            snap.phase, snap.display, snap.completed_work_sessions
        )
    }

    fn line(&mut self, text: impl Display) -> io::Result<()> {
        if self.pending_line {
            write!(self.out, "{CLEAR_LINE}")?;
            self.pending_line = false;
        }
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    /// Serialize `value` with a `type` field added.
    fn json(&mut self, kind: &str, value: &impl Serialize) -> io::Result<()> {
        let mut json = serde_json::to_value(value)?;
        if let Some(obj) = json.as_object_mut() {
            obj.insert("type".into(), kind.into());
        }
        self.json_raw(&json)
    }

    fn json_raw(&mut self, value: &impl Serialize) -> io::Result<()> {
        let text = serde_json::to_string(value)?;
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }
}
