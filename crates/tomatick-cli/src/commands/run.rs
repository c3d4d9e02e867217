//! Interactive timer session.
//!
//! Everything runs on a current-thread runtime: one `select!` loop takes
//! ticks, stdin lines and Ctrl-C, so all session mutation happens in one place.

use std::error::Error;
use std::io::IsTerminal;
use std::path::Path;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tomatick_core::{Config, Event, Intent, Session, Ticker};
use tracing::{debug, info, warn};

use crate::input::{self, Command};
use crate::render::{Mode, Renderer};
use crate::sinks::{BellSink, SpinnerSink, WakeLockSink};

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Work length in minutes for this session
    #[arg(long)]
    pub pomodoro: Option<u32>,
    /// Short break length in minutes for this session
    #[arg(long)]
    pub short_break: Option<u32>,
    /// Long break length in minutes for this session
    #[arg(long)]
    pub long_break: Option<u32>,
    /// Do not ring the bell when a phase ends
    #[arg(long)]
    pub no_sound: bool,
    /// Do not keep the screen awake while running
    #[arg(long)]
    pub no_wake_lock: bool,
    /// Start the first pomodoro right away
    #[arg(long)]
    pub autostart: bool,
    /// Print JSON lines instead of text
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Fold command-line overrides into `config` through the same
    /// validation the `set` command uses.
    fn apply_to(&self, config: &mut Config) -> Result<(), Box<dyn Error>> {
        let durations = [
            ("timer.pomodoro", self.pomodoro),
            ("timer.short_break", self.short_break),
            ("timer.long_break", self.long_break),
        ];
        for (key, minutes) in durations {
            if let Some(minutes) = minutes {
                config.set(key, &minutes.to_string())?;
            }
        }
        if self.no_sound {
            config.set("notifications.sound_enabled", "false")?;
        }
        if self.no_wake_lock {
            config.set("notifications.wake_lock", "false")?;
        }
        Ok(())
    }
}

pub fn run(args: RunArgs, config_path: &Path) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load_from(config_path)?;
    args.apply_to(&mut config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session_loop(config, &args))
}

async fn session_loop(config: Config, args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let (ticker, mut ticks) = Ticker::every_second();
    let mut session = Session::new(config, ticker);

    let spinner = SpinnerSink::new();
    let animation = spinner.flag();
    session.register_effect(Box::new(BellSink::new(session.config_watch())));
    session.register_effect(Box::new(WakeLockSink::new(session.config_watch())));
    session.register_effect(Box::new(spinner));

    let stdout = std::io::stdout();
    let mode = if args.json {
        Mode::Json
    } else {
        Mode::Text {
            live: stdout.is_terminal(),
        }
    };
    let mut renderer = Renderer::new(stdout, mode, animation);
    renderer.banner(&session.config())?;
    renderer.status(&session.snapshot())?;
    info!("session started");

    if args.autostart {
        dispatch(&mut session, &mut renderer, Command::Start)?;
    }

    // Raw segments so a line that is not UTF-8 can be rejected on its own.
    let mut lines = BufReader::new(tokio::io::stdin()).split(b'\n');
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                match session.on_tick(tick) {
                    Some(event) => renderer.event(&event)?,
                    None => renderer.countdown(&session.snapshot())?,
                }
            }
            segment = lines.next_segment() => {
                let bytes = match segment {
                    Ok(Some(bytes)) => bytes,
                    Ok(None) => {
                        debug!("stdin closed");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "reading stdin failed");
                        renderer.error(&e)?;
                        break;
                    }
                };
                let Ok(line) = String::from_utf8(bytes) else {
                    renderer.error(&"input is not valid UTF-8, line ignored")?;
                    continue;
                };
                match input::parse(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => {
                        if let Err(e) = dispatch(&mut session, &mut renderer, command) {
                            renderer.error(&e)?;
                        }
                    }
                    Ok(None) => {}
                    Err(message) => renderer.error(&message)?,
                }
            }
            _ = &mut ctrl_c => {
                debug!("interrupted");
                break;
            }
        }
    }

    if let Some(event) = session.shutdown() {
        renderer.event(&event)?;
    }
    let snap = session.snapshot();
    renderer.notice(&format!(
        "bye. completed pomodoros: {}",
        snap.completed_work_sessions
    ))?;
    info!(sessions = snap.completed_work_sessions, "session ended");
    Ok(())
}

/// Carry out one typed command against the session.
fn dispatch<W: std::io::Write>(
    session: &mut Session,
    renderer: &mut Renderer<W>,
    command: Command,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Start => timer(session, renderer, Intent::Start),
        Command::Pause => timer(session, renderer, Intent::Pause),
        Command::Toggle => timer(session, renderer, Intent::Toggle),
        Command::Reset => timer(session, renderer, Intent::Reset),
        Command::Mode(phase) => timer(session, renderer, Intent::SwitchMode(phase)),
        Command::Add(text) => {
            session.apply(Intent::AddTask(text))?;
            renderer.tasks(session.tasks())?;
            Ok(())
        }
        Command::Done(position) => {
            let id = session.tasks().id_at(position)?;
            session.apply(Intent::ToggleTask(id))?;
            renderer.tasks(session.tasks())?;
            Ok(())
        }
        Command::Remove(position) => {
            let id = session.tasks().id_at(position)?;
            session.apply(Intent::DeleteTask(id))?;
            renderer.tasks(session.tasks())?;
            Ok(())
        }
        Command::Clear => {
            session.apply(Intent::ClearCompleted)?;
            renderer.tasks(session.tasks())?;
            Ok(())
        }
        Command::Tasks => Ok(renderer.tasks(session.tasks())?),
        Command::Status => Ok(renderer.status(&session.snapshot())?),
        Command::Settings => Ok(renderer.settings(&session.config())?),
        Command::Set { key, value } => {
            session.apply(Intent::UpdateSetting {
                key: key.clone(),
                value,
            })?;
            let stored = session.config().get(&key).unwrap_or_default();
            renderer.notice(&format!("{key} = {stored}"))?;
            if key.starts_with("timer.") {
                renderer.notice("new lengths apply from the next reset or phase change")?;
            }
            Ok(())
        }
        Command::Help => Ok(renderer.help()?),
        // Handled by the session loop.
        Command::Quit => Ok(()),
    }
}

fn timer<W: std::io::Write>(
    session: &mut Session,
    renderer: &mut Renderer<W>,
    intent: Intent,
) -> Result<(), Box<dyn Error>> {
    let events: Vec<Event> = session.apply(intent)?;
    if events.is_empty() {
        renderer.status(&session.snapshot())?;
    }
    for event in &events {
        renderer.event(event)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tomatick_core::Phase;

    fn fixture() -> (Session, Renderer<Vec<u8>>) {
        let (ticker, _ticks) = Ticker::every_second();
        let session = Session::new(Config::default(), ticker);
        let renderer = Renderer::new(
            Vec::new(),
            Mode::Text { live: false },
            Arc::new(AtomicBool::new(false)),
        );
        (session, renderer)
    }

    #[test]
    fn overrides_are_clamped_like_settings() {
        let args = RunArgs {
            pomodoro: Some(120),
            short_break: Some(3),
            no_sound: true,
            ..RunArgs::default()
        };
        let mut config = Config::default();
        args.apply_to(&mut config).unwrap();
        assert_eq!(config.timer.pomodoro, 60);
        assert_eq!(config.timer.short_break, 3);
        assert!(!config.notifications.sound_enabled);
        assert!(config.notifications.wake_lock);
    }

    #[test]
    fn notification_switches_use_settings_path() {
        let args = RunArgs {
            no_sound: true,
            no_wake_lock: true,
            ..RunArgs::default()
        };
        let mut config = Config::default();
        args.apply_to(&mut config).unwrap();
        assert_eq!(config.get("notifications.sound_enabled").as_deref(), Some("false"));
        assert_eq!(config.get("notifications.wake_lock").as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn task_positions_are_validated() {
        let (mut session, mut renderer) = fixture();
        dispatch(&mut session, &mut renderer, Command::Add("write".into())).unwrap();
        assert!(dispatch(&mut session, &mut renderer, Command::Done(2)).is_err());
        dispatch(&mut session, &mut renderer, Command::Done(1)).unwrap();
        assert_eq!(session.tasks().remaining(), 0);
        dispatch(&mut session, &mut renderer, Command::Remove(1)).unwrap();
        assert!(session.tasks().is_empty());
    }

    #[tokio::test]
    async fn mode_command_switches_phase() {
        let (mut session, mut renderer) = fixture();
        dispatch(&mut session, &mut renderer, Command::Start).unwrap();
        dispatch(&mut session, &mut renderer, Command::Mode(Phase::LongBreak)).unwrap();
        let snap = session.snapshot();
        assert_eq!(snap.phase, Phase::LongBreak);
        assert!(!snap.running);
    }

    #[tokio::test]
    async fn bad_setting_is_an_error() {
        let (mut session, mut renderer) = fixture();
        let result = dispatch(
            &mut session,
            &mut renderer,
            Command::Set {
                key: "timer.pomodoro".into(),
                value: "lots".into(),
            },
        );
        assert!(result.is_err());
    }
}
