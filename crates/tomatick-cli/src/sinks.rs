//! Terminal side-effect sinks: bell, screen wake lock and spinner.

use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tomatick_core::{Config, EffectError, EffectSink, Event};
use tracing::{debug, warn};

/// Rings the terminal bell when a phase completes and sound is enabled.
pub struct BellSink<W> {
    config: watch::Receiver<Config>,
    out: W,
}

impl BellSink<std::io::Stderr> {
    pub fn new(config: watch::Receiver<Config>) -> Self {
        Self::with_writer(config, std::io::stderr())
    }
}

impl<W: Write + Send> BellSink<W> {
    pub fn with_writer(config: watch::Receiver<Config>, out: W) -> Self {
        Self { config, out }
    }
}

impl<W: Write + Send> EffectSink for BellSink<W> {
    fn name(&self) -> &str {
        "bell"
    }

    fn handle(&mut self, event: &Event) -> Result<(), EffectError> {
        if !event.is_expiry() || !self.config.borrow().notifications.sound_enabled {
            return Ok(());
        }
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Spawns the process that keeps the screen awake.
pub type Launcher = Box<dyn FnMut() -> Result<Child, EffectError> + Send>;

/// Holds an idle inhibitor while the countdown runs.
pub struct WakeLockSink {
    config: watch::Receiver<Config>,
    launcher: Launcher,
    guard: Option<Child>,
}

impl WakeLockSink {
    pub fn new(config: watch::Receiver<Config>) -> Self {
        Self::with_launcher(config, Box::new(system_inhibitor))
    }

    pub fn with_launcher(config: watch::Receiver<Config>, launcher: Launcher) -> Self {
        Self {
            config,
            launcher,
            guard: None,
        }
    }

    /// Forget a guard whose inhibitor process has died on its own.
    fn reap_dead_guard(&mut self) -> Result<(), EffectError> {
        if let Some(child) = self.guard.as_mut() {
            if let Some(status) = child.try_wait()? {
                warn!(%status, "wake lock inhibitor exited, reacquiring");
                self.guard = None;
            }
        }
        Ok(())
    }

    fn acquire(&mut self) -> Result<(), EffectError> {
        self.reap_dead_guard()?;
        if self.guard.is_some() {
            return Ok(());
        }
        let mut child = (self.launcher)()?;
        if let Some(status) = child.try_wait()? {
            debug!(%status, "wake lock inhibitor did not stay up");
            return Err(EffectError::Exited("screen wake lock inhibitor".into()));
        }
        self.guard = Some(child);
        debug!("wake lock acquired");
        Ok(())
    }

    fn release(&mut self) -> Result<(), EffectError> {
        if let Some(mut child) = self.guard.take() {
            // Reap even when the kill fails so no zombie is left behind.
            let killed = child.kill();
            child.wait()?;
            killed?;
            debug!("wake lock released");
        }
        Ok(())
    }
}

impl EffectSink for WakeLockSink {
    fn name(&self) -> &str {
        "wake-lock"
    }

    fn handle(&mut self, event: &Event) -> Result<(), EffectError> {
        if event.running() && self.config.borrow().notifications.wake_lock {
            self.acquire()
        } else {
            self.release()
        }
    }
}

impl Drop for WakeLockSink {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

#[cfg(target_os = "linux")]
fn system_inhibitor() -> Result<Child, EffectError> {
    Command::new("systemd-inhibit")
        .args([
            "--what=idle:sleep",
            "--who=tomatick",
            "--why=Pomodoro running",
            "--mode=block",
            "sleep",
            "infinity",
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                EffectError::Unsupported("screen wake lock (systemd-inhibit not found)".into())
            }
            std::io::ErrorKind::PermissionDenied => {
                EffectError::PermissionDenied("systemd-inhibit".into())
            }
            _ => EffectError::Io(e),
        })
}

#[cfg(target_os = "macos")]
fn system_inhibitor() -> Result<Child, EffectError> {
    Command::new("caffeinate")
        .arg("-d")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(EffectError::Io)
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn system_inhibitor() -> Result<Child, EffectError> {
    Err(EffectError::Unsupported("screen wake lock".into()))
}

/// Mirrors the running flag into a shared animation switch.
#[derive(Default)]
pub struct SpinnerSink {
    playing: Arc<AtomicBool>,
}

impl SpinnerSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag the renderer reads to decide whether to animate.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.playing)
    }
}

impl EffectSink for SpinnerSink {
    fn name(&self) -> &str {
        "spinner"
    }

    fn handle(&mut self, event: &Event) -> Result<(), EffectError> {
        self.playing.store(event.running(), Ordering::Relaxed);
        Ok(())
    }
}
