//! Session controller.
//!
//! Wires the timer engine to its collaborators: the tick source, the
//! configuration store, the effect bus and the task list. Front ends feed it
//! [`Intent`]s and [`Tick`]s from one execution context and watch snapshots.

use tokio::sync::watch;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::effects::{EffectBus, EffectSink};
use crate::error::Result;
use crate::events::Event;
use crate::storage::Config;
use crate::task::TaskList;
use crate::ticker::{Tick, Ticker};
use crate::timer::{Phase, TimerEngine, TimerSnapshot};

/// User action coming from a front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Start,
    Pause,
    /// Start when stopped, pause when running.
    Toggle,
    Reset,
    SwitchMode(Phase),
    AddTask(String),
    ToggleTask(Uuid),
    DeleteTask(Uuid),
    ClearCompleted,
    UpdateSetting { key: String, value: String },
}

#[derive(Debug)]
pub struct Session {
    engine: TimerEngine,
    tasks: TaskList,
    ticker: Ticker,
    effects: EffectBus,
    config: watch::Sender<Config>,
    snapshots: watch::Sender<TimerSnapshot>,
}

impl Session {
    pub fn new(config: Config, ticker: Ticker) -> Self {
        let engine = TimerEngine::new(config.timer_settings());
        let (snapshots, _) = watch::channel(engine.snapshot());
        let (config, _) = watch::channel(config);
        Self {
            engine,
            tasks: TaskList::new(),
            ticker,
            effects: EffectBus::new(),
            config,
            snapshots,
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.engine.snapshot()
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn config(&self) -> Config {
        self.config.borrow().clone()
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Receiver that sees a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshots.subscribe()
    }

    /// Live view of the configuration, for sinks that read settings.
    pub fn config_watch(&self) -> watch::Receiver<Config> {
        self.config.subscribe()
    }

    pub fn register_effect(&mut self, sink: Box<dyn EffectSink>) {
        self.effects.register(sink);
    }

    /// Apply one intent and return the timer events it produced.
    ///
    /// # Errors
    ///
    /// Only setting updates can fail; the timer and task list are untouched
    /// when they do.
    pub fn apply(&mut self, intent: Intent) -> Result<Vec<Event>> {
        trace!(?intent, "applying intent");
        let events: Vec<Event> = match intent {
            Intent::Start => self.engine.start().into_iter().collect(),
            Intent::Pause => self.engine.pause().into_iter().collect(),
            Intent::Toggle => {
                if self.engine.is_running() {
                    self.engine.pause().into_iter().collect()
                } else {
                    self.engine.start().into_iter().collect()
                }
            }
            Intent::Reset => vec![self.engine.reset()],
            Intent::SwitchMode(phase) => vec![self.engine.switch_mode(phase)],
            Intent::AddTask(text) => {
                if let Some(task) = self.tasks.add(&text) {
                    debug!(id = %task.id, "task added");
                }
                Vec::new()
            }
            Intent::ToggleTask(id) => {
                if let Some(completed) = self.tasks.toggle(id) {
                    debug!(%id, completed, "task toggled");
                }
                Vec::new()
            }
            Intent::DeleteTask(id) => {
                if self.tasks.delete(id).is_some() {
                    debug!(%id, "task deleted");
                }
                Vec::new()
            }
            Intent::ClearCompleted => {
                let removed = self.tasks.clear_completed();
                debug!(removed, "completed tasks cleared");
                Vec::new()
            }
            Intent::UpdateSetting { key, value } => {
                self.update_setting(&key, &value)?;
                Vec::new()
            }
        };
        self.settle(&events);
        Ok(events)
    }

    /// Feed one tick from the ticker. Ticks from a stopped source are ignored.
    pub fn on_tick(&mut self, tick: Tick) -> Option<Event> {
        if !self.ticker.is_current(&tick) {
            trace!(generation = tick.generation, "dropping stale tick");
            return None;
        }
        let event = self.engine.tick();
        self.settle(event.as_slice());
        event
    }

    /// Stop the countdown and the tick source, e.g. before exiting.
    pub fn shutdown(&mut self) -> Option<Event> {
        let event = self.engine.pause();
        self.settle(event.as_slice());
        event
    }

    /// Validate and store one setting. New durations apply from the next
    /// phase initialization; the running countdown is left alone.
    fn update_setting(&mut self, key: &str, value: &str) -> Result<()> {
        let mut config = self.config.borrow().clone();
        config.set(key, value)?;
        self.engine.set_settings(config.timer_settings());
        debug!(key, value, "setting updated");
        self.config.send_replace(config);
        Ok(())
    }

    fn settle(&mut self, events: &[Event]) {
        if self.engine.is_running() {
            self.ticker.start();
        } else {
            self.ticker.stop();
        }
        for event in events {
            self.effects.dispatch(event);
        }
        self.snapshots.send_replace(self.engine.snapshot());
    }
}
