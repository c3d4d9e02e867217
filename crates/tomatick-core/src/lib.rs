//! # Tomatick Core Library
//!
//! This library provides the core logic for the Tomatick Pomodoro timer.
//! Front ends (the `tomatick` terminal binary today) are thin layers that
//! render snapshots and turn user input into intents.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A tick-driven state machine cycling Work, Short Break
//!   and Long Break; the caller invokes `tick()` once per second
//! - **Ticker**: Cancellable one-second tick source owned by the running flag
//! - **Effects**: Observer bus for sound, wake lock and animation sinks
//! - **Storage**: TOML-based configuration
//! - **Tasks**: Independent checklist
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`Session`]: Wires the engine to its collaborators
//! - [`Config`]: Application configuration management
//! - [`EffectSink`]: Trait for side-effect handlers

pub mod effects;
pub mod error;
pub mod events;
pub mod session;
pub mod storage;
pub mod task;
pub mod ticker;
pub mod timer;

pub use effects::{EffectBus, EffectSink};
pub use error::{ConfigError, CoreError, EffectError, ValidationError};
pub use events::Event;
pub use session::{Intent, Session};
pub use storage::Config;
pub use task::{Task, TaskList};
pub use ticker::{Tick, Ticker};
pub use timer::{format_clock, Phase, TimerEngine, TimerSettings, TimerSnapshot};
