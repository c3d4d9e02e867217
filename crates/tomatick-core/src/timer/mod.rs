mod engine;
mod phase;
mod settings;

pub use engine::{format_clock, TimerEngine, TimerSnapshot};
pub use phase::Phase;
pub use settings::TimerSettings;
