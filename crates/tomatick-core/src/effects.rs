//! Side-effect sinks.
//!
//! Sound, screen wake lock and animation react to timer events but never
//! feed back into timer state. Sinks register on an [`EffectBus`]; a failing
//! sink is logged and skipped so the remaining sinks still run.

use tracing::{trace, warn};

use crate::error::EffectError;
use crate::events::Event;

/// Observer of timer events.
pub trait EffectSink: Send {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn handle(&mut self, event: &Event) -> Result<(), EffectError>;
}

#[derive(Default)]
pub struct EffectBus {
    sinks: Vec<Box<dyn EffectSink>>,
}

impl EffectBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, sink: Box<dyn EffectSink>) {
        trace!(sink = sink.name(), "effect sink registered");
        self.sinks.push(sink);
    }

    /// Hand `event` to every sink in registration order.
    /// Returns how many sinks failed.
    pub fn dispatch(&mut self, event: &Event) -> usize {
        let mut failures = 0;
        for sink in &mut self.sinks {
            if let Err(e) = sink.handle(event) {
                failures += 1;
                warn!(sink = sink.name(), error = %e, "effect sink failed");
            }
        }
        failures
    }
}

impl std::fmt::Debug for EffectBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sinks.iter().map(|s| s.name()).collect();
        f.debug_struct("EffectBus").field("sinks", &names).finish()
    }
}
