//! Cancellable repeating tick source.
//!
//! The engine never schedules itself. A [`Ticker`] owns at most one tokio
//! task that sends a [`Tick`] every period; the session starts it when the
//! timer begins running and stops it as soon as running becomes false.
//!
//! Each `start()` opens a new generation. Ticks that were already queued
//! when a generation was stopped carry the old number and are rejected by
//! [`Ticker::is_current`], so a fast pause/start cannot decrement twice.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::trace;

/// One elapsed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    tx: mpsc::UnboundedSender<Tick>,
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl Ticker {
    /// Create a stopped ticker and the receiving end of its ticks.
    pub fn new(period: Duration) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let ticker = Self {
            period,
            tx,
            handle: None,
            generation: 0,
        };
        (ticker, rx)
    }

    pub fn every_second() -> (Self, mpsc::UnboundedReceiver<Tick>) {
        Self::new(Duration::from_secs(1))
    }

    /// Begin ticking. The first tick arrives one period from now.
    ///
    /// Returns `false` without spawning anything when a source is already live.
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.generation += 1;
        let generation = self.generation;
        let period = self.period;
        let tx = self.tx.clone();
        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        }));
        trace!(generation, "ticker started");
        true
    }

    /// Cancel the live source, if any. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                trace!(generation = self.generation, "ticker stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Whether `tick` was produced by the source that is live right now.
    pub fn is_current(&self, tick: &Tick) -> bool {
        self.is_active() && tick.generation == self.generation
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let (mut ticker, mut rx) = Ticker::every_second();
        let started = Instant::now();
        assert!(ticker.start());
        for _ in 0..3 {
            let tick = rx.recv().await.unwrap();
            assert!(ticker.is_current(&tick));
        }
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_does_not_double_tick() {
        let (mut ticker, mut rx) = Ticker::every_second();
        assert!(ticker.start());
        assert!(!ticker.start());
        let started = Instant::now();
        for _ in 0..4 {
            rx.recv().await.unwrap();
        }
        assert!(started.elapsed() >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_source() {
        let (mut ticker, mut rx) = Ticker::every_second();
        ticker.start();
        rx.recv().await.unwrap();
        assert!(ticker.stop());
        assert!(!ticker.stop());
        assert!(!ticker.is_active());
        assert!(timeout(Duration::from_secs(10), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_rejects_stale_ticks() {
        let (mut ticker, mut rx) = Ticker::every_second();
        ticker.start();
        let old = rx.recv().await.unwrap();
        ticker.stop();
        ticker.start();
        assert!(!ticker.is_current(&old));
        let fresh = rx.recv().await.unwrap();
        assert!(ticker.is_current(&fresh));
        assert_eq!(fresh.generation, 2);
    }
}
