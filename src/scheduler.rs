//! ==============================================================================
//! scheduler.rs - poll timer
//! ==============================================================================
//!
//! purpose:
//!     one repeating timer at a fixed interval. each tick spawns its own task,
//!     so `stop()` cancels the timer but never a refresh already under way.
//!
//! relationships:
//!     - used by: monitor.rs (start_polling / stop_polling)
//!
//! ==============================================================================

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug)]
pub struct PollScheduler {
    interval: Duration,
    timer: Option<JoinHandle<()>>,
}

impl PollScheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval, timer: None }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arms the timer, cancelling any existing one first
    ///
    /// The first tick fires one interval from now.
    pub fn start<F, Fut>(&mut self, tick: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.stop();
        let period = self.interval;
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tokio::spawn(tick());
            }
        }));
        tracing::debug!(interval_ms = period.as_millis() as u64, "polling started");
    }

    /// Cancels the timer; returns whether one was armed
    pub fn stop(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                timer.abort();
                tracing::debug!("polling stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
