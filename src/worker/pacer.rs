//! Adaptive pacer: the wait between flush iterations.
//!
//! Busy-polls in `poll_granularity_ms` steps, breaking early as backlog
//! depth grows so a bursty producer gets flushed quickly while an idle one
//! lets the worker sleep up to `max_wait_ms`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::core::config::FlushConfig;

/// Computes and performs the inter-flush wait.
pub struct AdaptivePacer {
    config: FlushConfig,
}

impl AdaptivePacer {
    #[must_use]
    pub fn new(config: FlushConfig) -> Self {
        Self { config }
    }

    /// Sleep in `poll_granularity_ms` steps, checking `backlog_len()` and
    /// `cancelled` after each step.
    pub fn wait(&self, backlog_len: impl Fn() -> usize, cancelled: &AtomicBool) {
        let step = Duration::from_millis(self.config.poll_granularity_ms);
        let mut waited_ms: u64 = 0;

        loop {
            let n = backlog_len();
            if n as u64 > self.config.hard_backlog_threshold {
                return;
            }
            if n as u64 >= self.config.medium_backlog_threshold && waited_ms >= self.config.medium_wait_ms {
                return;
            }
            if n >= 1 && waited_ms >= self.config.max_wait_ms {
                return;
            }
            if cancelled.load(Ordering::Acquire) {
                return;
            }
            std::thread::sleep(step);
            waited_ms += self.config.poll_granularity_ms;
        }
    }
}
