//! Double-buffered lock-free intake queue.
//!
//! Two unbounded `crossbeam_channel` pairs back an `A`/`B` pair of buffers;
//! an [`AtomicBool`] designates which pair producers enqueue into. `swap()`
//! flips the flag and drains whichever pair was active a moment ago — the
//! only cross-thread coordination point, a channel-backed handle with no
//! shared mutex.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::model::log::Log;

/// The active-buffer designator and its two backing channels.
pub struct IntakeQueue {
    buf_a: (Sender<Log>, Receiver<Log>),
    buf_b: (Sender<Log>, Receiver<Log>),
    /// `true` selects `buf_a` as the enqueue target, `false` selects `buf_b`.
    active_is_a: AtomicBool,
}

impl IntakeQueue {
    /// A fresh queue pair with `A` active.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf_a: unbounded(),
            buf_b: unbounded(),
            active_is_a: AtomicBool::new(true),
        }
    }

    /// Enqueue `log` into whichever buffer is active at this instant.
    ///
    /// Never blocks: one atomic load plus one lock-free channel send. A send
    /// can only fail if the corresponding receiver was dropped, which never
    /// happens for the lifetime of `IntakeQueue`.
    pub fn add(&self, log: Log) {
        let sender = if self.active_is_a.load(Ordering::Acquire) {
            &self.buf_a.0
        } else {
            &self.buf_b.0
        };
        let _ = sender.send(log);
    }

    /// Flip the active buffer and drain everything that had accumulated in
    /// the buffer that was active *before* the flip.
    ///
    /// A producer that loaded `active` just before the flip may still
    /// enqueue into the buffer this call drains; that log is simply picked
    /// up by the next `swap()` instead — acceptable since it will still be
    /// flushed on the following cycle.
    pub fn swap(&self) -> Vec<Log> {
        let was_a = self.active_is_a.fetch_xor(true, Ordering::AcqRel);
        let drained = if was_a { &self.buf_a.1 } else { &self.buf_b.1 };
        drained.try_iter().collect()
    }

    /// Approximate depth of the currently active buffer, used by
    /// [`crate::worker::pacer::AdaptivePacer`] to decide how long to wait.
    #[must_use]
    pub fn active_len(&self) -> usize {
        if self.active_is_a.load(Ordering::Acquire) {
            self.buf_a.0.len()
        } else {
            self.buf_b.0.len()
        }
    }
}

impl Default for IntakeQueue {
    fn default() -> Self {
        Self::new()
    }
}
