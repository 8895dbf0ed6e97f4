//! `LifecycleControl` — lazy one-shot initialization of the flush worker,
//! plus the explicit shutdown flush.
//!
//! A process-exit hook (e.g. `libc::atexit`) would need an `unsafe` block,
//! which this crate forbids crate-wide. `Engine::flush_and_stop` is the
//! host-driven substitute: call it explicitly on shutdown instead of relying
//! on an implicit process-exit flush.

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::core::config::EngineConfig;
use crate::core::errors::{FormatLogError, Result};
use crate::intake::queue::IntakeQueue;
use crate::model::log::Log;
use crate::worker::flush::{FlushInfo, FlushWorker};

/// The process-wide logging engine: intake queue, background worker, and
/// the config both were built from.
pub struct Engine {
    config: EngineConfig,
    queue: Arc<IntakeQueue>,
    worker: Mutex<Option<FlushWorker>>,
}

impl Engine {
    fn new(config: EngineConfig) -> Self {
        Self {
            config,
            queue: Arc::new(IntakeQueue::new()),
            worker: Mutex::new(None),
        }
    }

    /// Idempotent, thread-safe first-use initialization: create the store
    /// directory and spawn the worker if not already running.
    pub fn init(&self) -> Result<()> {
        let mut guard = self.worker.lock();
        if guard.is_some() {
            return Ok(());
        }
        std::fs::create_dir_all(self.config.log_dir())
            .map_err(|source| FormatLogError::io(self.config.log_dir(), source))?;
        *guard = Some(FlushWorker::spawn(self.config.clone(), Arc::clone(&self.queue)));
        Ok(())
    }

    /// Enqueue `log`, lazily initializing the worker first if needed.
    pub fn add(&self, log: Log) {
        if self.worker.lock().is_none() {
            // Best-effort: if directory creation fails here, `add` still
            // cannot fail for the producer; the worker will surface the
            // problem via quarantine instead.
            let _ = self.init();
        }
        self.queue.add(log);
    }

    /// The latest `FlushInfo` snapshot, or the zero-value default if the
    /// worker has never run.
    #[must_use]
    pub fn flush_info(&self) -> FlushInfo {
        self.worker
            .lock()
            .as_ref()
            .map_or_else(FlushInfo::default, FlushWorker::flush_info)
    }

    /// Cancel the worker and join its thread. A subsequent `add` re-`init`s.
    pub fn stop(&self) {
        if let Some(worker) = self.worker.lock().take() {
            worker.stop();
        }
    }

    /// Synchronously flush whatever is queued, then stop the worker. The
    /// host-driven equivalent of the source's process-exit hook.
    pub fn flush_and_stop(&self) -> Result<()> {
        let result = {
            let guard = self.worker.lock();
            guard.as_ref().map(FlushWorker::flush_once_sync)
        };
        self.stop();
        result.unwrap_or(Ok(()))
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }
}

static ENGINE: OnceLock<Engine> = OnceLock::new();

/// The process-wide engine instance, built from `config` on first call.
/// Subsequent calls ignore `config` and return the existing instance,
/// initialized on first use under a one-shot lock.
pub fn engine(config: EngineConfig) -> &'static Engine {
    ENGINE.get_or_init(|| Engine::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::log::{Level, LogBuilder};

    #[test]
    fn init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = EngineConfig::default();
        config.store.base_dir = dir.path().to_path_buf();
        let engine = Engine::new(config);
        engine.init().unwrap();
        engine.init().unwrap();
        assert!(engine.worker.lock().is_some());
        engine.stop();
    }

    #[test]
    fn add_lazily_initializes_and_flush_and_stop_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = EngineConfig::default();
        config.store.base_dir = dir.path().to_path_buf();
        let engine = Engine::new(config);

        engine.add(LogBuilder::new(Level::Info, "x").build());
        engine.flush_and_stop().unwrap();

        assert_eq!(engine.flush_info().log_count, 1);
    }

    #[test]
    fn stop_allows_reinit_on_next_add() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = EngineConfig::default();
        config.store.base_dir = dir.path().to_path_buf();
        let engine = Engine::new(config);

        engine.init().unwrap();
        engine.stop();
        assert!(engine.worker.lock().is_none());

        engine.add(LogBuilder::new(Level::Info, "x").build());
        assert!(engine.worker.lock().is_some());
        engine.stop();
    }
}
