//! `FlushWorker` — the background task that drains the intake queue,
//! resolves satellite dedup, persists a batch, and updates `FlushInfo`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use parking_lot::RwLock;

use crate::core::config::EngineConfig;
use crate::core::errors::FormatLogError;
use crate::intake::queue::IntakeQueue;
use crate::model::log::Log;
use crate::store::day_store::{day_store_path, DayStore};
use crate::worker::pacer::AdaptivePacer;
use crate::worker::quarantine::QuarantineSink;

/// Snapshot of the most recent successful flush, read by any thread as an
/// atomic value — never a torn, partially-updated read.
#[derive(Debug, Clone, Default)]
pub struct FlushInfo {
    pub date: Option<chrono::NaiveDate>,
    pub log_count: usize,
    pub prep_time: std::time::Duration,
    pub write_time: std::time::Duration,
    pub total_time: std::time::Duration,
    pub flushed_at: Option<chrono::DateTime<Utc>>,
}

/// Runs `WorkerLoop` on a dedicated thread until cancelled.
pub struct FlushWorker {
    config: EngineConfig,
    queue: Arc<IntakeQueue>,
    info: Arc<RwLock<FlushInfo>>,
    cancelled: Arc<AtomicBool>,
    handle: Mutex<Option<std::thread::JoinHandle<()>>>,
}

impl FlushWorker {
    /// Spawn the worker thread immediately.
    #[must_use]
    pub fn spawn(config: EngineConfig, queue: Arc<IntakeQueue>) -> Self {
        let info = Arc::new(RwLock::new(FlushInfo::default()));
        let cancelled = Arc::new(AtomicBool::new(false));

        let worker_config = config.clone();
        let worker_queue = Arc::clone(&queue);
        let worker_info = Arc::clone(&info);
        let worker_cancelled = Arc::clone(&cancelled);

        let handle = std::thread::Builder::new()
            .name("formatlog-flush".to_string())
            .spawn(move || run_loop(worker_config, worker_queue, worker_info, worker_cancelled))
            .expect("spawning the flush worker thread");

        Self {
            config,
            queue,
            info,
            cancelled,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// The latest `FlushInfo` snapshot.
    #[must_use]
    pub fn flush_info(&self) -> FlushInfo {
        self.info.read().clone()
    }

    /// Cooperatively cancel the worker and join its thread.
    pub fn stop(&self) {
        self.cancelled.store(true, Ordering::Release);
        if let Some(handle) = self.handle.lock().unwrap().take() {
            let _ = handle.join();
        }
    }

    /// Run one flush synchronously on the calling thread — used by
    /// `flush_and_stop` and by tests that want a deterministic flush rather
    /// than waiting on the pacer.
    pub fn flush_once_sync(&self) -> Result<(), FormatLogError> {
        flush_once(&self.config, &self.queue, &self.info, Utc::now().date_naive())
    }
}

fn run_loop(
    config: EngineConfig,
    queue: Arc<IntakeQueue>,
    info: Arc<RwLock<FlushInfo>>,
    cancelled: Arc<AtomicBool>,
) {
    let pacer = AdaptivePacer::new(config.flush.clone());
    loop {
        if cancelled.load(Ordering::Acquire) {
            return;
        }
        let date = Utc::now().date_naive();
        if let Err(err) = flush_once(&config, &queue, &info, date) {
            tracing::warn!(error = %err, "flush iteration failed before quarantine handling");
        }
        pacer.wait(|| queue.active_len(), &cancelled);
    }
}

/// Drain the active intake buffer, persist it in one transaction, and
/// record the outcome in `FlushInfo` — or quarantine it on failure.
fn flush_once(
    config: &EngineConfig,
    queue: &IntakeQueue,
    info: &RwLock<FlushInfo>,
    date: chrono::NaiveDate,
) -> Result<(), FormatLogError> {
    let mut batch: Vec<Log> = queue.swap();
    if batch.is_empty() {
        return Ok(());
    }

    batch.sort_by_key(|log| log.created_tick);

    let path = day_store_path(&config.log_dir(), date, &config.store.file_extension);
    let outcome = (|| -> Result<_, FormatLogError> {
        let mut store = DayStore::open(&path)?;
        let timing = store.flush_batch(&mut batch)?;
        Ok(timing)
    })();

    match outcome {
        Ok(timing) => {
            let mut guard = info.write();
            *guard = FlushInfo {
                date: Some(date),
                log_count: batch.len(),
                prep_time: timing.prep,
                write_time: timing.write,
                total_time: timing.prep + timing.write,
                flushed_at: Some(Utc::now()),
            };
            Ok(())
        }
        Err(err) => {
            let quarantine_dir = config
                .quarantine
                .directory
                .clone()
                .unwrap_or_else(|| config.log_dir());
            let sink = QuarantineSink::new(quarantine_dir);
            sink.quarantine(date, &batch, &err.to_string());
            Err(err)
        }
    }
}
