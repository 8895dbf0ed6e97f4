//! Per-day relational storage.

#[cfg(feature = "sqlite")]
pub mod day_store;

#[cfg(feature = "sqlite")]
pub use day_store::{day_store_path, list_log_files, log_file_exists, DayStore, FlushTiming, KeysetFilter};
