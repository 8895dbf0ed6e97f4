//! `QueryEngine` — builds the bidirectionally cursored keyset scan described
//! by a [`QueryModel`] and executes it against the appropriate day-store.

use std::path::Path;

use crate::core::config::EngineConfig;
use crate::core::errors::Result;
use crate::model::log::Log;
use crate::query::model::QueryModel;
use crate::store::day_store::{day_store_path, log_file_exists, DayStore, KeysetFilter};

/// One realized page of a keyset scan.
#[derive(Debug, Clone, Default)]
pub struct KeysetPage<T> {
    pub items: Vec<T>,
    pub pre_cursor_tick: Option<i64>,
    pub next_cursor_tick: Option<i64>,
    pub total_records: i64,
}

/// Stateless: every call opens (or skips) the day-store for the date the
/// query targets.
pub struct QueryEngine<'a> {
    config: &'a EngineConfig,
}

impl<'a> QueryEngine<'a> {
    #[must_use]
    pub const fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Run one keyset page fetch.
    pub fn keyset_paginate(&self, model: &QueryModel) -> Result<KeysetPage<Log>> {
        let date = model
            .store_date()
            .unwrap_or_else(|| chrono::Utc::now().date_naive());
        let log_dir = self.config.log_dir();

        if !log_file_exists(&log_dir, date, &self.config.store.file_extension) {
            return Ok(KeysetPage::default());
        }

        let path = day_store_path(&log_dir, date, &self.config.store.file_extension);
        let store = DayStore::open_read_only(&path)?;

        let filter = KeysetFilter {
            format_substr: model.format_string.as_deref(),
            argument_substr: model.argument.as_deref(),
            caller_substr: model.caller_info.as_deref(),
            level: model.level,
            start_tick: model.start_time,
            end_tick: model.end_time,
        };

        let page_size = model
            .page_size
            .unwrap_or(self.config.query.default_page_size);
        let asc = model.order_type.is_ascending();

        let items = if let Some(p) = model.prev_cursor_tick {
            let (cmp, scan_order) = if asc { ("<=", "DESC") } else { (">=", "ASC") };
            let mut rows = store.select_logs(&filter, Some((cmp, p)), scan_order, page_size)?;
            rows.reverse();
            rows
        } else if let Some(c) = model.next_cursor_tick {
            let (cmp, scan_order) = if asc { (">=", "ASC") } else { ("<=", "DESC") };
            store.select_logs(&filter, Some((cmp, c)), scan_order, page_size)?
        } else {
            let scan_order = if asc { "ASC" } else { "DESC" };
            store.select_logs(&filter, None, scan_order, page_size)?
        };

        let total_records = store.max_log_id()?;
        let pre_cursor_tick = items.first().map(|log| log.created_tick);
        let next_cursor_tick = items.last().map(|log| log.created_tick);

        Ok(KeysetPage {
            items,
            pre_cursor_tick,
            next_cursor_tick,
            total_records,
        })
    }

    /// Whether a day-store file already exists for `date`.
    #[must_use]
    pub fn log_file_exists(&self, date: chrono::NaiveDate) -> bool {
        log_file_exists(&self.config.log_dir(), date, &self.config.store.file_extension)
    }

    /// All dates with a day-store file.
    pub fn list_log_files(&self) -> Result<Vec<chrono::NaiveDate>> {
        crate::store::day_store::list_log_files(&self.config.log_dir(), &self.config.store.file_extension)
    }
}

/// Standalone helper mirroring `log_file_exists` for callers without an
/// `EngineConfig` in scope.
#[must_use]
pub fn log_file_exists_in(log_dir: &Path, date: chrono::NaiveDate, extension: &str) -> bool {
    log_file_exists(log_dir, date, extension)
}
