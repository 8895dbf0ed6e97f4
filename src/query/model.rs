//! `QueryModel` — the fluent filter/cursor builder for `keyset_paginate`.

use crate::model::log::Level;
use crate::model::tick;

/// Sort direction over `created_tick`. The name retains the original
/// `OrderByIdAscending`/`Descending` taxonomy even though the ordering key
/// is the tick, not a row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderType {
    #[default]
    OrderByIdAscending,
    OrderByIdDescending,
}

impl OrderType {
    #[must_use]
    pub const fn is_ascending(self) -> bool {
        matches!(self, Self::OrderByIdAscending)
    }
}

/// Accumulates filters, paging, and cursor state for one `keyset_paginate` call.
#[derive(Debug, Clone, Default)]
pub struct QueryModel {
    pub(crate) format_string: Option<String>,
    pub(crate) argument: Option<String>,
    pub(crate) caller_info: Option<String>,
    pub(crate) level: Option<Level>,
    pub(crate) start_time: Option<i64>,
    pub(crate) end_time: Option<i64>,
    pub(crate) page_size: Option<u32>,
    pub(crate) order_type: OrderType,
    pub(crate) next_cursor_tick: Option<i64>,
    pub(crate) prev_cursor_tick: Option<i64>,
}

impl QueryModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Substring match against `Format.format_string`.
    #[must_use]
    pub fn format_string(mut self, value: impl Into<String>) -> Self {
        self.format_string = Some(value.into());
        self
    }

    /// Substring match against any of the ten argument slots.
    #[must_use]
    pub fn argument(mut self, value: impl Into<String>) -> Self {
        self.argument = Some(value.into());
        self
    }

    /// Substring match against `member_name`, `source_file_path`, or the
    /// stringified `source_line_number`.
    #[must_use]
    pub fn caller_info(mut self, value: impl Into<String>) -> Self {
        self.caller_info = Some(value.into());
        self
    }

    /// Exact level match.
    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Range filter on `created_tick`. A no-op if `start` and `end` are not
    /// on the same local calendar date, or if `start > end`.
    #[must_use]
    pub fn with_time(mut self, start: i64, end: i64) -> Self {
        if start > end || tick::to_date(start) != tick::to_date(end) {
            return self;
        }
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// Page size; must be `> 0` (the engine falls back to the configured
    /// default when unset, never to zero).
    #[must_use]
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    #[must_use]
    pub const fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = order_type;
        self
    }

    /// Forward cursor: clears any `prev_cursor_tick`.
    #[must_use]
    pub const fn next_cursor_tick(mut self, tick: i64) -> Self {
        self.next_cursor_tick = Some(tick);
        self.prev_cursor_tick = None;
        self
    }

    /// Backward cursor: clears any `next_cursor_tick`.
    #[must_use]
    pub const fn prev_cursor_tick(mut self, tick: i64) -> Self {
        self.prev_cursor_tick = Some(tick);
        self.next_cursor_tick = None;
        self
    }

    /// The date whose day-store this query should open: the start time's
    /// date, else the end time's date, else `None` (caller defaults to today).
    #[must_use]
    pub fn store_date(&self) -> Option<chrono::NaiveDate> {
        self.start_time
            .or(self.end_time)
            .map(tick::to_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_time_rejects_cross_date_range() {
        let day_one = tick::from_datetime(chrono::Utc::now());
        let day_two = day_one + tick::TICKS_PER_SECOND * 60 * 60 * 24;
        let model = QueryModel::new().with_time(day_one, day_two);
        assert!(model.start_time.is_none());
    }

    #[test]
    fn with_time_rejects_inverted_range() {
        let model = QueryModel::new().with_time(100, 50);
        assert!(model.start_time.is_none());
    }

    #[test]
    fn with_time_accepts_same_date_ordered_range() {
        let model = QueryModel::new().with_time(100, 200);
        assert_eq!(model.start_time, Some(100));
        assert_eq!(model.end_time, Some(200));
    }

    #[test]
    fn next_cursor_clears_prev_and_vice_versa() {
        let model = QueryModel::new().prev_cursor_tick(5).next_cursor_tick(10);
        assert_eq!(model.next_cursor_tick, Some(10));
        assert!(model.prev_cursor_tick.is_none());

        let model = QueryModel::new().next_cursor_tick(10).prev_cursor_tick(5);
        assert_eq!(model.prev_cursor_tick, Some(5));
        assert!(model.next_cursor_tick.is_none());
    }
}
