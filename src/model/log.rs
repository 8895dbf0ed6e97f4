//! `Log` — the central entity: a format template, up to ten arguments,
//! optional caller context, and the producer-assigned creation tick.

use crate::core::errors::{FormatLogError, Result};
use crate::model::argument::MAX_ARGUMENTS;
use crate::model::caller_info::CallerInfo;
use crate::model::tick;

/// Log severity, ordered least to most severe.
///
/// Explicit discriminants (teacher pattern, `monitor::pid::PressureLevel`)
/// keep the ordering stable even if variants are reordered in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
    Critical = 4,
}

impl Level {
    /// Parse a level from its stored string form.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Debug" => Some(Self::Debug),
            "Info" => Some(Self::Info),
            "Warning" => Some(Self::Warning),
            "Error" => Some(Self::Error),
            "Critical" => Some(Self::Critical),
            _ => None,
        }
    }

    /// The string stored in `Logs.Level`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One in-flight or persisted log entry.
///
/// Producers populate the raw fields (`format_string`, `arguments`, `caller`,
/// `created_tick`) via [`LogBuilder`]. The flush worker resolves satellite ids
/// in place — the `*_id` fields start `None` and are filled in during a flush.
#[derive(Debug, Clone)]
pub struct Log {
    /// Row id once persisted; `None` for an in-flight log.
    pub id: Option<i64>,
    pub level: Level,
    pub format_string: String,
    pub arguments: [Option<String>; MAX_ARGUMENTS],
    pub caller: Option<CallerInfo>,
    pub created_tick: i64,

    /// Resolved during flush; see [`Log::resolve_format`] / [`Log::resolve_argument`].
    pub(crate) format_id: Option<i64>,
    pub(crate) arg_ids: [Option<i64>; MAX_ARGUMENTS],
    pub(crate) caller_info_id: Option<i64>,
}

impl Log {
    /// Record the resolved `Format` id (flush-worker only).
    pub(crate) fn resolve_format(&mut self, id: i64) {
        self.format_id = Some(id);
    }

    /// Record a resolved `Argument` id for one slot (flush-worker only).
    pub(crate) fn resolve_argument(&mut self, slot: usize, id: i64) {
        self.arg_ids[slot] = Some(id);
    }

    /// Record the resolved `CallerInfo` id (flush-worker only).
    pub(crate) fn resolve_caller(&mut self, id: i64) {
        self.caller_info_id = Some(id);
    }

    /// The local calendar date this log belongs to, used to pick a day-store.
    #[must_use]
    pub fn date(&self) -> chrono::NaiveDate {
        tick::to_date(self.created_tick)
    }

    /// Render `format_string` with its arguments substituted for `{0}..{9}`.
    ///
    /// Missing/null arguments render as the empty string.
    #[must_use]
    pub fn content(&self) -> String {
        render(&self.format_string, &self.arguments, false)
    }

    /// Like [`Log::content`], but each substituted argument is wrapped in
    /// `<tag>...</tag>` markers so a UI can highlight parameter boundaries.
    #[must_use]
    pub fn tag_content(&self) -> String {
        render(&self.format_string, &self.arguments, true)
    }
}

fn render(format_string: &str, arguments: &[Option<String>; MAX_ARGUMENTS], tagged: bool) -> String {
    let mut out = String::with_capacity(format_string.len());
    let chars: Vec<char> = format_string.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '{' && i + 2 < chars.len() && chars[i + 2] == '}' && chars[i + 1].is_ascii_digit()
        {
            let slot = chars[i + 1] as usize - '0' as usize;
            let value = arguments[slot].as_deref().unwrap_or("");
            if tagged {
                out.push_str("<tag>");
                out.push_str(value);
                out.push_str("</tag>");
            } else {
                out.push_str(value);
            }
            i += 3;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Fluent constructor for [`Log`]: a format template plus up to ten typed
/// arguments and optional caller context.
#[derive(Debug, Clone)]
pub struct LogBuilder {
    level: Level,
    format_string: String,
    arguments: [Option<String>; MAX_ARGUMENTS],
    caller: Option<CallerInfo>,
    created_tick: Option<i64>,
}

impl LogBuilder {
    /// Start building a log at the given level with the given format template.
    #[must_use]
    pub fn new(level: Level, format_string: impl Into<String>) -> Self {
        Self {
            level,
            format_string: format_string.into(),
            arguments: Default::default(),
            caller: None,
            created_tick: None,
        }
    }

    /// Set positional argument `index` (0..=9) to `value`'s display form.
    ///
    /// # Errors
    /// Returns [`FormatLogError::ArgumentIndexOutOfRange`] for `index >= 10` —
    /// a fatal programming error at the producer, not a recoverable condition.
    pub fn arg(mut self, index: usize, value: impl std::fmt::Display) -> Result<Self> {
        if index >= MAX_ARGUMENTS {
            return Err(FormatLogError::ArgumentIndexOutOfRange { index });
        }
        self.arguments[index] = Some(value.to_string());
        Ok(self)
    }

    /// Convenience: set all ten slots from an ordered iterator, stopping at
    /// whichever of `values` or the ten slots runs out first.
    #[must_use]
    pub fn args<I, D>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: std::fmt::Display,
    {
        for (slot, value) in self.arguments.iter_mut().zip(values) {
            *slot = Some(value.to_string());
        }
        self
    }

    /// Attach caller context.
    #[must_use]
    pub fn caller(mut self, member_name: Option<&str>, file: Option<&str>, line: Option<i32>) -> Self {
        self.caller = Some(CallerInfo {
            id: 0,
            member_name: member_name.map(str::to_string),
            source_file_path: file.map(str::to_string),
            source_line_number: line,
        });
        self
    }

    /// Override the creation tick (tests / replay). Defaults to [`tick::now`].
    #[must_use]
    pub fn created_tick(mut self, tick: i64) -> Self {
        self.created_tick = Some(tick);
        self
    }

    /// Finalize the log. `created_tick` is assigned here, at producer time,
    /// if not already set.
    #[must_use]
    pub fn build(self) -> Log {
        Log {
            id: None,
            level: self.level,
            format_string: self.format_string,
            arguments: self.arguments,
            caller: self.caller,
            created_tick: self.created_tick.unwrap_or_else(tick::now),
            format_id: None,
            arg_ids: Default::default(),
            caller_info_id: None,
        }
    }
}
