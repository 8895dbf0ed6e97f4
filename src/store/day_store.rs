//! Per-day relational store: schema, satellite dedup resolution, bulk
//! persist, and the raw keyset-select used by [`crate::query::engine`].

#![allow(missing_docs)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};

use crate::core::errors::{FormatLogError, Result};
use crate::model::argument::MAX_ARGUMENTS;
use crate::model::caller_info::{CallerInfo, CallerInfoKey};
use crate::model::log::{Level, Log};

/// One resolved, persisted satellite id lookup built during a flush.
#[derive(Debug, Default)]
struct SatelliteMaps {
    formats: HashMap<String, i64>,
    arguments: HashMap<Option<String>, i64>,
    callers: HashMap<CallerInfoKey, i64>,
}

/// Timing split for one flush, reported via `FlushInfo`.
#[derive(Debug, Clone, Copy)]
pub struct FlushTiming {
    pub prep: std::time::Duration,
    pub write: std::time::Duration,
}

/// An open connection to one calendar day's on-disk store.
pub struct DayStore {
    conn: Connection,
    path: PathBuf,
}

impl DayStore {
    /// Open (or create) the store file at `path`, applying pragmas and schema.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| FormatLogError::io(parent, source))?;
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        apply_pragmas(&conn)?;
        apply_schema(&conn)?;

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Open the store file read-only, for query callers that must not
    /// trigger file creation — a missing day-file is not an error.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run one full flush batch: resolve satellites, rewrite `logs` in
    /// place, compute and persist interval stats, insert the logs — all in
    /// one transaction.
    pub fn flush_batch(&mut self, logs: &mut [Log]) -> Result<FlushTiming> {
        let prep_start = std::time::Instant::now();
        let tx = self.conn.transaction()?;

        let maps = resolve_satellites(&tx, logs)?;
        for log in logs.iter_mut() {
            log.resolve_format(
                *maps
                    .formats
                    .get(&log.format_string)
                    .expect("every format_string in the batch was just resolved"),
            );
            if let Some(caller) = &log.caller {
                let key = CallerInfoKey::from(caller);
                log.resolve_caller(*maps.callers.get(&key).expect("caller just resolved"));
            }
            for slot in 0..MAX_ARGUMENTS {
                if let Some(value) = &log.arguments[slot] {
                    let id = *maps
                        .arguments
                        .get(&Some(value.clone()))
                        .expect("argument slot just resolved");
                    log.resolve_argument(slot, id);
                }
            }
        }
        let prep = prep_start.elapsed();

        let write_start = std::time::Instant::now();
        let stats = compute_interval_stats(logs);
        persist_logs(&tx, logs)?;
        persist_interval_stats(&tx, &stats)?;
        tx.commit()?;
        let write = write_start.elapsed();

        Ok(FlushTiming { prep, write })
    }

    /// The current `MAX(Logs.Id)`, or 0 if empty — a cheap approximate
    /// count used as `total_records`.
    pub fn max_log_id(&self) -> Result<i64> {
        let id: Option<i64> =
            self.conn
                .query_row("SELECT MAX(Id) FROM Logs", [], |row| row.get(0))?;
        Ok(id.unwrap_or(0))
    }

    /// Run the raw keyset select described by [`KeysetFilter`] plus an
    /// explicit comparison/order/limit triple. The caller (query::engine)
    /// owns the cursor algorithm; this method only executes one SQL scan.
    pub fn select_logs(
        &self,
        filter: &KeysetFilter<'_>,
        cursor_cmp: Option<(&'static str, i64)>,
        sql_order: &'static str,
        limit: u32,
    ) -> Result<Vec<Log>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut sql_params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(s) = filter.format_substr {
            clauses.push("Formats.FormatString LIKE ?".to_string());
            sql_params.push(Box::new(like_pattern(s)));
        }
        if let Some(s) = filter.argument_substr {
            let mut slots = Vec::with_capacity(MAX_ARGUMENTS);
            for i in 0..MAX_ARGUMENTS {
                slots.push(format!("Arg{i}.Value LIKE ?"));
                sql_params.push(Box::new(like_pattern(s)));
            }
            clauses.push(format!("({})", slots.join(" OR ")));
        }
        if let Some(s) = filter.caller_substr {
            clauses.push(
                "(CallerInfos.MemberName LIKE ? OR CallerInfos.SourceFilePath LIKE ? \
                 OR CAST(CallerInfos.SourceLineNumber AS TEXT) LIKE ?)"
                    .to_string(),
            );
            let pat = like_pattern(s);
            sql_params.push(Box::new(pat.clone()));
            sql_params.push(Box::new(pat.clone()));
            sql_params.push(Box::new(pat));
        }
        if let Some(level) = filter.level {
            clauses.push("Logs.Level = ?".to_string());
            sql_params.push(Box::new(level.as_str()));
        }
        if let Some(start) = filter.start_tick {
            clauses.push("Logs.CreatedTick >= ?".to_string());
            sql_params.push(Box::new(start));
        }
        if let Some(end) = filter.end_tick {
            clauses.push("Logs.CreatedTick <= ?".to_string());
            sql_params.push(Box::new(end));
        }
        if let Some((op, bound)) = cursor_cmp {
            clauses.push(format!("Logs.CreatedTick {op} ?"));
            sql_params.push(Box::new(bound));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let arg_cols: Vec<String> = (0..MAX_ARGUMENTS).map(|i| format!("Arg{i}.Value")).collect();
        let arg_joins: Vec<String> = (0..MAX_ARGUMENTS)
            .map(|i| format!("LEFT JOIN Arguments AS Arg{i} ON Arg{i}.Id = Logs.Arg{i}Id"))
            .collect();

        let sql = format!(
            "SELECT Logs.Id, Logs.Level, Formats.FormatString, Logs.CreatedTick,
                    Logs.FormatId, Logs.CallerInfoId,
                    CallerInfos.MemberName, CallerInfos.SourceFilePath, CallerInfos.SourceLineNumber,
                    {}
             FROM Logs
             JOIN Formats ON Formats.Id = Logs.FormatId
             LEFT JOIN CallerInfos ON CallerInfos.Id = Logs.CallerInfoId
             {}
             {}
             ORDER BY Logs.CreatedTick {}
             LIMIT ?",
            arg_cols.join(", "),
            arg_joins.join("\n             "),
            where_clause,
            sql_order,
        );
        sql_params.push(Box::new(i64::from(limit)));

        let param_refs: Vec<&dyn rusqlite::ToSql> = sql_params.iter().map(AsRef::as_ref).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(param_refs.as_slice(), row_to_log)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Filters shared by every keyset scan, mirroring `QueryModel`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeysetFilter<'a> {
    pub format_substr: Option<&'a str>,
    pub argument_substr: Option<&'a str>,
    pub caller_substr: Option<&'a str>,
    pub level: Option<Level>,
    pub start_tick: Option<i64>,
    pub end_tick: Option<i64>,
}

fn like_pattern(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{escaped}%")
}

fn row_to_log(row: &rusqlite::Row<'_>) -> rusqlite::Result<Log> {
    let level_str: String = row.get(1)?;
    let level = Level::from_str(&level_str).unwrap_or(Level::Info);
    let format_string: String = row.get(2)?;
    let created_tick: i64 = row.get(3)?;
    let format_id: i64 = row.get(4)?;
    let caller_info_id: Option<i64> = row.get(5)?;
    let member_name: Option<String> = row.get(6)?;
    let source_file_path: Option<String> = row.get(7)?;
    let source_line_number: Option<i32> = row.get(8)?;

    let mut arguments: [Option<String>; MAX_ARGUMENTS] = Default::default();
    for (slot, value) in arguments.iter_mut().enumerate() {
        *value = row.get(9 + slot)?;
    }

    let caller = caller_info_id.map(|id| CallerInfo {
        id,
        member_name,
        source_file_path,
        source_line_number,
    });

    Ok(Log {
        id: row.get(0)?,
        level,
        format_string,
        arguments,
        caller,
        created_tick,
        format_id: Some(format_id),
        arg_ids: Default::default(),
        caller_info_id,
    })
}

fn resolve_satellites(tx: &rusqlite::Transaction<'_>, logs: &[Log]) -> Result<SatelliteMaps> {
    let mut maps = SatelliteMaps::default();

    for log in logs {
        if !maps.formats.contains_key(&log.format_string) {
            let id = resolve_or_insert(
                tx,
                "SELECT Id FROM Formats WHERE FormatString = ?1",
                "INSERT INTO Formats (FormatString) VALUES (?1)",
                params![log.format_string],
            )?;
            maps.formats.insert(log.format_string.clone(), id);
        }

        if let Some(caller) = &log.caller {
            let key = CallerInfoKey::from(caller);
            if !maps.callers.contains_key(&key) {
                let id = resolve_or_insert(
                    tx,
                    "SELECT Id FROM CallerInfos \
                     WHERE MemberName IS ?1 AND SourceFilePath IS ?2 AND SourceLineNumber IS ?3",
                    "INSERT INTO CallerInfos (MemberName, SourceFilePath, SourceLineNumber) \
                     VALUES (?1, ?2, ?3)",
                    params![key.member_name, key.source_file_path, key.source_line_number],
                )?;
                maps.callers.insert(key, id);
            }
        }

        for value in log.arguments.iter().flatten() {
            let key = Some(value.clone());
            if !maps.arguments.contains_key(&key) {
                let id = resolve_or_insert(
                    tx,
                    "SELECT Id FROM Arguments WHERE Value IS ?1",
                    "INSERT INTO Arguments (Value) VALUES (?1)",
                    params![value],
                )?;
                maps.arguments.insert(key, id);
            }
        }
    }

    Ok(maps)
}

/// Find the row matching `select_sql` + `args`, or insert one via
/// `insert_sql` and return its new id — select-then-insert, without relying
/// on SQLite's NULL-distinct `UNIQUE` semantics, which would otherwise admit
/// duplicate null rows.
fn resolve_or_insert(
    tx: &rusqlite::Transaction<'_>,
    select_sql: &str,
    insert_sql: &str,
    args: &[&dyn rusqlite::ToSql],
) -> Result<i64> {
    if let Some(id) = tx
        .query_row(select_sql, args, |row| row.get(0))
        .optional()?
    {
        return Ok(id);
    }
    tx.execute(insert_sql, args)?;
    Ok(tx.last_insert_rowid())
}

fn compute_interval_stats(logs: &[Log]) -> Vec<crate::model::interval_stat::IntervalStat> {
    use crate::model::interval_stat::IntervalStat;
    use crate::model::tick::floor_to_interval;

    let mut buckets: HashMap<i64, i32> = HashMap::new();
    for log in logs {
        *buckets.entry(floor_to_interval(log.created_tick)).or_insert(0) += 1;
    }
    let mut stats: Vec<IntervalStat> = buckets
        .into_iter()
        .map(|(interval_start, log_count)| IntervalStat {
            interval_start,
            log_count,
        })
        .collect();
    stats.sort_by_key(|s| s.interval_start);
    stats
}

fn persist_logs(tx: &rusqlite::Transaction<'_>, logs: &[Log]) -> Result<()> {
    let cols: Vec<String> = (0..MAX_ARGUMENTS).map(|i| format!("Arg{i}Id")).collect();
    let placeholders: Vec<String> = (5..5 + MAX_ARGUMENTS).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO Logs (Level, FormatId, CallerInfoId, CreatedTick, {}) \
         VALUES (?1, ?2, ?3, ?4, {})",
        cols.join(", "),
        placeholders.join(", "),
    );
    let mut stmt = tx.prepare_cached(&sql)?;
    for log in logs {
        let level_str = log.level.as_str();
        let mut params_vec: Vec<&dyn rusqlite::ToSql> =
            vec![&level_str, &log.format_id, &log.caller_info_id, &log.created_tick];
        for id in &log.arg_ids {
            params_vec.push(id);
        }
        stmt.execute(params_vec.as_slice())?;
    }
    Ok(())
}

fn persist_interval_stats(
    tx: &rusqlite::Transaction<'_>,
    stats: &[crate::model::interval_stat::IntervalStat],
) -> Result<()> {
    let mut stmt = tx.prepare_cached(
        "INSERT INTO LogIntervalStats (IntervalStart, LogCount) VALUES (?1, ?2) \
         ON CONFLICT(IntervalStart) DO UPDATE SET LogCount = LogCount + excluded.LogCount",
    )?;
    for stat in stats {
        stmt.execute(params![stat.interval_start, stat.log_count])?;
    }
    Ok(())
}

/// Path to the per-day store file: `<log_dir>/yyyy_mm_dd.<ext>`.
#[must_use]
pub fn day_store_path(log_dir: &Path, date: NaiveDate, extension: &str) -> PathBuf {
    log_dir.join(format!(
        "{}.{extension}",
        crate::model::tick::date_stem(date)
    ))
}

/// Whether a day-store file already exists, without creating it.
#[must_use]
pub fn log_file_exists(log_dir: &Path, date: NaiveDate, extension: &str) -> bool {
    day_store_path(log_dir, date, extension).is_file()
}

/// All calendar dates that have a day-store file in `log_dir`.
pub fn list_log_files(log_dir: &Path, extension: &str) -> Result<Vec<NaiveDate>> {
    if !log_dir.is_dir() {
        return Ok(Vec::new());
    }
    let suffix = format!(".{extension}");
    let mut dates = Vec::new();
    for entry in std::fs::read_dir(log_dir).map_err(|source| FormatLogError::io(log_dir, source))? {
        let entry = entry.map_err(|source| FormatLogError::io(log_dir, source))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(stem) = name.strip_suffix(&suffix) else {
            continue;
        };
        if let Ok(date) = NaiveDate::parse_from_str(stem, "%Y_%m_%d") {
            dates.push(date);
        }
    }
    dates.sort();
    Ok(dates)
}

fn apply_pragmas(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )?;
    Ok(())
}

fn apply_schema(conn: &Connection) -> Result<()> {
    let arg_cols: Vec<String> = (0..MAX_ARGUMENTS)
        .map(|i| format!("Arg{i}Id INTEGER REFERENCES Arguments(Id)"))
        .collect();
    let logs_table = format!(
        "CREATE TABLE IF NOT EXISTS Logs (
            Id INTEGER PRIMARY KEY AUTOINCREMENT,
            Level TEXT NOT NULL,
            FormatId INTEGER NOT NULL REFERENCES Formats(Id),
            CallerInfoId INTEGER REFERENCES CallerInfos(Id),
            {},
            CreatedTick INTEGER NOT NULL
        );",
        arg_cols.join(",\n            "),
    );

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS Formats (
            Id INTEGER PRIMARY KEY AUTOINCREMENT,
            FormatString TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS Arguments (
            Id INTEGER PRIMARY KEY AUTOINCREMENT,
            Value TEXT UNIQUE
        );

        CREATE TABLE IF NOT EXISTS CallerInfos (
            Id INTEGER PRIMARY KEY AUTOINCREMENT,
            MemberName TEXT,
            SourceFilePath TEXT,
            SourceLineNumber INTEGER,
            UNIQUE(MemberName, SourceFilePath, SourceLineNumber)
        );",
    )?;
    conn.execute_batch(&logs_table)?;
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_logs_level ON Logs(Level);
         CREATE INDEX IF NOT EXISTS idx_logs_created_tick ON Logs(CreatedTick);
         CREATE INDEX IF NOT EXISTS idx_logs_format_id ON Logs(FormatId);
         CREATE INDEX IF NOT EXISTS idx_logs_caller_info_id ON Logs(CallerInfoId);
         CREATE INDEX IF NOT EXISTS idx_logs_id_created_tick ON Logs(Id, CreatedTick);

         CREATE TABLE IF NOT EXISTS LogIntervalStats (
            IntervalStart INTEGER PRIMARY KEY,
            LogCount INTEGER NOT NULL
         );",
    )?;
    Ok(())
}
