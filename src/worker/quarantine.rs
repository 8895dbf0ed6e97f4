//! Quarantine sink: best-effort sidecar persistence of a batch that failed
//! to flush.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::log::Log;
use crate::model::tick;

/// One batch's worth of quarantined logs, serialized verbatim.
#[derive(Debug, Serialize)]
struct QuarantineRecord<'a> {
    date: String,
    exception_message: &'a str,
    logs: Vec<QuarantineLog<'a>>,
}

#[derive(Debug, Serialize)]
struct QuarantineLog<'a> {
    level: &'static str,
    format_string: &'a str,
    arguments: &'a [Option<String>],
    created_tick: i64,
}

/// Writes `Error_yyyy_mm_dd.<uuid>.json` and appends to `Error_yyyy_mm_dd.txt`
/// in a day-store's directory. Every write is best-effort: an inner failure
/// is logged via `tracing` and swallowed, never propagated to the worker —
/// quarantining never blocks the worker from proceeding.
pub struct QuarantineSink {
    directory: PathBuf,
}

impl QuarantineSink {
    #[must_use]
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    /// Persist `logs` plus `exception_message` as quarantine sidecars for `date`.
    pub fn quarantine(&self, date: NaiveDate, logs: &[Log], exception_message: &str) {
        if let Err(err) = std::fs::create_dir_all(&self.directory) {
            tracing::warn!(error = %err, dir = %self.directory.display(), "quarantine directory unavailable");
            return;
        }

        let stem = tick::date_stem(date);
        let id = uuid::Uuid::new_v4();
        let json_name = format!("Error_{stem}.{id}.json");
        let json_path = self.directory.join(&json_name);

        let record = QuarantineRecord {
            date: stem.clone(),
            exception_message,
            logs: logs
                .iter()
                .map(|log| QuarantineLog {
                    level: log.level.as_str(),
                    format_string: &log.format_string,
                    arguments: &log.arguments,
                    created_tick: log.created_tick,
                })
                .collect(),
        };

        match serde_json::to_vec_pretty(&record) {
            Ok(bytes) => {
                if let Err(err) = std::fs::write(&json_path, bytes) {
                    tracing::warn!(error = %err, path = %json_path.display(), "failed to write quarantine json");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize quarantine record");
            }
        }

        self.append_text_line(&stem, &json_name, exception_message);
    }

    fn append_text_line(&self, stem: &str, json_name: &str, exception_message: &str) {
        use std::io::Write;

        let txt_path = self.txt_path(stem);
        let line = format!("{stem}\t{json_name}\t{exception_message}\n");
        let result = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&txt_path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(err) = result {
            tracing::warn!(error = %err, path = %txt_path.display(), "failed to append quarantine text line");
        }
    }

    fn txt_path(&self, stem: &str) -> PathBuf {
        self.directory.join(format!("Error_{stem}.txt"))
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}
