//! Configuration system: TOML file + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{FormatLogError, Result};
use crate::core::paths::resolve_absolute_path;

/// Full engine configuration model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub store: StoreConfig,
    pub flush: FlushConfig,
    pub query: QueryConfig,
    pub quarantine: QuarantineConfig,
}

/// Where per-day store files live, and what they're named.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Base directory under which `DB/Log/yyyy_mm_dd.<ext>` files are created.
    pub base_dir: PathBuf,
    /// File extension for a day-store file, e.g. `<base>/DB/Log/yyyy_mm_dd.<ext>`.
    pub file_extension: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            file_extension: "sqlite3".to_string(),
        }
    }
}

fn default_base_dir() -> PathBuf {
    let home = env::var_os("HOME").map_or_else(|| PathBuf::from("/tmp"), PathBuf::from);
    home.join(".local").join("share").join("formatlog")
}

/// Tuning knobs for the adaptive flush pacer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FlushConfig {
    /// Granularity of the pacer's busy-poll sleep, in milliseconds.
    pub poll_granularity_ms: u64,
    /// Hard upper bound on the wait, in milliseconds, when backlog is empty or small.
    pub max_wait_ms: u64,
    /// Backlog depth above which the pacer caps the wait at `medium_wait_ms`.
    pub medium_backlog_threshold: u64,
    /// Capped wait, in milliseconds, once backlog reaches `medium_backlog_threshold`.
    pub medium_wait_ms: u64,
    /// Backlog depth above which the pacer breaks immediately.
    pub hard_backlog_threshold: u64,
}

impl Default for FlushConfig {
    fn default() -> Self {
        Self {
            poll_granularity_ms: 100,
            max_wait_ms: 5_000,
            medium_backlog_threshold: 1_000,
            medium_wait_ms: 2_500,
            hard_backlog_threshold: 2_000,
        }
    }
}

/// Defaults applied to a freshly built `QueryModel`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QueryConfig {
    pub default_page_size: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
        }
    }
}

/// Where quarantine sidecars are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QuarantineConfig {
    /// Overrides the directory quarantine sidecars are written into.
    /// `None` means "same directory as the day-store that failed to flush".
    pub directory: Option<PathBuf>,
}

impl EngineConfig {
    /// Load config from an explicit TOML file.
    ///
    /// A missing file is an error here — this crate has no daemon-wide
    /// `/etc` install location to fall back to; callers that want a
    /// zero-config engine should use [`EngineConfig::default`] directly.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| FormatLogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut cfg: Self = toml::from_str(&raw)?;
        cfg.store.base_dir = resolve_absolute_path(&cfg.store.base_dir);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate cross-field invariants not expressible in the type system.
    pub fn validate(&self) -> Result<()> {
        if self.query.default_page_size == 0 {
            return Err(FormatLogError::InvalidConfig {
                details: "query.default_page_size must be > 0".to_string(),
            });
        }
        if self.flush.medium_backlog_threshold >= self.flush.hard_backlog_threshold {
            return Err(FormatLogError::InvalidConfig {
                details: "flush.medium_backlog_threshold must be < flush.hard_backlog_threshold"
                    .to_string(),
            });
        }
        if self.flush.medium_wait_ms > self.flush.max_wait_ms {
            return Err(FormatLogError::InvalidConfig {
                details: "flush.medium_wait_ms must be <= flush.max_wait_ms".to_string(),
            });
        }
        Ok(())
    }

    /// Directory that day-store files are written into: `<base>/DB/Log`.
    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.store.base_dir.join("DB").join("Log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_page_size_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.query.default_page_size = 0;
        let err = cfg.validate().expect_err("expected page size error");
        assert!(err.to_string().contains("default_page_size"));
    }

    #[test]
    fn backlog_thresholds_must_be_ordered() {
        let mut cfg = EngineConfig::default();
        cfg.flush.medium_backlog_threshold = 5_000;
        cfg.flush.hard_backlog_threshold = 2_000;
        let err = cfg.validate().expect_err("expected ordering error");
        assert!(err.to_string().contains("medium_backlog_threshold"));
    }

    #[test]
    fn load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert_eq!(err.code(), "FLOG-3002");
    }

    #[test]
    fn load_parses_partial_toml_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("formatlog.toml");
        fs::write(&path, "[query]\ndefault_page_size = 50\n").unwrap();
        let cfg = EngineConfig::load(&path).unwrap();
        assert_eq!(cfg.query.default_page_size, 50);
        assert_eq!(cfg.flush.max_wait_ms, FlushConfig::default().max_wait_ms);
    }

    #[test]
    fn log_dir_derivation() {
        let mut cfg = EngineConfig::default();
        cfg.store.base_dir = PathBuf::from("/data/formatlog");
        assert_eq!(cfg.log_dir(), PathBuf::from("/data/formatlog/DB/Log"));
    }

    #[test]
    fn load_resolves_relative_base_dir_against_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("formatlog.toml");
        fs::write(&path, "[store]\nbase_dir = \"relative-data\"\n").unwrap();
        let cfg = EngineConfig::load(&path).unwrap();
        assert!(cfg.store.base_dir.is_absolute());
    }
}
