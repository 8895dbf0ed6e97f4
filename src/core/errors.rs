//! FLOG-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, FormatLogError>;

/// Top-level error type for the logging engine.
#[derive(Debug, Error)]
pub enum FormatLogError {
    #[error("[FLOG-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[FLOG-1002] base directory unavailable at {path}: {details}")]
    MissingBaseDir { path: PathBuf, details: String },

    #[error("[FLOG-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[FLOG-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[FLOG-2102] SQL failure in {context}: {details}")]
    Sql {
        context: &'static str,
        details: String,
    },

    #[error("[FLOG-2103] argument slot {index} is out of range (0..=9)")]
    ArgumentIndexOutOfRange { index: usize },

    #[error("[FLOG-3001] permission denied for {path}")]
    PermissionDenied { path: PathBuf },

    #[error("[FLOG-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[FLOG-3003] channel closed in component {component}")]
    ChannelClosed { component: &'static str },

    #[error("[FLOG-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl FormatLogError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "FLOG-1001",
            Self::MissingBaseDir { .. } => "FLOG-1002",
            Self::ConfigParse { .. } => "FLOG-1003",
            Self::Serialization { .. } => "FLOG-2101",
            Self::Sql { .. } => "FLOG-2102",
            Self::ArgumentIndexOutOfRange { .. } => "FLOG-2103",
            Self::PermissionDenied { .. } => "FLOG-3001",
            Self::Io { .. } => "FLOG-3002",
            Self::ChannelClosed { .. } => "FLOG-3003",
            Self::Runtime { .. } => "FLOG-3900",
        }
    }

    /// Whether retrying might resolve the failure.
    ///
    /// Used by callers outside the flush worker (e.g. query retries) that
    /// want to decide whether to retry at all; the worker itself always
    /// quarantines a failed batch regardless of this flag.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::ChannelClosed { .. } | Self::Sql { .. } | Self::Runtime { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for FormatLogError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql {
            context: "rusqlite",
            details: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for FormatLogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for FormatLogError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
