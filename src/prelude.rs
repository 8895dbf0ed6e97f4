//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use formatlog::prelude::*;
//!
//! let config = EngineConfig::default();
//! let engine = engine(config);
//! let log = LogBuilder::new(Level::Info, "hello {0}").arg(0, "world").unwrap().build();
//! engine.add(log);
//! ```

// Core
pub use crate::core::config::EngineConfig;
pub use crate::core::errors::{FormatLogError, Result};

// Model
pub use crate::model::{Argument, CallerInfo, Format, IntervalStat, Level, Log, LogBuilder};

// Lifecycle
pub use crate::lifecycle::{engine, Engine};

// Query
pub use crate::query::{OrderType, QueryModel};

#[cfg(feature = "sqlite")]
pub use crate::query::{KeysetPage, QueryEngine};

#[cfg(feature = "sqlite")]
pub use crate::worker::FlushInfo;
