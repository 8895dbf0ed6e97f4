//! Entity model: the satellite types (`Format`, `Argument`, `CallerInfo`),
//! the central `Log`, interval aggregates, tick arithmetic, and hashing.

pub mod argument;
pub mod caller_info;
pub mod format;
pub mod hash;
pub mod interval_stat;
pub mod log;
pub mod tick;

pub use argument::{Argument, MAX_ARGUMENTS};
pub use caller_info::{CallerInfo, CallerInfoKey};
pub use format::Format;
pub use interval_stat::IntervalStat;
pub use log::{Level, Log, LogBuilder};
