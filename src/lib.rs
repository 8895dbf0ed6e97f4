#![forbid(unsafe_code)]

//! A structured, parameterized logging engine embedded in a host
//! application.
//!
//! Producers emit logs with a format template, up to ten positional
//! arguments, and optional caller context. A lock-free double-buffered
//! intake queue hands batches to a background worker that deduplicates
//! repeating strings at persistence time, bulk-inserts into a per-day
//! relational store, and maintains 10-minute interval aggregates. A keyset
//! pagination query engine serves filtered, bidirectionally cursored reads
//! back out of that store.
//!
//! See [`prelude`] for the common entry points: [`lifecycle::engine`] to
//! obtain the process-wide [`lifecycle::Engine`], [`model::LogBuilder`] to
//! construct a log, and [`query::QueryModel`] to page back through what was
//! persisted.

pub mod core;
pub mod intake;
pub mod lifecycle;
pub mod model;
pub mod prelude;
pub mod query;
pub mod store;
pub mod worker;
