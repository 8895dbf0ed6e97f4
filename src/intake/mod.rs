//! Producer-facing intake path.

pub mod queue;

pub use queue::IntakeQueue;
