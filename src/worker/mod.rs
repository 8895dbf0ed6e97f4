//! Background flush pipeline: pacing, persistence, and failure quarantine.

pub mod pacer;
pub mod quarantine;

#[cfg(feature = "sqlite")]
pub mod flush;

pub use pacer::AdaptivePacer;
pub use quarantine::QuarantineSink;

#[cfg(feature = "sqlite")]
pub use flush::{FlushInfo, FlushWorker};
