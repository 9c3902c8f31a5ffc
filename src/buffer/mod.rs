//! Bounded staging buffer between input plugins and an output.

pub mod error;
pub mod ring;
pub mod stats;

pub use error::BufferError;
pub use ring::{MAX_CAPACITY, MetricBuffer};
pub use stats::BufferStats;
