//! Domain layer for mecury-agent.
//!
//! Contains the canonical types shared across all modules:
//! - `Metric`: the record moved from inputs to outputs
//! - `FieldValue`: typed metric field
//! - `AgentError`: top-level error type

pub mod error;
pub mod metric;

pub use error::AgentError;
pub use metric::{FieldValue, Metric};
