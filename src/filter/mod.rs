//! Metric name filters.
//!
//! [`compile_filter`] turns a list of patterns into a [`Filter`], picking a
//! literal matcher when no pattern needs the glob engine.

pub mod alternation;
pub mod compile;
pub mod error;
pub mod name_filter;
mod syntax;

pub use alternation::GlobAlternation;
pub use compile::{Filter, GLOB_META, compile_filter, has_meta};
pub use error::FilterError;
pub use name_filter::NameFilter;
