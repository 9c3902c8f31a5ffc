#![deny(rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
// Noisy pedantic lints suppressed with justification:
#![allow(
    clippy::cast_possible_truncation, // Millisecond durations fit in u64
    clippy::cast_precision_loss,      // Acceptable for fill ratios
    clippy::missing_errors_doc,       // Internal API
    clippy::missing_panics_doc,       // Internal API
    clippy::module_name_repetitions,  // e.g. FilterError in filter module
    clippy::must_use_candidate,       // Annotated selectively on critical APIs
    clippy::doc_markdown              // Internal API
)]

pub mod agent;
pub mod app;
pub mod buffer;
pub mod domain;
pub mod filter;
pub mod plugins;

// Re-export main types for easy access
pub use agent::Agent;
pub use app::{App, Config};
pub use buffer::MetricBuffer;
pub use domain::{AgentError, Metric};
pub use filter::{Filter, compile_filter};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
