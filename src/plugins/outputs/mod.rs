pub mod discard;
pub mod stdout;

pub use discard::DiscardOutput;
pub use stdout::StdoutOutput;
