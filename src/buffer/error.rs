use thiserror::Error;

/// Errors raised while setting up a metric buffer.
///
/// Inserts and drains have no error path: a full buffer evicts instead of
/// failing, and the loss shows up in the drop counter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Invalid buffer capacity: {capacity} (must be between 1 and {max})", max = super::ring::MAX_CAPACITY)]
    InvalidCapacity { capacity: usize },
}
