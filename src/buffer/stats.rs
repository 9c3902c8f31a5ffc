use serde::Serialize;

/// Point-in-time view of a [`MetricBuffer`](super::MetricBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BufferStats {
    pub capacity: usize,
    pub len: usize,
    pub total: u64,
    pub dropped: u64,
}

impl BufferStats {
    pub fn fill_ratio(&self) -> f64 {
        self.len as f64 / self.capacity as f64
    }

    pub fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    /// Drops recorded since an earlier snapshot of the same buffer.
    pub fn dropped_since(&self, earlier: &BufferStats) -> u64 {
        self.dropped.saturating_sub(earlier.dropped)
    }
}
