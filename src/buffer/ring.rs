use super::error::BufferError;
use super::stats::BufferStats;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Upper bound on the buffer capacity accepted at construction.
pub const MAX_CAPACITY: usize = 100_000_000;

// Slots allocated up front; larger buffers grow on demand.
const PREALLOCATE_LIMIT: usize = 64 * 1024;

struct Ring<T> {
    store: VecDeque<T>,
    total_added: u64,
    total_dropped: u64,
}

/// Fixed-capacity FIFO store with drop-oldest eviction.
///
/// Producers never wait on a full buffer: inserting into a full buffer evicts
/// the oldest unread item and counts it as dropped. Loss is only reported
/// through [`MetricBuffer::drops`] and [`MetricBuffer::total`], never as an
/// error.
///
/// Every mutation of the store and both counters happens under a single lock,
/// so `len() <= capacity()` and `drops() <= total()` hold at every observable
/// instant.
pub struct MetricBuffer<T> {
    capacity: usize,
    ring: Mutex<Ring<T>>,
}

impl<T> MetricBuffer<T> {
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(BufferError::InvalidCapacity { capacity });
        }

        Ok(Self {
            capacity,
            ring: Mutex::new(Ring {
                store: VecDeque::with_capacity(capacity.min(PREALLOCATE_LIMIT)),
                total_added: 0,
                total_dropped: 0,
            }),
        })
    }

    /// Appends one item, evicting the oldest stored item when full.
    pub fn insert(&self, item: T) {
        let mut ring = self.ring.lock();
        Self::place(&mut ring, self.capacity, item);
    }

    /// Appends items in iteration order under one critical section.
    pub fn insert_all<I>(&self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut ring = self.ring.lock();
        for item in items {
            Self::place(&mut ring, self.capacity, item);
        }
    }

    #[inline]
    fn place(ring: &mut Ring<T>, capacity: usize, item: T) {
        ring.total_added += 1;
        if ring.store.len() >= capacity {
            ring.store.pop_front();
            ring.total_dropped += 1;
        }
        ring.store.push_back(item);
    }

    /// Removes and returns up to `max` items, oldest first.
    ///
    /// Returns whatever is stored right now; it never waits for more data.
    pub fn drain(&self, max: usize) -> Vec<T> {
        let mut ring = self.ring.lock();
        let n = ring.store.len().min(max);
        ring.store.drain(..n).collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.ring.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.lock().store.is_empty()
    }

    /// Lifetime count of items evicted to make room for newer ones.
    pub fn drops(&self) -> u64 {
        self.ring.lock().total_dropped
    }

    /// Lifetime count of insert attempts.
    pub fn total(&self) -> u64 {
        self.ring.lock().total_added
    }

    /// Consistent snapshot of length and counters taken under one lock.
    pub fn stats(&self) -> BufferStats {
        let ring = self.ring.lock();
        BufferStats {
            capacity: self.capacity,
            len: ring.store.len(),
            total: ring.total_added,
            dropped: ring.total_dropped,
        }
    }
}

impl<T> std::fmt::Debug for MetricBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("MetricBuffer")
            .field("capacity", &stats.capacity)
            .field("len", &stats.len)
            .field("total", &stats.total)
            .field("dropped", &stats.dropped)
            .finish()
    }
}
