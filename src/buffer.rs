use std::collections::VecDeque;

use crate::model::tick::Tick;

/// Append-only tick history bounded to the most recent `capacity` entries.
///
/// Ticks are kept in arrival order. Out-of-order timestamps are accepted as-is;
/// the alignment stage buckets by timestamp, not by position.
#[derive(Debug, Clone)]
pub struct TickBuffer {
    ticks: VecDeque<Tick>,
    capacity: usize,
    total_appended: u64,
}

impl TickBuffer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "tick buffer capacity must be > 0");
        Self {
            ticks: VecDeque::with_capacity(capacity + 1),
            capacity,
            total_appended: 0,
        }
    }

    /// Append one tick, evicting the oldest entries beyond capacity.
    pub fn append(&mut self, tick: Tick) {
        self.ticks.push_back(tick);
        self.total_appended += 1;
        while self.ticks.len() > self.capacity {
            self.ticks.pop_front();
        }
    }

    /// Current contents in insertion order.
    pub fn snapshot(&self) -> Vec<Tick> {
        self.ticks.iter().cloned().collect()
    }

    /// The last `n` ticks in insertion order.
    pub fn recent(&self, n: usize) -> Vec<Tick> {
        let skip = self.ticks.len().saturating_sub(n);
        self.ticks.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of ticks ever appended, including evicted ones.
    pub fn total_appended(&self) -> u64 {
        self.total_appended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(i: u64) -> Tick {
        Tick::new("BTCUSDT", 100.0 + i as f64, i * 1_000)
    }

    #[test]
    fn evicts_oldest_first() {
        let mut buf = TickBuffer::new(3);
        for i in 0..5 {
            buf.append(tick(i));
        }
        let prices: Vec<f64> = buf.snapshot().iter().map(|t| t.price).collect();
        assert_eq!(prices, vec![102.0, 103.0, 104.0]);
        assert_eq!(buf.total_appended(), 5);
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let mut buf = TickBuffer::new(10);
        for i in 0..4 {
            buf.append(tick(i));
        }
        let recent: Vec<u64> = buf.recent(2).iter().map(|t| t.timestamp_ms).collect();
        assert_eq!(recent, vec![2_000, 3_000]);
        assert_eq!(buf.recent(50).len(), 4);
    }

    #[test]
    #[should_panic(expected = "tick buffer capacity must be > 0")]
    fn zero_capacity_panics() {
        let _ = TickBuffer::new(0);
    }
}
