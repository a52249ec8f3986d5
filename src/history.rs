//! Bounded rolling window of recent snapshots for display

use crate::snapshot::Snapshot;
use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 100;

/// Derived statistics over the buffered snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistorySummary {
    pub count: usize,
    pub average_cpu: f64,
    pub peak_memory: f64,
}

/// FIFO buffer of snapshots in insertion order, capped at `capacity`.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<Snapshot>,
    capacity: usize,
}

impl HistoryBuffer {
    /// A zero capacity is raised to one so the latest snapshot is always kept.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append unless `snapshot` repeats the last timestamp. Returns whether
    /// the snapshot was stored.
    pub fn append(&mut self, snapshot: Snapshot) -> bool {
        if let Some(last) = self.entries.back() {
            if last.timestamp == snapshot.timestamp {
                return false;
            }
        }
        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        true
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    pub fn average_cpu(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.entries.iter().map(|s| s.cpu_usage).sum();
        sum / self.entries.len() as f64
    }

    pub fn peak_memory(&self) -> f64 {
        self.entries
            .iter()
            .map(|s| s.mem_usage)
            .fold(0.0, f64::max)
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            count: self.len(),
            average_cpu: self.average_cpu(),
            peak_memory: self.peak_memory(),
        }
    }

    /// CPU percentages oldest first, in the precision plot widgets take.
    pub fn cpu_series(&self) -> Vec<f32> {
        self.entries.iter().map(|s| s.cpu_usage as f32).collect()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Snapshot> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(timestamp: f64, cpu: f64, mem: f64) -> Snapshot {
        Snapshot {
            timestamp,
            cpu_usage: cpu,
            mem_usage: mem,
            ..Snapshot::default()
        }
    }

    #[test]
    fn never_exceeds_capacity_and_evicts_oldest() {
        let mut history = HistoryBuffer::default();
        for i in 0..250 {
            history.append(snap(i as f64, 0.0, 0.0));
            assert!(history.len() <= DEFAULT_CAPACITY);
        }
        assert_eq!(history.len(), 100);
        let timestamps: Vec<f64> = history.iter().map(|s| s.timestamp).collect();
        let expected: Vec<f64> = (150..250).map(|i| i as f64).collect();
        assert_eq!(timestamps, expected);
    }

    #[test]
    fn duplicate_timestamp_is_ignored() {
        let mut history = HistoryBuffer::default();
        assert!(history.append(snap(1.0, 5.0, 1.0)));
        assert!(!history.append(snap(1.0, 99.0, 99.0)));
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().map(|s| s.cpu_usage), Some(5.0));
    }

    #[test]
    fn only_last_timestamp_is_compared() {
        let mut history = HistoryBuffer::default();
        history.append(snap(1.0, 0.0, 0.0));
        history.append(snap(2.0, 0.0, 0.0));
        assert!(history.append(snap(1.0, 0.0, 0.0)));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn average_cpu() {
        let mut history = HistoryBuffer::default();
        assert_eq!(history.average_cpu(), 0.0);
        for (i, cpu) in [10.0, 20.0, 30.0].into_iter().enumerate() {
            history.append(snap(i as f64, cpu, 0.0));
        }
        assert_eq!(history.average_cpu(), 20.0);
    }

    #[test]
    fn peak_memory() {
        let mut history = HistoryBuffer::default();
        assert_eq!(history.peak_memory(), 0.0);
        for (i, mem) in [100.0, 256.0, 50.0].into_iter().enumerate() {
            history.append(snap(i as f64, 0.0, mem));
        }
        assert_eq!(history.peak_memory(), 256.0);
    }

    #[test]
    fn dedup_scenario() {
        let mut history = HistoryBuffer::default();
        for (ts, cpu) in [(1.0, 5.0), (2.0, 10.0), (2.0, 10.0), (3.0, 15.0)] {
            history.append(snap(ts, cpu, 0.0));
        }
        let timestamps: Vec<f64> = history.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![1.0, 2.0, 3.0]);
        assert_eq!(history.average_cpu(), 10.0);
    }

    #[test]
    fn clear_empties_buffer() {
        let mut history = HistoryBuffer::new(3);
        history.append(snap(1.0, 1.0, 1.0));
        history.clear();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert_eq!(history.summary(), HistorySummary::default());
    }

    #[test]
    fn zero_capacity_keeps_latest() {
        let mut history = HistoryBuffer::new(0);
        history.append(snap(1.0, 1.0, 1.0));
        history.append(snap(2.0, 2.0, 2.0));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.latest().map(|s| s.timestamp), Some(2.0));
    }

    #[test]
    fn cpu_series_is_oldest_first() {
        let mut history = HistoryBuffer::default();
        history.append(snap(1.0, 1.5, 0.0));
        history.append(snap(2.0, 2.5, 0.0));
        assert_eq!(history.cpu_series(), vec![1.5f32, 2.5f32]);
    }
}
