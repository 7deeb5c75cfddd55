// File: src/core/timeline.rs
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Deferred engine work. Each action remembers the cursor it was scheduled
/// for so a stale one can be recognised and dropped when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    AdvanceWord { level: u32, word_index: usize },
    AdvanceLevel { level: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    due_ms: u64,
    seq: u64,
    action: ScheduledAction,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_ms, self.seq).cmp(&(other.due_ms, other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A single logical clock in milliseconds. Actions pop in due-time order;
/// actions with the same due time pop in the order they were scheduled.
#[derive(Debug, Default)]
pub struct Timeline {
    now_ms: u64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Entry>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule(&mut self, delay_ms: u64, action: ScheduledAction) {
        let entry = Entry {
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq: self.next_seq,
            action,
        };
        self.next_seq += 1;
        self.queue.push(Reverse(entry));
    }

    /// Pops the earliest action due at or before `until_ms`, moving the clock
    /// to its due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<ScheduledAction> {
        let due = self.queue.peek().map(|Reverse(e)| e.due_ms)?;
        if due > until_ms {
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        self.now_ms = self.now_ms.max(entry.due_ms);
        Some(entry.action)
    }

    /// Moves the clock forward without firing anything.
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    pub fn next_due_in(&self) -> Option<u64> {
        self.queue
            .peek()
            .map(|Reverse(e)| e.due_ms.saturating_sub(self.now_ms))
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(i: usize) -> ScheduledAction {
        ScheduledAction::AdvanceWord { level: 1, word_index: i }
    }

    #[test]
    fn equal_delays_keep_scheduling_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(100, word(0));
        timeline.schedule(100, word(1));
        timeline.schedule(100, word(2));
        let fired: Vec<_> = std::iter::from_fn(|| timeline.pop_due(100)).collect();
        assert_eq!(fired, vec![word(0), word(1), word(2)]);
    }

    #[test]
    fn shorter_delay_fires_first() {
        let mut timeline = Timeline::new();
        timeline.schedule(2000, ScheduledAction::AdvanceLevel { level: 1 });
        timeline.schedule(1500, word(3));
        assert_eq!(timeline.pop_due(5000), Some(word(3)));
        assert_eq!(timeline.now_ms(), 1500);
        assert_eq!(timeline.next_due_in(), Some(500));
    }

    #[test]
    fn nothing_fires_before_due() {
        let mut timeline = Timeline::new();
        timeline.schedule(1500, word(0));
        assert_eq!(timeline.pop_due(1499), None);
        assert_eq!(timeline.pending(), 1);
    }
}
