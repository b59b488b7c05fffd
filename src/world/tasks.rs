//! Delayed actions on the simulation timeline.
//!
//! Actions are scheduled `delay_ms` after the current simulated time and fire
//! in `(due_ms, sequence)` order once the clock reaches them. The queue is
//! cleared when the session ends.

use bevy::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    /// Resolve a player swing. `zone_epoch` is the zone the swing started in;
    /// the hit is dropped if the zone changed meanwhile.
    AttackHit { zone_epoch: u64 },
    /// End the attack lock. Not tied to a zone.
    AttackRelease,
}

#[derive(Debug, Clone)]
pub struct ScheduledTask {
    pub due_ms: u64,
    pub sequence: u64,
    pub action: TaskAction,
}

// Min-heap: the smallest (due_ms, sequence) is the greatest element.
impl PartialEq for ScheduledTask {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.sequence == other.sequence
    }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Resource, Debug, Default)]
pub struct TaskQueue {
    heap: BinaryHeap<ScheduledTask>,
    next_sequence: u64,
}

impl TaskQueue {
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, action: TaskAction) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(ScheduledTask {
            due_ms: now_ms + delay_ms,
            sequence,
            action,
        });
    }

    /// Pop the next task if it is due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<ScheduledTask> {
        if self.heap.peek().is_some_and(|task| task.due_ms <= now_ms) {
            self.heap.pop()
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
