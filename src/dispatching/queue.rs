//! Ready-set containers.
//!
//! Every container holds indices into the run's own copy of the process
//! list and is owned by exactly one policy invocation.
//!
//! | Container | Order | Used by |
//! |-----------|-------|---------|
//! | `FifoQueue` | insertion | Round Robin |
//! | `ReadyHeap` | a [`SelectionRule`] key, smallest first | SJF, SRTF, Priority, Aging, Weighted-fair |
//! | `MultilevelQueue` | lowest non-empty level, FIFO within a level | MLFQ |
//!
//! `Arrivals` feeds all of them: it releases processes in arrival order as
//! the clock passes their arrival time.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use super::{SelectionRule, SimulationState};
use crate::models::{arrival_order, ProcessDescriptor, Time};

/// Processes not yet admitted to a ready set, in arrival order.
///
/// Equal arrivals are released in input order.
#[derive(Debug, Clone)]
pub struct Arrivals<'a> {
    processes: &'a [ProcessDescriptor],
    order: Vec<usize>,
    cursor: usize,
}

impl<'a> Arrivals<'a> {
    /// Creates the arrival stream for a process list.
    pub fn new(processes: &'a [ProcessDescriptor]) -> Self {
        Self {
            processes,
            order: arrival_order(processes),
            cursor: 0,
        }
    }

    /// Arrival time of the next process to be released.
    pub fn next_arrival(&self) -> Option<Time> {
        self.order
            .get(self.cursor)
            .map(|&i| self.processes[i].arrival)
    }

    /// Releases the next process if it has arrived by `now`.
    pub fn pop_arrived(&mut self, now: Time) -> Option<usize> {
        let &index = self.order.get(self.cursor)?;
        if self.processes[index].arrival <= now {
            self.cursor += 1;
            Some(index)
        } else {
            None
        }
    }
}

/// First-in first-out ready queue.
#[derive(Debug, Clone, Default)]
pub struct FifoQueue {
    queue: VecDeque<usize>,
}

impl FifoQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends to the back.
    pub fn push_back(&mut self, index: usize) {
        self.queue.push_back(index);
    }

    /// Removes from the front.
    pub fn pop_front(&mut self) -> Option<usize> {
        self.queue.pop_front()
    }

    /// Number of queued entries.
    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Min-heap ordered by a [`SelectionRule`].
///
/// Keys are computed when an entry is pushed. Rules whose key depends on
/// state that changes while an entry waits must call [`ReadyHeap::rekey`].
#[derive(Debug, Clone)]
pub struct ReadyHeap<R: SelectionRule> {
    rule: R,
    heap: BinaryHeap<Reverse<(R::Key, usize)>>,
}

impl<R: SelectionRule> ReadyHeap<R> {
    /// Creates an empty heap ordered by `rule`.
    pub fn new(rule: R) -> Self {
        Self {
            rule,
            heap: BinaryHeap::new(),
        }
    }

    /// The ordering rule.
    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Inserts `index`, keyed against the current state.
    pub fn push(&mut self, index: usize, processes: &[ProcessDescriptor], state: &SimulationState) {
        let key = self.rule.key(&processes[index], state);
        self.heap.push(Reverse((key, index)));
    }

    /// Removes the entry with the smallest key.
    pub fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|Reverse((_, index))| index)
    }

    /// Recomputes every key against the current state.
    pub fn rekey(&mut self, processes: &[ProcessDescriptor], state: &SimulationState) {
        let entries = std::mem::take(&mut self.heap).into_vec();
        self.heap = entries
            .into_iter()
            .map(|Reverse((_, index))| Reverse((self.rule.key(&processes[index], state), index)))
            .collect();
    }
}

/// Array of FIFO queues; level 0 is served first.
#[derive(Debug, Clone)]
pub struct MultilevelQueue {
    levels: Vec<VecDeque<usize>>,
}

impl MultilevelQueue {
    /// Creates `levels` empty queues.
    pub fn new(levels: usize) -> Self {
        Self {
            levels: vec![VecDeque::new(); levels],
        }
    }

    /// Appends to the back of `level`, clamped to the last level.
    pub fn push(&mut self, level: usize, index: usize) {
        let last = self.levels.len().saturating_sub(1);
        if let Some(queue) = self.levels.get_mut(level.min(last)) {
            queue.push_back(index);
        }
    }

    /// Removes the front of the first non-empty level.
    pub fn pop(&mut self) -> Option<(usize, usize)> {
        self.levels
            .iter_mut()
            .enumerate()
            .find_map(|(level, queue)| queue.pop_front().map(|index| (level, index)))
    }

    /// Level a process moves to after using its full quantum at `level`.
    pub fn demoted(&self, level: usize) -> usize {
        (level + 1).min(self.levels.len().saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules::{AgedPriority, ShortestJob};

    fn procs() -> Vec<ProcessDescriptor> {
        vec![
            ProcessDescriptor::new(1, 4, 3),
            ProcessDescriptor::new(2, 0, 5),
            ProcessDescriptor::new(3, 0, 2),
        ]
    }

    #[test]
    fn test_arrivals_release_in_order() {
        let procs = procs();
        let mut arrivals = Arrivals::new(&procs);
        assert_eq!(arrivals.next_arrival(), Some(0));
        assert_eq!(arrivals.pop_arrived(0), Some(1));
        assert_eq!(arrivals.pop_arrived(0), Some(2));
        assert_eq!(arrivals.pop_arrived(3), None);
        assert_eq!(arrivals.next_arrival(), Some(4));
        assert_eq!(arrivals.pop_arrived(4), Some(0));
        assert_eq!(arrivals.next_arrival(), None);
        assert_eq!(arrivals.pop_arrived(100), None);
    }

    #[test]
    fn test_fifo_order() {
        let mut q = FifoQueue::new();
        q.push_back(2);
        q.push_back(0);
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop_front(), Some(2));
        assert_eq!(q.pop_front(), Some(0));
        assert_eq!(q.pop_front(), None);
    }

    #[test]
    fn test_heap_pops_smallest_key() {
        let procs = procs();
        let state = SimulationState::new(&procs);
        let mut heap = ReadyHeap::new(ShortestJob);
        for i in 0..procs.len() {
            heap.push(i, &procs, &state);
        }
        assert_eq!(heap.pop(), Some(2));
        assert_eq!(heap.pop(), Some(0));
        assert_eq!(heap.pop(), Some(1));
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn test_heap_rekey_reflects_state() {
        let procs = vec![
            ProcessDescriptor::new(1, 0, 1).with_priority(4),
            ProcessDescriptor::new(2, 0, 1).with_priority(2),
        ];
        let mut state = SimulationState::new(&procs);
        state.mark_ready(1, 0);
        state.mark_ready(2, 0);
        state.advance_to(7);
        state.restart_waiting_clocks();
        let mut heap = ReadyHeap::new(AgedPriority::new(3, 1));
        heap.push(0, &procs, &state);
        heap.push(1, &procs, &state);

        state.advance_to(16);
        heap.rekey(&procs, &state);
        // pid 1: 4 - 3 = 1, pid 2: max(1, 2 - 3) = 1, tie on arrival, lower pid wins
        assert_eq!(heap.pop(), Some(0));
        assert_eq!(heap.rule().name(), "AGED_PRIORITY");
    }

    #[test]
    fn test_multilevel_serves_lowest_level() {
        let mut mlq = MultilevelQueue::new(3);
        mlq.push(2, 7);
        mlq.push(1, 5);
        mlq.push(1, 6);
        assert_eq!(mlq.pop(), Some((1, 5)));
        mlq.push(0, 9);
        assert_eq!(mlq.pop(), Some((0, 9)));
        assert_eq!(mlq.pop(), Some((1, 6)));
        assert_eq!(mlq.pop(), Some((2, 7)));
        assert_eq!(mlq.pop(), None);
    }

    #[test]
    fn test_multilevel_demotion_clamps() {
        let mut mlq = MultilevelQueue::new(2);
        assert_eq!(mlq.demoted(0), 1);
        assert_eq!(mlq.demoted(1), 1);
        mlq.push(5, 1);
        assert_eq!(mlq.pop(), Some((1, 1)));
    }
}
