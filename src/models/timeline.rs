//! Timeline (policy output) model.
//!
//! A timeline is the ordered list of execution slices a policy produced for
//! a single logical CPU. Gaps between slices are idle time.
//!
//! # Invariants
//! - Every slice has `finish > start`.
//! - Slices sorted by start never overlap: `start[i+1] >= finish[i]`.
//! - No slice starts before its process arrived.
//! - The slice durations of each process sum to its burst.
//!
//! [`Timeline::verify`] checks all four; every policy calls it before
//! returning.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Pid, ProcessDescriptor, Time};
use crate::error::{SchedError, SchedResult};

/// Exclusive CPU ownership by `pid` over `[start, finish)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSlice {
    /// Process that owns the CPU.
    pub pid: Pid,
    /// First time unit of the slice.
    pub start: Time,
    /// End of the slice (exclusive).
    pub finish: Time,
}

impl ExecutionSlice {
    /// Creates a new slice.
    pub fn new(pid: Pid, start: Time, finish: Time) -> Self {
        Self { pid, start, finish }
    }

    /// Length of the slice.
    #[inline]
    pub fn duration(&self) -> Time {
        self.finish - self.start
    }
}

/// Ordered sequence of execution slices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    slices: Vec<ExecutionSlice>,
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a timeline from existing slices, kept in the given order.
    pub fn from_slices(slices: Vec<ExecutionSlice>) -> Self {
        Self { slices }
    }

    /// Appends a slice.
    pub fn push(&mut self, pid: Pid, start: Time, finish: Time) {
        self.slices.push(ExecutionSlice::new(pid, start, finish));
    }

    /// Appends a slice, merging it into the last one when the same pid ran
    /// without interruption.
    pub fn push_coalesced(&mut self, pid: Pid, start: Time, finish: Time) {
        if let Some(last) = self.slices.last_mut() {
            if last.pid == pid && last.finish == start {
                last.finish = finish;
                return;
            }
        }
        self.push(pid, start, finish);
    }

    /// All slices in emission order.
    pub fn slices(&self) -> &[ExecutionSlice] {
        &self.slices
    }

    /// Consumes the timeline, returning its slices.
    pub fn into_slices(self) -> Vec<ExecutionSlice> {
        self.slices
    }

    /// Number of slices.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Whether the timeline has no slices.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Slices sorted by `(start, finish)`.
    pub fn sorted(&self) -> Vec<ExecutionSlice> {
        let mut sorted = self.slices.clone();
        sorted.sort_by_key(|s| (s.start, s.finish));
        sorted
    }

    /// Slices belonging to one process, in emission order.
    pub fn slices_for(&self, pid: Pid) -> impl Iterator<Item = &ExecutionSlice> {
        self.slices.iter().filter(move |s| s.pid == pid)
    }

    /// Total time `pid` spent on the CPU.
    pub fn active_time(&self, pid: Pid) -> Time {
        self.slices_for(pid).map(ExecutionSlice::duration).sum()
    }

    /// Total non-idle CPU time.
    pub fn busy_time(&self) -> Time {
        self.slices.iter().map(ExecutionSlice::duration).sum()
    }

    /// Earliest slice start, if any.
    pub fn first_start(&self) -> Option<Time> {
        self.slices.iter().map(|s| s.start).min()
    }

    /// Latest slice finish, if any.
    pub fn last_finish(&self) -> Option<Time> {
        self.slices.iter().map(|s| s.finish).max()
    }

    /// `max(finish) - min(start)`, or 0 for an empty timeline.
    pub fn makespan(&self) -> Time {
        match (self.first_start(), self.last_finish()) {
            (Some(start), Some(finish)) => finish - start,
            _ => 0,
        }
    }

    /// Number of adjacent slice pairs (ordered by start) with different pids.
    pub fn context_switches(&self) -> usize {
        self.sorted()
            .windows(2)
            .filter(|pair| pair[0].pid != pair[1].pid)
            .count()
    }

    /// Checks the timeline against the processes it was produced from.
    ///
    /// # Errors
    /// `SchedError::InvariantViolation` naming the first broken rule.
    pub fn verify(&self, processes: &[ProcessDescriptor]) -> SchedResult<()> {
        let by_pid: HashMap<Pid, &ProcessDescriptor> =
            processes.iter().map(|p| (p.pid, p)).collect();
        let mut active: HashMap<Pid, Time> = HashMap::new();

        for slice in &self.slices {
            if slice.finish <= slice.start {
                return Err(SchedError::invariant(format!(
                    "empty or inverted slice for pid {}: [{}, {})",
                    slice.pid, slice.start, slice.finish
                )));
            }
            let process = by_pid.get(&slice.pid).ok_or_else(|| {
                SchedError::invariant(format!("slice for unknown pid {}", slice.pid))
            })?;
            if slice.start < process.arrival {
                return Err(SchedError::invariant(format!(
                    "pid {} runs at {} before arriving at {}",
                    slice.pid, slice.start, process.arrival
                )));
            }
            let ran = active.entry(slice.pid).or_insert(0);
            *ran = ran.checked_add(slice.duration()).ok_or_else(|| {
                SchedError::invariant(format!("active time of pid {} overflows", slice.pid))
            })?;
        }

        for pair in self.sorted().windows(2) {
            if pair[1].start < pair[0].finish {
                return Err(SchedError::invariant(format!(
                    "slices overlap: pid {} [{}, {}) and pid {} [{}, {})",
                    pair[0].pid, pair[0].start, pair[0].finish, pair[1].pid, pair[1].start, pair[1].finish
                )));
            }
        }

        for process in processes {
            let ran = active.get(&process.pid).copied().unwrap_or(0);
            if ran != process.burst {
                return Err(SchedError::invariant(format!(
                    "pid {} ran for {} units but needs {}",
                    process.pid, ran, process.burst
                )));
            }
        }

        Ok(())
    }
}
