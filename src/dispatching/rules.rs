//! Built-in selection rules.
//!
//! Each rule is the complete tie-break for one policy's ready set: its key
//! ends in the pid, so no two ready processes ever compare equal.
//!
//! | Rule | Key | Policy |
//! |------|-----|--------|
//! | `ShortestJob` | `(burst, arrival, pid)` | SJF |
//! | `ShortestRemaining` | `(remaining, pid)` | SRTF |
//! | `HighestPriority` | `(priority, arrival, pid)` | Priority |
//! | `AgedPriority` | `(effective priority, arrival, pid)` | Priority with aging |
//! | `MinVruntime` | `(vruntime, pid)` | Weighted-fair |
//!
//! # Score Convention
//! Smaller keys are dispatched first.

use super::{SelectionRule, SimulationState, Vruntime};
use crate::models::{Pid, ProcessDescriptor, Time};

/// Shortest Job First.
///
/// Prioritizes the smallest total burst; earlier arrival then lower pid
/// break ties.
#[derive(Debug, Clone, Copy)]
pub struct ShortestJob;

impl SelectionRule for ShortestJob {
    type Key = (Time, Time, Pid);

    fn name(&self) -> &'static str {
        "SJF"
    }

    fn key(&self, process: &ProcessDescriptor, _state: &SimulationState) -> Self::Key {
        (process.burst, process.arrival, process.pid)
    }

    fn description(&self) -> &'static str {
        "Shortest Job First"
    }
}

/// Shortest Remaining Time.
///
/// Prioritizes the least remaining work. On equal remaining time the lower
/// pid wins.
#[derive(Debug, Clone, Copy)]
pub struct ShortestRemaining;

impl SelectionRule for ShortestRemaining {
    type Key = (Time, Pid);

    fn name(&self) -> &'static str {
        "SRTF"
    }

    fn key(&self, process: &ProcessDescriptor, state: &SimulationState) -> Self::Key {
        (state.remaining(process.pid), process.pid)
    }

    fn description(&self) -> &'static str {
        "Shortest Remaining Time First"
    }
}

/// Static priority (lower value first).
#[derive(Debug, Clone, Copy)]
pub struct HighestPriority;

impl SelectionRule for HighestPriority {
    type Key = (i32, Time, Pid);

    fn name(&self) -> &'static str {
        "PRIORITY"
    }

    fn key(&self, process: &ProcessDescriptor, _state: &SimulationState) -> Self::Key {
        (process.priority, process.arrival, process.pid)
    }

    fn description(&self) -> &'static str {
        "Lowest priority value first"
    }
}

/// Priority after aging (lower value first).
///
/// Computes the aged priority from the base priority and the time waited
/// since the process's waiting clock last restarted.
#[derive(Debug, Clone, Copy)]
pub struct AgedPriority {
    /// Waiting time that earns one aging step.
    pub aging_interval: Time,
    /// Priority improvement per step.
    pub aging_delta: i32,
}

impl AgedPriority {
    /// Creates the rule for the given aging parameters.
    pub fn new(aging_interval: Time, aging_delta: i32) -> Self {
        Self {
            aging_interval,
            aging_delta,
        }
    }
}

impl SelectionRule for AgedPriority {
    type Key = (i32, Time, Pid);

    fn name(&self) -> &'static str {
        "AGED_PRIORITY"
    }

    fn key(&self, process: &ProcessDescriptor, state: &SimulationState) -> Self::Key {
        let effective = state.effective_priority(process, self.aging_interval, self.aging_delta);
        (effective, process.arrival, process.pid)
    }

    fn description(&self) -> &'static str {
        "Lowest effective priority value first, improved by waiting"
    }
}

/// Minimum virtual runtime.
#[derive(Debug, Clone, Copy)]
pub struct MinVruntime;

impl SelectionRule for MinVruntime {
    type Key = (Vruntime, Pid);

    fn name(&self) -> &'static str {
        "MIN_VRUNTIME"
    }

    fn key(&self, process: &ProcessDescriptor, state: &SimulationState) -> Self::Key {
        (state.vruntime(process.pid), process.pid)
    }

    fn description(&self) -> &'static str {
        "Smallest weighted virtual runtime first"
    }
}
