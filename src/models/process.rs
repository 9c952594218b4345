//! Process descriptor model.
//!
//! A process descriptor is the immutable input to every policy: when the
//! process becomes eligible, how much CPU time it needs, and its priority.
//!
//! # Time Representation
//! All times are integer simulated time units relative to t=0. The clock
//! never advances by fractions of a unit.

use serde::{Deserialize, Serialize};

/// Process identifier. Must be positive and unique within one run.
pub type Pid = u32;

/// Simulated time, in whole time units.
pub type Time = i64;

/// Priority assigned when none is given.
pub const DEFAULT_PRIORITY: i32 = 1;

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

/// A process to be scheduled.
///
/// # Priority Convention
/// Lower `priority` values are dispatched first by the priority policies.
/// The weighted-fair policy is the exception: it uses `priority` directly as
/// a weight, so a larger value receives a larger CPU share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDescriptor {
    /// Unique positive process identifier.
    pub pid: Pid,
    /// Time at which the process becomes eligible for scheduling.
    pub arrival: Time,
    /// Total CPU time required to complete.
    pub burst: Time,
    /// Scheduling priority (lower = more urgent, except under weighted-fair).
    #[serde(default = "default_priority")]
    pub priority: i32,
}

impl ProcessDescriptor {
    /// Creates a descriptor with the default priority.
    pub fn new(pid: Pid, arrival: Time, burst: Time) -> Self {
        Self {
            pid,
            arrival,
            burst,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// Sets the scheduling priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Weight used by the weighted-fair policy: `max(1, priority)`.
    #[inline]
    pub fn weight(&self) -> i32 {
        self.priority.max(1)
    }
}

/// Returns the process indices ordered by arrival.
///
/// The sort is stable, so processes with equal arrival keep their input order.
pub(crate) fn arrival_order(processes: &[ProcessDescriptor]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..processes.len()).collect();
    order.sort_by_key(|&i| processes[i].arrival);
    order
}
