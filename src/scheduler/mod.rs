//! Scheduling policies.
//!
//! Each policy is a pure function from a process list (plus parameters) to a
//! [`Timeline`] on one logical CPU.
//!
//! | Policy | Preemptive | Ready set | Tie-break |
//! |--------|-----------|-----------|-----------|
//! | FCFS | no | arrival order | input order |
//! | SJF | no | `ReadyHeap<ShortestJob>` | `(burst, arrival, pid)` |
//! | SRTF | yes | `ReadyHeap<ShortestRemaining>` | `(remaining, pid)` |
//! | Round Robin | quantum | `FifoQueue` | arrival, then re-queue |
//! | Priority | no | `ReadyHeap<HighestPriority>` | `(priority, arrival, pid)` |
//! | Priority + aging | no | `ReadyHeap<AgedPriority>` | `(aged priority, arrival, pid)` |
//! | Weighted-fair | time slice | `ReadyHeap<MinVruntime>` | `(vruntime, pid)` |
//! | MLFQ | quantum per level | `MultilevelQueue` | level, then FIFO |
//!
//! # Guarantees
//!
//! - Input and parameters are validated before the first simulation step;
//!   errors never come with a partial timeline.
//! - Every run works on its own copy of the process list and its own
//!   [`SimulationState`](crate::dispatching::SimulationState).
//! - Every returned timeline has passed [`Timeline::verify`].
//! - Idle gaps are skipped by jumping to the next arrival; the emitted slices
//!   match a unit-stepped simulation.
//!
//! # References
//!
//! - Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5
//! - Arpaci-Dusseau (2018), "Operating Systems: Three Easy Pieces", Ch. 7-9

mod aging;
mod fair;
mod fcfs;
mod mlfq;
mod nonpreemptive;
mod round_robin;
mod srtf;

pub use aging::{aging_horizon, priority_with_aging};
pub use fair::weighted_fair;
pub use fcfs::fcfs;
pub use mlfq::{level_quantum, mlfq};
pub use nonpreemptive::{priority, sjf};
pub use round_robin::round_robin;
pub use srtf::srtf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SchedError, SchedResult};
use crate::models::{ProcessDescriptor, Time, Timeline};
use crate::validation::{check_processes, require_positive};

/// Default Round Robin quantum.
pub const DEFAULT_QUANTUM: Time = 2;
/// Default aging interval.
pub const DEFAULT_AGING_INTERVAL: Time = 5;
/// Default aging step.
pub const DEFAULT_AGING_DELTA: i32 = 1;
/// Default weighted-fair time slice.
pub const DEFAULT_TIME_SLICE: Time = 2;
/// Default number of MLFQ levels.
pub const DEFAULT_LEVELS: usize = 3;
/// Default MLFQ level-0 quantum.
pub const DEFAULT_BASE_QUANTUM: Time = 2;

fn default_quantum() -> Time {
    DEFAULT_QUANTUM
}
fn default_aging_interval() -> Time {
    DEFAULT_AGING_INTERVAL
}
fn default_aging_delta() -> i32 {
    DEFAULT_AGING_DELTA
}
fn default_time_slice() -> Time {
    DEFAULT_TIME_SLICE
}
fn default_levels() -> usize {
    DEFAULT_LEVELS
}
fn default_base_quantum() -> Time {
    DEFAULT_BASE_QUANTUM
}

/// A scheduling policy together with its parameters.
///
/// Deserializes from a tagged record, e.g.
/// `{"policy": "round_robin", "quantum": 4}`; omitted parameters take the
/// defaults above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Policy {
    /// First-come first-served.
    Fcfs,
    /// Shortest job first (non-preemptive).
    Sjf,
    /// Shortest remaining time first (preemptive).
    Srtf,
    /// Round Robin with a fixed quantum.
    RoundRobin {
        #[serde(default = "default_quantum")]
        quantum: Time,
    },
    /// Static priority (non-preemptive, lower value first).
    Priority,
    /// Priority with aging (non-preemptive).
    PriorityAging {
        #[serde(default = "default_aging_interval")]
        aging_interval: Time,
        #[serde(default = "default_aging_delta")]
        aging_delta: i32,
    },
    /// Weighted-fair (CFS-style) with a fixed time slice.
    WeightedFair {
        #[serde(default = "default_time_slice")]
        time_slice: Time,
    },
    /// Multilevel feedback queue with doubling quanta.
    Mlfq {
        #[serde(default = "default_levels")]
        levels: usize,
        #[serde(default = "default_base_quantum")]
        base_quantum: Time,
    },
}

impl Policy {
    /// Round Robin with the default quantum.
    pub fn round_robin() -> Self {
        Self::RoundRobin {
            quantum: DEFAULT_QUANTUM,
        }
    }

    /// Priority with aging using the default interval and step.
    pub fn priority_aging() -> Self {
        Self::PriorityAging {
            aging_interval: DEFAULT_AGING_INTERVAL,
            aging_delta: DEFAULT_AGING_DELTA,
        }
    }

    /// Weighted-fair with the default time slice.
    pub fn weighted_fair() -> Self {
        Self::WeightedFair {
            time_slice: DEFAULT_TIME_SLICE,
        }
    }

    /// MLFQ with the default levels and base quantum.
    pub fn mlfq() -> Self {
        Self::Mlfq {
            levels: DEFAULT_LEVELS,
            base_quantum: DEFAULT_BASE_QUANTUM,
        }
    }

    /// The seven base policies, with default parameters.
    pub fn all() -> Vec<Policy> {
        vec![
            Self::Fcfs,
            Self::Sjf,
            Self::Srtf,
            Self::round_robin(),
            Self::Priority,
            Self::weighted_fair(),
            Self::mlfq(),
        ]
    }

    /// Short policy name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::Sjf => "SJF",
            Self::Srtf => "SRTF",
            Self::RoundRobin { .. } => "RR",
            Self::Priority => "Priority",
            Self::PriorityAging { .. } => "Priority (Aging)",
            Self::WeightedFair { .. } => "CFS",
            Self::Mlfq { .. } => "MLFQ",
        }
    }

    /// Human-readable label including parameters.
    pub fn label(&self) -> String {
        match self {
            Self::RoundRobin { quantum } => format!("Round Robin (q={quantum})"),
            Self::PriorityAging {
                aging_interval,
                aging_delta,
            } => format!("Priority Scheduling (Aging every {aging_interval} by {aging_delta})"),
            Self::WeightedFair { time_slice } => {
                format!("Completely Fair Scheduler (slice={time_slice})")
            }
            Self::Mlfq {
                levels,
                base_quantum,
            } => format!("Multilevel Feedback Queue ({levels} levels, q0={base_quantum})"),
            Self::Fcfs => "FCFS".to_string(),
            Self::Sjf => "SJF (Non-Preemptive)".to_string(),
            Self::Srtf => "SRTF (Preemptive SJF)".to_string(),
            Self::Priority => "Priority Scheduling".to_string(),
        }
    }

    /// Whether a running process can lose the CPU before completing.
    pub fn is_preemptive(&self) -> bool {
        !matches!(
            self,
            Self::Fcfs | Self::Sjf | Self::Priority | Self::PriorityAging { .. }
        )
    }

    /// Checks the policy parameters.
    ///
    /// # Errors
    /// `SchedError::InvalidParameters` naming the first bad parameter.
    pub fn validate(&self) -> SchedResult<()> {
        match *self {
            Self::Fcfs | Self::Sjf | Self::Srtf | Self::Priority => Ok(()),
            Self::RoundRobin { quantum } => require_positive("quantum", quantum),
            Self::PriorityAging {
                aging_interval,
                aging_delta,
            } => {
                require_positive("aging_interval", aging_interval)?;
                require_positive("aging_delta", i64::from(aging_delta))
            }
            Self::WeightedFair { time_slice } => require_positive("time_slice", time_slice),
            Self::Mlfq {
                levels,
                base_quantum,
            } => {
                if levels == 0 {
                    return Err(SchedError::parameter("levels", "at least one level is required"));
                }
                require_positive("base_quantum", base_quantum)
            }
        }
    }

    /// Runs this policy over `processes`.
    ///
    /// The caller's list is never modified.
    pub fn run(&self, processes: &[ProcessDescriptor]) -> SchedResult<Timeline> {
        match *self {
            Self::Fcfs => fcfs(processes),
            Self::Sjf => sjf(processes),
            Self::Srtf => srtf(processes),
            Self::RoundRobin { quantum } => round_robin(processes, quantum),
            Self::Priority => priority(processes),
            Self::PriorityAging {
                aging_interval,
                aging_delta,
            } => priority_with_aging(processes, aging_interval, aging_delta),
            Self::WeightedFair { time_slice } => weighted_fair(processes, time_slice),
            Self::Mlfq {
                levels,
                base_quantum,
            } => mlfq(processes, levels, base_quantum),
        }
    }
}

/// Shared run harness: validation, an owned copy of the input, and a final
/// invariant check on the produced timeline.
///
/// `params` is checked after the input and before `body` runs.
fn simulate<F>(
    policy: &'static str,
    processes: &[ProcessDescriptor],
    params: SchedResult<()>,
    body: F,
) -> SchedResult<Timeline>
where
    F: FnOnce(&[ProcessDescriptor]) -> SchedResult<Timeline>,
{
    check_processes(processes)?;
    params?;

    let owned = processes.to_vec();
    debug!(policy, processes = owned.len(), "simulation started");

    let timeline = body(&owned)?;
    timeline.verify(&owned)?;

    debug!(
        policy,
        slices = timeline.len(),
        makespan = timeline.makespan(),
        "simulation finished"
    );
    Ok(timeline)
}
