//! Seeded synthetic workloads.
//!
//! Generates valid process lists for comparing policies without a live
//! system snapshot. The same seed and settings always yield the same list.
//!
//! # Example
//!
//! ```
//! use u_cpusched::workload::WorkloadGenerator;
//!
//! let procs = WorkloadGenerator::new(42)
//!     .with_count(10)
//!     .with_burst_range(2, 6)
//!     .generate();
//! assert_eq!(procs.len(), 10);
//! assert!(procs.iter().all(|p| (2..=6).contains(&p.burst)));
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::{Pid, ProcessDescriptor, Time};

/// Generator settings.
///
/// Ranges are inclusive. Bounds given in the wrong order are swapped, and
/// bursts below 1 are raised to 1, so the output always validates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadGenerator {
    seed: u64,
    count: usize,
    arrival_span: Time,
    burst_range: (Time, Time),
    priority_range: (i32, i32),
}

impl WorkloadGenerator {
    /// Creates a generator with 10 processes, arrivals in `0..=20`,
    /// bursts in `1..=10` and priorities in `1..=5`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            count: 10,
            arrival_span: 20,
            burst_range: (1, 10),
            priority_range: (1, 5),
        }
    }

    /// Sets the number of processes (at least 1).
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count.max(1);
        self
    }

    /// Sets the latest arrival time; arrivals fall in `0..=span`.
    pub fn with_arrival_span(mut self, span: Time) -> Self {
        self.arrival_span = span.max(0);
        self
    }

    /// Sets the burst range.
    pub fn with_burst_range(mut self, min: Time, max: Time) -> Self {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.burst_range = (lo.max(1), hi.max(1));
        self
    }

    /// Sets the priority range.
    pub fn with_priority_range(mut self, min: i32, max: i32) -> Self {
        self.priority_range = if min <= max { (min, max) } else { (max, min) };
        self
    }

    /// Generates the process list.
    ///
    /// Pids are `1..=count` in input order; arrivals are not sorted.
    pub fn generate(&self) -> Vec<ProcessDescriptor> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let (burst_lo, burst_hi) = self.burst_range;
        let (prio_lo, prio_hi) = self.priority_range;

        (1..=self.count)
            .map(|n| {
                let arrival = rng.random_range(0..=self.arrival_span);
                let burst = rng.random_range(burst_lo..=burst_hi);
                let priority = rng.random_range(prio_lo..=prio_hi);
                ProcessDescriptor::new(n as Pid, arrival, burst).with_priority(priority)
            })
            .collect()
    }
}

impl Default for WorkloadGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}
