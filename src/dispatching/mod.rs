//! Ready-set selection for scheduling policies.
//!
//! Provides the per-run [`SimulationState`], the ready-set containers each
//! policy dispatches from, and the named [`SelectionRule`]s that order them.
//!
//! # Usage
//!
//! ```
//! use u_cpusched::dispatching::{rules, ReadyHeap, SimulationState};
//! use u_cpusched::models::ProcessDescriptor;
//!
//! let procs = vec![
//!     ProcessDescriptor::new(1, 0, 5),
//!     ProcessDescriptor::new(2, 0, 2),
//! ];
//! let state = SimulationState::new(&procs);
//! let mut heap = ReadyHeap::new(rules::ShortestJob);
//! heap.push(0, &procs, &state);
//! heap.push(1, &procs, &state);
//! assert_eq!(heap.pop(), Some(1));
//! ```

mod queue;
pub mod rules;
mod state;

pub use queue::{Arrivals, FifoQueue, MultilevelQueue, ReadyHeap};
pub use state::{SimulationState, Vruntime};

use crate::models::ProcessDescriptor;
use std::fmt::Debug;

/// A total order over ready processes.
///
/// # Key Convention
/// **Smaller key = dispatched first.** Keys must end in the pid (or another
/// unique field) so that two distinct processes never compare equal; this
/// keeps every policy deterministic.
pub trait SelectionRule: Debug {
    /// Sort key; compared lexicographically for tuples.
    type Key: Ord + Clone + Debug;

    /// Rule name (e.g., "SJF", "SRTF").
    fn name(&self) -> &'static str;

    /// Key of `process` given the current run state.
    fn key(&self, process: &ProcessDescriptor, state: &SimulationState) -> Self::Key;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
