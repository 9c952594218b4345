//! Non-preemptive selection policies: SJF and static priority.
//!
//! Both share one run loop; only the [`SelectionRule`] differs.

use tracing::trace;

use super::simulate;
use crate::dispatching::rules::{HighestPriority, ShortestJob};
use crate::dispatching::{Arrivals, ReadyHeap, SelectionRule, SimulationState};
use crate::error::SchedResult;
use crate::models::{ProcessDescriptor, Timeline};

/// Shortest Job First (non-preemptive).
///
/// Whenever the CPU is free, runs the arrived process with the smallest
/// `(burst, arrival, pid)` to completion.
pub fn sjf(processes: &[ProcessDescriptor]) -> SchedResult<Timeline> {
    simulate("SJF", processes, Ok(()), |procs| {
        run_to_completion(procs, ShortestJob)
    })
}

/// Priority scheduling (non-preemptive, lower value first).
///
/// Whenever the CPU is free, runs the arrived process with the smallest
/// `(priority, arrival, pid)` to completion. Low-priority processes can
/// starve under a steady stream of high-priority arrivals; see
/// [`priority_with_aging`](super::priority_with_aging).
pub fn priority(processes: &[ProcessDescriptor]) -> SchedResult<Timeline> {
    simulate("Priority", processes, Ok(()), |procs| {
        run_to_completion(procs, HighestPriority)
    })
}

/// Dispatches the rule's minimum at every decision point and runs it to
/// completion; jumps the clock over idle gaps.
fn run_to_completion<R: SelectionRule>(
    procs: &[ProcessDescriptor],
    rule: R,
) -> SchedResult<Timeline> {
    let mut state = SimulationState::new(procs);
    let mut arrivals = Arrivals::new(procs);
    let mut ready = ReadyHeap::new(rule);
    let mut timeline = Timeline::new();

    loop {
        while let Some(index) = arrivals.pop_arrived(state.now) {
            ready.push(index, procs, &state);
        }

        let Some(index) = ready.pop() else {
            match arrivals.next_arrival() {
                Some(next) => {
                    state.advance_to(next);
                    continue;
                }
                None => break,
            }
        };

        let process = &procs[index];
        let (start, finish) = state.run(process.pid, process.burst)?;
        trace!(
            rule = ready.rule().name(),
            pid = process.pid,
            start,
            finish,
            "dispatch"
        );
        timeline.push(process.pid, start, finish);
    }

    Ok(timeline)
}
