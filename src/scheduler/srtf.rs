//! Shortest Remaining Time First (preemptive SJF).
//!
//! # Algorithm
//! Event-driven. At every arrival and every completion the ready process
//! with the smallest `(remaining, pid)` takes the CPU and keeps it until the
//! next event. Between events the running process stays the minimum (its
//! key only shrinks), so this emits the same slices as stepping one time
//! unit at a time. Consecutive runs of the same pid are coalesced.

use tracing::trace;

use super::simulate;
use crate::dispatching::rules::ShortestRemaining;
use crate::dispatching::{Arrivals, ReadyHeap, SimulationState};
use crate::error::SchedResult;
use crate::models::{ProcessDescriptor, Timeline};

/// Runs SRTF over `processes`.
///
/// A newly arrived process preempts the running one only if its key is
/// strictly smaller; on equal remaining time the lower pid runs.
pub fn srtf(processes: &[ProcessDescriptor]) -> SchedResult<Timeline> {
    simulate("SRTF", processes, Ok(()), |procs| {
        let mut arrivals = Arrivals::new(procs);
        let mut state =
            SimulationState::new(procs).starting_at(arrivals.next_arrival().unwrap_or(0));
        let mut ready = ReadyHeap::new(ShortestRemaining);
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

            let pid = procs[index].pid;
            let remaining = state.remaining(pid);
            let until_event = arrivals
                .next_arrival()
                .map_or(remaining, |next| remaining.min(next - state.now));

            let (start, finish) = state.run(pid, until_event)?;
            trace!(pid, start, finish, remaining = remaining - until_event, "run");
            timeline.push_coalesced(pid, start, finish);

            if !state.is_finished(pid) {
                ready.push(index, procs, &state);
            }
        }

        Ok(timeline)
    })
}
