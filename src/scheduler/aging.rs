//! Priority scheduling with aging (non-preemptive).
//!
//! # Aging model
//!
//! A process's waiting clock starts when it arrives. At every decision point
//! each waiting process has effective priority
//! `max(1, priority - floor(waited / aging_interval) * aging_delta)`, where
//! `waited` is measured from its waiting clock and `priority` is always the
//! base priority. Right after each dispatch the waiting clock of every
//! process still waiting restarts at the dispatch time. Aging is therefore
//! progressive: a process gains priority only from the wait accumulated
//! since the previous decision, never from its total wait.
//!
//! # Starvation bound
//!
//! A process with priority `P` reaches effective priority 1 once a single
//! run of another process lasts at least
//! [`aging_horizon`]`(P) = ceil((P - 1) / aging_delta) * aging_interval`.
//! It then wins against every priority-1 process that arrived after it.
//! Under a stream of priority-1 jobs whose bursts all reach the horizon of
//! the lowest priority present, each stream job's run lifts every process
//! that waited through it to priority 1, from where arrival order decides.

use tracing::trace;

use super::{simulate, Policy};
use crate::dispatching::rules::AgedPriority;
use crate::dispatching::{Arrivals, ReadyHeap, SimulationState};
use crate::error::SchedResult;
use crate::models::{ProcessDescriptor, Time, Timeline};

/// Runs priority scheduling with aging.
///
/// Dispatches the minimum `(aged priority, arrival, pid)` at every decision
/// point and runs it to completion.
///
/// # Errors
/// `InvalidParameters` if `aging_interval <= 0` or `aging_delta <= 0`.
pub fn priority_with_aging(
    processes: &[ProcessDescriptor],
    aging_interval: Time,
    aging_delta: i32,
) -> SchedResult<Timeline> {
    let params = Policy::PriorityAging {
        aging_interval,
        aging_delta,
    }
    .validate();
    simulate("Priority (Aging)", processes, params, |procs| {
        let mut arrivals = Arrivals::new(procs);
        let mut state =
            SimulationState::new(procs).starting_at(arrivals.next_arrival().unwrap_or(0));
        let mut ready = ReadyHeap::new(AgedPriority::new(aging_interval, aging_delta));
        let mut timeline = Timeline::new();

        loop {
            while let Some(index) = arrivals.pop_arrived(state.now) {
                state.mark_ready(procs[index].pid, procs[index].arrival);
                ready.push(index, procs, &state);
            }

            ready.rekey(procs, &state);
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
            let effective = state.effective_priority(process, aging_interval, aging_delta);
            state.stop_waiting(process.pid);
            state.restart_waiting_clocks();

            let (start, finish) = state.run(process.pid, process.burst)?;
            trace!(
                pid = process.pid,
                priority = process.priority,
                effective,
                start,
                finish,
                "dispatch"
            );
            timeline.push(process.pid, start, finish);
        }

        Ok(timeline)
    })
}

/// Uninterrupted wait after which a process with `priority` reaches
/// effective priority 1.
pub fn aging_horizon(priority: i32, aging_interval: Time, aging_delta: i32) -> Time {
    let gap = i64::from(priority.max(1) - 1);
    let delta = i64::from(aging_delta.max(1));
    (gap + delta - 1) / delta * aging_interval
}
