//! First-come first-served (non-preemptive).

use tracing::trace;

use super::simulate;
use crate::dispatching::SimulationState;
use crate::error::SchedResult;
use crate::models::{arrival_order, ProcessDescriptor, Timeline};

/// Runs every process to completion in arrival order.
///
/// Processes with equal arrival keep their input order. The CPU idles until
/// the next arrival whenever it runs out of work.
///
/// # Example
///
/// ```
/// use u_cpusched::models::ProcessDescriptor;
/// use u_cpusched::scheduler::fcfs;
///
/// let procs = vec![
///     ProcessDescriptor::new(1, 0, 5),
///     ProcessDescriptor::new(2, 1, 3),
/// ];
/// let timeline = fcfs(&procs).unwrap();
/// assert_eq!(timeline.slices()[1].start, 5);
/// ```
pub fn fcfs(processes: &[ProcessDescriptor]) -> SchedResult<Timeline> {
    simulate("FCFS", processes, Ok(()), |procs| {
        let mut state = SimulationState::new(procs);
        let mut timeline = Timeline::new();

        for index in arrival_order(procs) {
            let process = &procs[index];
            state.advance_to(process.arrival);
            let (start, finish) = state.run(process.pid, process.burst)?;
            trace!(pid = process.pid, start, finish, "dispatch");
            timeline.push(process.pid, start, finish);
        }

        Ok(timeline)
    })
}
