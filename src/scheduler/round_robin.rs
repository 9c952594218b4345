//! Round Robin (preemptive, quantum-based).

use tracing::trace;

use super::{simulate, Policy};
use crate::dispatching::{Arrivals, FifoQueue, SimulationState};
use crate::error::SchedResult;
use crate::models::{ProcessDescriptor, Time, Timeline};

/// Runs Round Robin with a fixed `quantum`.
///
/// # Algorithm
/// 1. Seed the clock to the first arrival and admit everything arrived.
/// 2. Pop the front of the FIFO queue, run `min(quantum, remaining)`.
/// 3. Admit every process that arrived by the new clock value.
/// 4. Re-enqueue the process just run if it still has work, so it lands
///    behind the processes that arrived during its slice.
/// 5. If the queue is empty, jump to the next arrival.
///
/// # Errors
/// `InvalidParameters` if `quantum <= 0`.
pub fn round_robin(processes: &[ProcessDescriptor], quantum: Time) -> SchedResult<Timeline> {
    let params = Policy::RoundRobin { quantum }.validate();
    simulate("RR", processes, params, |procs| {
        let mut arrivals = Arrivals::new(procs);
        let mut state =
            SimulationState::new(procs).starting_at(arrivals.next_arrival().unwrap_or(0));
        let mut queue = FifoQueue::new();
        let mut timeline = Timeline::new();

        loop {
            while let Some(index) = arrivals.pop_arrived(state.now) {
                queue.push_back(index);
            }

            let Some(index) = queue.pop_front() else {
                match arrivals.next_arrival() {
                    Some(next) => {
                        state.advance_to(next);
                        continue;
                    }
                    None => break,
                }
            };

            let pid = procs[index].pid;
            let exec = quantum.min(state.remaining(pid));
            let (start, finish) = state.run(pid, exec)?;
            trace!(pid, start, finish, queued = queue.len(), "dispatch");
            timeline.push(pid, start, finish);

            while let Some(arrived) = arrivals.pop_arrived(state.now) {
                queue.push_back(arrived);
            }
            if !state.is_finished(pid) {
                queue.push_back(index);
            }
        }

        Ok(timeline)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExecutionSlice;

    #[test]
    fn test_rr_reference_scenario() {
        let procs = vec![
            ProcessDescriptor::new(1, 0, 5),
            ProcessDescriptor::new(2, 1, 3),
            ProcessDescriptor::new(3, 2, 1),
        ];
        let tl = round_robin(&procs, 2).unwrap();
        assert_eq!(
            tl.slices(),
            &[
                ExecutionSlice::new(1, 0, 2),
                ExecutionSlice::new(2, 2, 4),
                ExecutionSlice::new(3, 4, 5),
                ExecutionSlice::new(1, 5, 7),
                ExecutionSlice::new(2, 7, 8),
                ExecutionSlice::new(1, 8, 9),
            ]
        );
    }

    #[test]
    fn test_rr_arrivals_go_ahead_of_preempted_process() {
        // pid 2 arrives exactly when pid 1's quantum expires
        let procs = vec![
            ProcessDescriptor::new(1, 0, 4),
            ProcessDescriptor::new(2, 2, 2),
        ];
        let tl = round_robin(&procs, 2).unwrap();
        assert_eq!(
            tl.slices(),
            &[
                ExecutionSlice::new(1, 0, 2),
                ExecutionSlice::new(2, 2, 4),
                ExecutionSlice::new(1, 4, 6),
            ]
        );
    }

    #[test]
    fn test_rr_seeds_clock_to_first_arrival() {
        let procs = vec![ProcessDescriptor::new(1, 7, 3)];
        let tl = round_robin(&procs, 2).unwrap();
        assert_eq!(
            tl.slices(),
            &[ExecutionSlice::new(1, 7, 9), ExecutionSlice::new(1, 9, 10)]
        );
        assert_eq!(tl.context_switches(), 0);
    }

    #[test]
    fn test_rr_quantum_one_alternates() {
        let procs = vec![
            ProcessDescriptor::new(1, 0, 2),
            ProcessDescriptor::new(2, 0, 2),
        ];
        let order: Vec<u32> = round_robin(&procs, 1)
            .unwrap()
            .slices()
            .iter()
            .map(|s| s.pid)
            .collect();
        assert_eq!(order, vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_rr_rejects_non_positive_quantum() {
        let procs = vec![ProcessDescriptor::new(1, 0, 2)];
        assert!(round_robin(&procs, 0).is_err());
        assert!(round_robin(&procs, -3).is_err());
    }
}
