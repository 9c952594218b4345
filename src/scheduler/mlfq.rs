//! Multilevel feedback queue (simplified).
//!
//! New arrivals always enter level 0. A process that uses its whole quantum
//! without finishing is demoted one level (the last level keeps it). There is
//! no periodic boost back to level 0, so a demoted process is never
//! promoted; long jobs can wait behind a steady stream of short ones.

use tracing::trace;

use super::{simulate, Policy};
use crate::dispatching::{Arrivals, MultilevelQueue, SimulationState};
use crate::error::SchedResult;
use crate::models::{ProcessDescriptor, Time, Timeline};

/// Quantum at `level`: `base_quantum * 2^level`, saturating.
pub fn level_quantum(base_quantum: Time, level: usize) -> Time {
    let factor = u32::try_from(level)
        .ok()
        .and_then(|shift| 1i64.checked_shl(shift))
        .filter(|f| *f > 0)
        .unwrap_or(Time::MAX);
    base_quantum.saturating_mul(factor)
}

/// Runs MLFQ with `levels` queues and a level-0 quantum of `base_quantum`.
///
/// Arrivals during a slice are admitted before the process just run is
/// re-enqueued.
///
/// # Errors
/// `InvalidParameters` if `levels == 0` or `base_quantum <= 0`.
pub fn mlfq(
    processes: &[ProcessDescriptor],
    levels: usize,
    base_quantum: Time,
) -> SchedResult<Timeline> {
    let params = Policy::Mlfq {
        levels,
        base_quantum,
    }
    .validate();
    simulate("MLFQ", processes, params, |procs| {
        let mut arrivals = Arrivals::new(procs);
        let mut state =
            SimulationState::new(procs).starting_at(arrivals.next_arrival().unwrap_or(0));
        let mut queues = MultilevelQueue::new(levels);
        let mut timeline = Timeline::new();

        loop {
            while let Some(index) = arrivals.pop_arrived(state.now) {
                queues.push(0, index);
            }

            let Some((level, index)) = queues.pop() else {
                match arrivals.next_arrival() {
                    Some(next) => {
                        state.advance_to(next);
                        continue;
                    }
                    None => break,
                }
            };

            let pid = procs[index].pid;
            let exec = level_quantum(base_quantum, level).min(state.remaining(pid));
            let (start, finish) = state.run(pid, exec)?;
            trace!(pid, level, start, finish, "dispatch");
            timeline.push(pid, start, finish);

            while let Some(arrived) = arrivals.pop_arrived(state.now) {
                queues.push(0, arrived);
            }
            if !state.is_finished(pid) {
                queues.push(queues.demoted(level), index);
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
    fn test_level_quantum_doubles() {
        assert_eq!(level_quantum(2, 0), 2);
        assert_eq!(level_quantum(2, 1), 4);
        assert_eq!(level_quantum(2, 2), 8);
        assert_eq!(level_quantum(3, 70), Time::MAX);
    }

    #[test]
    fn test_short_job_finishes_in_one_level0_slice() {
        let procs = vec![
            ProcessDescriptor::new(1, 0, 9),
            ProcessDescriptor::new(2, 1, 2),
        ];
        let tl = mlfq(&procs, 3, 2).unwrap();
        let slices: Vec<_> = tl.slices_for(2).collect();
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].duration(), 2);
    }

    #[test]
    fn test_long_job_is_demoted_and_stays_at_bottom() {
        let procs = vec![ProcessDescriptor::new(1, 0, 20)];
        let tl = mlfq(&procs, 3, 2).unwrap();
        let durations: Vec<Time> = tl.slices().iter().map(|s| s.duration()).collect();
        assert_eq!(durations, vec![2, 4, 8, 6]);
    }

    #[test]
    fn test_arrival_waits_for_running_quantum() {
        let procs = vec![
            ProcessDescriptor::new(1, 0, 6),
            ProcessDescriptor::new(2, 3, 1),
        ];
        let tl = mlfq(&procs, 3, 2).unwrap();
        assert_eq!(
            tl.slices(),
            &[
                ExecutionSlice::new(1, 0, 2),
                ExecutionSlice::new(1, 2, 6),
                ExecutionSlice::new(2, 6, 7),
            ]
        );
    }

    #[test]
    fn test_level0_arrival_preferred_over_demoted() {
        let procs = vec![
            ProcessDescriptor::new(1, 0, 6),
            ProcessDescriptor::new(2, 1, 1),
        ];
        let tl = mlfq(&procs, 3, 2).unwrap();
        assert_eq!(
            tl.slices(),
            &[
                ExecutionSlice::new(1, 0, 2),
                ExecutionSlice::new(2, 2, 3),
                ExecutionSlice::new(1, 3, 7),
            ]
        );
    }

    #[test]
    fn test_demotion_is_monotonic() {
        // slice lengths of a process never shrink below the previous quantum
        // unless it is finishing
        let procs = vec![
            ProcessDescriptor::new(1, 0, 17),
            ProcessDescriptor::new(2, 0, 11),
            ProcessDescriptor::new(3, 5, 3),
            ProcessDescriptor::new(4, 9, 1),
        ];
        let tl = mlfq(&procs, 3, 1).unwrap();
        for p in &procs {
            let durations: Vec<Time> = tl.slices_for(p.pid).map(|s| s.duration()).collect();
            for (k, d) in durations.iter().enumerate() {
                let level = k.min(2);
                let last = k + 1 == durations.len();
                if last {
                    assert!(*d <= level_quantum(1, level));
                } else {
                    assert_eq!(*d, level_quantum(1, level), "pid {} slice {k}", p.pid);
                }
            }
        }
    }

    #[test]
    fn test_single_level_matches_round_robin() {
        let procs = vec![
            ProcessDescriptor::new(1, 0, 5),
            ProcessDescriptor::new(2, 1, 3),
            ProcessDescriptor::new(3, 2, 1),
        ];
        assert_eq!(
            mlfq(&procs, 1, 2).unwrap(),
            crate::scheduler::round_robin(&procs, 2).unwrap()
        );
    }

    #[test]
    fn test_mlfq_rejects_zero_levels() {
        let procs = vec![ProcessDescriptor::new(1, 0, 1)];
        assert!(mlfq(&procs, 0, 2).is_err());
    }
}
