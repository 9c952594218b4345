//! Per-run simulation state.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{SchedError, SchedResult};
use crate::models::{Pid, ProcessDescriptor, Time};

/// Virtual runtime accumulator for weighted-fair scheduling.
///
/// Wraps an `f64` and orders it with [`f64::total_cmp`] so it can key a heap.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Vruntime(pub f64);

impl Vruntime {
    /// Runtime charged for `exec` units at the given weight.
    pub fn charged(self, exec: Time, weight: i32) -> Self {
        Self(self.0 + exec as f64 / f64::from(weight.max(1)))
    }

    /// Accumulated virtual runtime.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for Vruntime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Vruntime {}

impl Ord for Vruntime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Vruntime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Mutable state owned by exactly one policy invocation.
///
/// Built fresh from the process list at the start of every run and dropped
/// when the run returns. Nothing here is shared between runs.
///
/// | Field | Used by | Behavior |
/// |-------|---------|----------|
/// | `remaining` | all policies | starts at burst, reaches 0 at completion |
/// | `vruntime` | weighted-fair | starts at 0, never decreases |
/// | `waiting_since` | aging | set on entering the ready set, restarted at every dispatch |
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    /// Current simulated time.
    pub now: Time,
    remaining: HashMap<Pid, Time>,
    vruntime: HashMap<Pid, Vruntime>,
    waiting_since: HashMap<Pid, Time>,
}

impl SimulationState {
    /// Creates the state for a run over `processes`, with the clock at 0.
    pub fn new(processes: &[ProcessDescriptor]) -> Self {
        Self {
            now: 0,
            remaining: processes.iter().map(|p| (p.pid, p.burst)).collect(),
            ..Default::default()
        }
    }

    /// Sets the starting clock.
    pub fn starting_at(mut self, now: Time) -> Self {
        self.now = now;
        self
    }

    /// Moves the clock forward to `t`; never moves it back.
    pub fn advance_to(&mut self, t: Time) {
        self.now = self.now.max(t);
    }

    /// Remaining CPU time for `pid` (0 for unknown pids).
    pub fn remaining(&self, pid: Pid) -> Time {
        self.remaining.get(&pid).copied().unwrap_or(0)
    }

    /// Whether `pid` has no work left.
    pub fn is_finished(&self, pid: Pid) -> bool {
        self.remaining(pid) == 0
    }

    /// Runs `pid` for `exec` units from the current clock.
    ///
    /// Advances the clock and returns the slice bounds.
    ///
    /// # Errors
    /// `InvariantViolation` if `exec` is not positive, exceeds the remaining
    /// work, or would move the clock past `Time::MAX`.
    pub fn run(&mut self, pid: Pid, exec: Time) -> SchedResult<(Time, Time)> {
        let left = self.remaining.get_mut(&pid).ok_or_else(|| {
            SchedError::invariant(format!("dispatched unknown pid {pid}"))
        })?;
        if exec <= 0 || exec > *left {
            return Err(SchedError::invariant(format!(
                "pid {pid} dispatched for {exec} units with {left} remaining"
            )));
        }
        let finish = self.now.checked_add(exec).ok_or_else(|| {
            SchedError::invariant(format!(
                "pid {pid} running {exec} units from {} overflows the clock",
                self.now
            ))
        })?;
        *left -= exec;
        let start = self.now;
        self.now = finish;
        Ok((start, finish))
    }

    /// Current virtual runtime of `pid`.
    pub fn vruntime(&self, pid: Pid) -> Vruntime {
        self.vruntime.get(&pid).copied().unwrap_or_default()
    }

    /// Charges `exec` units of CPU to `pid`'s virtual runtime.
    pub fn charge_vruntime(&mut self, pid: Pid, exec: Time, weight: i32) {
        let entry = self.vruntime.entry(pid).or_default();
        *entry = entry.charged(exec, weight);
    }

    /// Starts the waiting clock for a process entering the ready set.
    pub fn mark_ready(&mut self, pid: Pid, since: Time) {
        self.waiting_since.insert(pid, since);
    }

    /// Stops the waiting clock of a dispatched process.
    pub fn stop_waiting(&mut self, pid: Pid) {
        self.waiting_since.remove(&pid);
    }

    /// Restarts the waiting clock of every still-waiting process at `now`.
    pub fn restart_waiting_clocks(&mut self) {
        let now = self.now;
        for since in self.waiting_since.values_mut() {
            *since = now;
        }
    }

    /// Priority of `process` after aging at the current clock.
    ///
    /// `max(1, priority - floor(waited / aging_interval) * aging_delta)`,
    /// where `waited` runs from the last restart of the waiting clock. A
    /// process that is not waiting keeps its base priority.
    pub fn effective_priority(
        &self,
        process: &ProcessDescriptor,
        aging_interval: Time,
        aging_delta: i32,
    ) -> i32 {
        let Some(since) = self.waiting_since.get(&process.pid) else {
            return process.priority;
        };
        let steps = (self.now - since).max(0) / aging_interval.max(1);
        let bonus = steps.saturating_mul(i64::from(aging_delta));
        // result lies in 1..=max(1, priority), so it fits back into i32
        i64::from(process.priority).saturating_sub(bonus).max(1) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn procs() -> Vec<ProcessDescriptor> {
        vec![
            ProcessDescriptor::new(1, 0, 4).with_priority(5),
            ProcessDescriptor::new(2, 0, 2),
        ]
    }

    #[test]
    fn test_run_advances_clock_and_remaining() {
        let mut state = SimulationState::new(&procs()).starting_at(3);
        assert_eq!(state.run(1, 3).unwrap(), (3, 6));
        assert_eq!(state.remaining(1), 1);
        assert_eq!(state.now, 6);
        assert!(!state.is_finished(1));
        state.run(1, 1).unwrap();
        assert!(state.is_finished(1));
    }

    #[test]
    fn test_run_rejects_overrun() {
        let mut state = SimulationState::new(&procs());
        let err = state.run(2, 3).unwrap_err();
        assert!(matches!(err, SchedError::InvariantViolation(_)));
        assert_eq!(state.remaining(2), 2);
    }

    #[test]
    fn test_run_rejects_clock_overflow() {
        let mut state = SimulationState::new(&procs()).starting_at(Time::MAX - 1);
        let err = state.run(1, 4).unwrap_err();
        assert!(matches!(err, SchedError::InvariantViolation(_)));
        assert_eq!(state.remaining(1), 4);
        assert_eq!(state.now, Time::MAX - 1);
    }

    #[test]
    fn test_advance_never_rewinds() {
        let mut state = SimulationState::new(&procs()).starting_at(10);
        state.advance_to(4);
        assert_eq!(state.now, 10);
        state.advance_to(12);
        assert_eq!(state.now, 12);
    }

    #[test]
    fn test_vruntime_weighting() {
        let mut state = SimulationState::new(&procs());
        state.charge_vruntime(1, 2, 4);
        state.charge_vruntime(2, 2, 1);
        assert!((state.vruntime(1).get() - 0.5).abs() < 1e-10);
        assert!((state.vruntime(2).get() - 2.0).abs() < 1e-10);
        assert!(state.vruntime(1) < state.vruntime(2));
    }

    #[test]
    fn test_effective_priority_from_base() {
        let procs = procs();
        let mut state = SimulationState::new(&procs);
        assert_eq!(state.effective_priority(&procs[0], 5, 1), 5);

        state.mark_ready(1, 0);
        state.advance_to(4);
        assert_eq!(state.effective_priority(&procs[0], 5, 1), 5);
        state.advance_to(12);
        assert_eq!(state.effective_priority(&procs[0], 5, 1), 3);
    }

    #[test]
    fn test_restart_discards_partial_wait() {
        let procs = procs();
        let mut state = SimulationState::new(&procs);
        state.mark_ready(1, 0);
        state.advance_to(4);
        state.restart_waiting_clocks();

        state.advance_to(8);
        // 8 units since arrival, but only 4 since the last restart
        assert_eq!(state.effective_priority(&procs[0], 5, 1), 5);
        state.advance_to(9);
        assert_eq!(state.effective_priority(&procs[0], 5, 1), 4);
    }

    #[test]
    fn test_stopped_process_keeps_base_priority() {
        let procs = procs();
        let mut state = SimulationState::new(&procs);
        state.mark_ready(1, 0);
        state.stop_waiting(1);
        state.advance_to(100);
        assert_eq!(state.effective_priority(&procs[0], 5, 1), 5);
    }

    #[test]
    fn test_aging_floor_is_one() {
        let procs = procs();
        let mut state = SimulationState::new(&procs);
        state.mark_ready(1, 0);
        state.advance_to(1_000);
        assert_eq!(state.effective_priority(&procs[0], 5, 3), 1);
        assert_eq!(state.effective_priority(&procs[0], 1, i32::MAX), 1);
    }
}
