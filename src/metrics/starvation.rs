//! Starvation detection.

use crate::models::{Pid, Time};

use super::ProcessMetrics;

/// Pids whose waiting time exceeds `threshold`, ascending.
pub fn detect_starvation(per_process: &[ProcessMetrics], threshold: Time) -> Vec<Pid> {
    let mut starving: Vec<Pid> = per_process
        .iter()
        .filter(|m| m.waiting > threshold)
        .map(|m| m.pid)
        .collect();
    starving.sort_unstable();
    starving
}
