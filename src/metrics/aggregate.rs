//! Per-process and global performance metrics.
//!
//! Computes standard CPU-scheduling indicators from a verified timeline and
//! the process list it was produced from.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Response | first start - arrival |
//! | Turnaround | last finish - arrival |
//! | Waiting | turnaround - burst |
//! | Makespan | max(finish) - min(start) |
//! | CPU Utilization | busy time / makespan |
//! | Throughput | process count / makespan |
//! | Context Switches | adjacent slices (by start) with different pids |
//!
//! # Reference
//! Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5.2

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SchedError, SchedResult};
use crate::models::{Pid, ProcessDescriptor, Time, Timeline};
use crate::validation::check_processes;

/// Metrics for one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    pub pid: Pid,
    pub arrival: Time,
    pub burst: Time,
    /// Start of the first slice.
    pub first_start: Time,
    /// End of the last slice.
    pub last_finish: Time,
    /// `first_start - arrival`.
    pub response: Time,
    /// `last_finish - arrival`.
    pub turnaround: Time,
    /// `turnaround - burst`.
    pub waiting: Time,
    /// Sum of slice durations; equals `burst`.
    pub active: Time,
}

/// Aggregate metrics for one timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalMetrics {
    /// Number of processes.
    pub process_count: usize,
    /// Mean waiting time.
    pub avg_waiting: f64,
    /// Mean turnaround time.
    pub avg_turnaround: f64,
    /// Mean response time.
    pub avg_response: f64,
    /// Smallest waiting time.
    pub min_waiting: Time,
    /// Largest waiting time.
    pub max_waiting: Time,
    /// Sample standard deviation of waiting time (0 for one process).
    pub std_dev_waiting: f64,
    /// `max(finish) - min(start)`.
    pub makespan: Time,
    /// Total non-idle CPU time.
    pub busy_time: Time,
    /// `busy_time / makespan` (0.0..=1.0).
    pub cpu_utilization: f64,
    /// Processes completed per time unit.
    pub throughput: f64,
    /// Changes of running pid between adjacent slices.
    pub context_switches: usize,
}

/// Computes per-process metrics (ascending pid) and global metrics.
///
/// # Errors
/// - `InvalidInput` if `processes` fails boundary validation.
/// - `InvariantViolation` if the timeline overlaps, runs a process before
///   its arrival, names an unknown pid, or does not run every process for
///   exactly its burst.
pub fn aggregate(
    timeline: &Timeline,
    processes: &[ProcessDescriptor],
) -> SchedResult<(Vec<ProcessMetrics>, GlobalMetrics)> {
    check_processes(processes)?;
    timeline.verify(processes)?;

    let mut per_process = Vec::with_capacity(processes.len());
    for process in processes {
        per_process.push(process_metrics(timeline, process)?);
    }
    per_process.sort_by_key(|m| m.pid);

    let global = global_metrics(timeline, &per_process);
    debug!(
        processes = global.process_count,
        makespan = global.makespan,
        avg_waiting = global.avg_waiting,
        context_switches = global.context_switches,
        "metrics aggregated"
    );
    Ok((per_process, global))
}

fn process_metrics(timeline: &Timeline, process: &ProcessDescriptor) -> SchedResult<ProcessMetrics> {
    let mut slices = timeline.slices_for(process.pid).peekable();
    if slices.peek().is_none() {
        return Err(SchedError::invariant(format!(
            "pid {} missing from timeline",
            process.pid
        )));
    }

    let mut first_start = Time::MAX;
    let mut last_finish = Time::MIN;
    let mut active = 0;
    for slice in slices {
        first_start = first_start.min(slice.start);
        last_finish = last_finish.max(slice.finish);
        active += slice.duration();
    }

    let turnaround = last_finish - process.arrival;
    Ok(ProcessMetrics {
        pid: process.pid,
        arrival: process.arrival,
        burst: process.burst,
        first_start,
        last_finish,
        response: first_start - process.arrival,
        turnaround,
        waiting: turnaround - process.burst,
        active,
    })
}

fn global_metrics(timeline: &Timeline, per_process: &[ProcessMetrics]) -> GlobalMetrics {
    let count = per_process.len();
    let waiting: Vec<f64> = per_process.iter().map(|m| m.waiting as f64).collect();
    let avg_waiting = mean(&waiting);
    let avg_turnaround = mean(
        &per_process
            .iter()
            .map(|m| m.turnaround as f64)
            .collect::<Vec<_>>(),
    );
    let avg_response = mean(
        &per_process
            .iter()
            .map(|m| m.response as f64)
            .collect::<Vec<_>>(),
    );

    let makespan = timeline.makespan();
    let busy_time = timeline.busy_time();
    let (cpu_utilization, throughput) = if makespan > 0 {
        (
            busy_time as f64 / makespan as f64,
            count as f64 / makespan as f64,
        )
    } else {
        (0.0, 0.0)
    };

    GlobalMetrics {
        process_count: count,
        avg_waiting,
        avg_turnaround,
        avg_response,
        min_waiting: per_process.iter().map(|m| m.waiting).min().unwrap_or(0),
        max_waiting: per_process.iter().map(|m| m.waiting).max().unwrap_or(0),
        std_dev_waiting: sample_std_dev(&waiting, avg_waiting),
        makespan,
        busy_time,
        cpu_utilization,
        throughput,
        context_switches: timeline.context_switches(),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}
