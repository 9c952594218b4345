//! Multi-policy comparison runs.
//!
//! Runs a list of policies over the same process list, each on its own copy,
//! and collects timelines, metrics and a comparison row per policy. When
//! plain priority scheduling leaves a process waiting longer than the
//! configured threshold, the configured aging policy is run as well.
//!
//! # Example
//!
//! ```
//! use u_cpusched::models::ProcessDescriptor;
//! use u_cpusched::suite::{run_suite, SuiteConfig};
//!
//! let procs = vec![
//!     ProcessDescriptor::new(1, 0, 5),
//!     ProcessDescriptor::new(2, 1, 3),
//!     ProcessDescriptor::new(3, 2, 1),
//! ];
//! let reports = run_suite(&procs, &SuiteConfig::default()).unwrap();
//! assert_eq!(reports.len(), 7);
//! assert_eq!(reports[0].global.makespan, 9);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::SchedResult;
use crate::metrics::{aggregate, detect_starvation, GlobalMetrics, ProcessMetrics};
use crate::models::{Pid, ProcessDescriptor, Time, Timeline};
use crate::scheduler::Policy;
use crate::validation::check_processes;

/// Default waiting time above which a process counts as starving.
pub const DEFAULT_STARVATION_THRESHOLD: Time = 20;

/// Suite configuration.
///
/// Deserializes with defaults for every omitted field, e.g.
/// `{"policies": [{"policy": "fcfs"}], "starvation_threshold": 10}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Policies to run, in report order.
    pub policies: Vec<Policy>,
    /// Waiting time above which a process counts as starving.
    pub starvation_threshold: Time,
    /// Policy rerun when plain priority scheduling starves a process.
    /// `None` disables the rerun.
    pub aging: Option<Policy>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            policies: Policy::all(),
            starvation_threshold: DEFAULT_STARVATION_THRESHOLD,
            aging: Some(Policy::priority_aging()),
        }
    }
}

impl SuiteConfig {
    /// Sets the policies to run.
    pub fn with_policies(mut self, policies: Vec<Policy>) -> Self {
        self.policies = policies;
        self
    }

    /// Sets the starvation threshold.
    pub fn with_starvation_threshold(mut self, threshold: Time) -> Self {
        self.starvation_threshold = threshold;
        self
    }

    /// Sets the policy rerun on starvation.
    pub fn with_aging(mut self, aging: Policy) -> Self {
        self.aging = Some(aging);
        self
    }

    /// Disables the starvation rerun.
    pub fn without_aging(mut self) -> Self {
        self.aging = None;
        self
    }

    /// Checks every configured policy's parameters.
    pub fn validate(&self) -> SchedResult<()> {
        for policy in self.policies.iter().chain(self.aging.iter()) {
            policy.validate()?;
        }
        Ok(())
    }
}

/// Outcome of one policy run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyReport {
    /// Display label (policy name and parameters).
    pub label: String,
    /// The policy that produced this report.
    pub policy: Policy,
    /// Produced timeline.
    pub timeline: Timeline,
    /// Per-process metrics, ascending pid.
    pub per_process: Vec<ProcessMetrics>,
    /// Aggregate metrics.
    pub global: GlobalMetrics,
    /// Pids whose waiting time exceeded the suite threshold.
    pub starving: Vec<Pid>,
}

/// One row of a policy comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySummary {
    pub label: String,
    pub avg_waiting: f64,
    pub avg_turnaround: f64,
    pub avg_response: f64,
    pub cpu_utilization: f64,
    pub throughput: f64,
    pub context_switches: usize,
    pub makespan: Time,
}

impl PolicyReport {
    /// Comparison row for this report.
    pub fn summary(&self) -> PolicySummary {
        PolicySummary {
            label: self.label.clone(),
            avg_waiting: self.global.avg_waiting,
            avg_turnaround: self.global.avg_turnaround,
            avg_response: self.global.avg_response,
            cpu_utilization: self.global.cpu_utilization,
            throughput: self.global.throughput,
            context_switches: self.global.context_switches,
            makespan: self.global.makespan,
        }
    }
}

/// Runs one policy and aggregates its metrics.
pub fn run_policy(
    policy: &Policy,
    processes: &[ProcessDescriptor],
    starvation_threshold: Time,
) -> SchedResult<PolicyReport> {
    let timeline = policy.run(processes)?;
    let (per_process, global) = aggregate(&timeline, processes)?;
    let starving = detect_starvation(&per_process, starvation_threshold);

    debug!(
        policy = policy.name(),
        avg_waiting = global.avg_waiting,
        makespan = global.makespan,
        starving = starving.len(),
        "policy evaluated"
    );

    Ok(PolicyReport {
        label: policy.label(),
        policy: policy.clone(),
        timeline,
        per_process,
        global,
        starving,
    })
}

/// Runs every configured policy over `processes`.
///
/// Input and all parameters (including the aging fallback) are validated
/// before the first run, so an error never comes with partial results.
pub fn run_suite(
    processes: &[ProcessDescriptor],
    config: &SuiteConfig,
) -> SchedResult<Vec<PolicyReport>> {
    check_processes(processes)?;
    config.validate()?;

    info!(
        processes = processes.len(),
        policies = config.policies.len(),
        "running policy suite"
    );

    let mut reports = Vec::with_capacity(config.policies.len() + 1);
    for policy in &config.policies {
        let report = run_policy(policy, processes, config.starvation_threshold)?;
        let rerun = match (&report.policy, &config.aging) {
            (Policy::Priority, Some(aging)) if !report.starving.is_empty() => Some(aging),
            _ => None,
        };
        if let Some(aging) = rerun {
            warn!(
                starving = ?report.starving,
                threshold = config.starvation_threshold,
                "starvation under priority scheduling, rerunning with aging"
            );
            reports.push(report);
            reports.push(run_policy(aging, processes, config.starvation_threshold)?);
        } else {
            reports.push(report);
        }
    }

    Ok(reports)
}

/// Comparison rows for a set of reports.
pub fn summarize(reports: &[PolicyReport]) -> Vec<PolicySummary> {
    reports.iter().map(PolicyReport::summary).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchedError;

    fn reference_processes() -> Vec<ProcessDescriptor> {
        vec![
            ProcessDescriptor::new(1, 0, 5),
            ProcessDescriptor::new(2, 1, 3),
            ProcessDescriptor::new(3, 2, 1),
        ]
    }

    fn starving_processes() -> Vec<ProcessDescriptor> {
        let mut procs = vec![ProcessDescriptor::new(1, 0, 2).with_priority(2)];
        for k in 0..10u32 {
            procs.push(ProcessDescriptor::new(k + 2, 5 * i64::from(k), 5).with_priority(1));
        }
        procs
    }

    #[test]
    fn test_default_suite_runs_seven_policies() {
        let reports = run_suite(&reference_processes(), &SuiteConfig::default()).unwrap();
        let names: Vec<&str> = reports.iter().map(|r| r.policy.name()).collect();
        assert_eq!(names, ["FCFS", "SJF", "SRTF", "RR", "Priority", "CFS", "MLFQ"]);
        for r in &reports {
            assert_eq!(r.per_process.len(), 3);
            assert!(r.starving.is_empty());
        }
    }

    #[test]
    fn test_starvation_triggers_aging_rerun() {
        let procs = starving_processes();
        let config = SuiteConfig::default().with_policies(vec![Policy::Fcfs, Policy::Priority]);
        let reports = run_suite(&procs, &config).unwrap();

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[1].policy, Policy::Priority);
        assert_eq!(reports[1].starving, vec![1]);
        assert_eq!(reports[2].policy, Policy::priority_aging());
        assert!(reports[2].starving.is_empty());
    }

    #[test]
    fn test_no_rerun_without_aging() {
        let procs = starving_processes();
        let config = SuiteConfig::default()
            .with_policies(vec![Policy::Priority])
            .without_aging();
        let reports = run_suite(&procs, &config).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].starving, vec![1]);
    }

    #[test]
    fn test_bad_parameters_fail_before_any_run() {
        let config = SuiteConfig::default()
            .with_policies(vec![Policy::Fcfs, Policy::RoundRobin { quantum: 0 }]);
        let err = run_suite(&reference_processes(), &config).unwrap_err();
        assert!(matches!(err, SchedError::InvalidParameters { name: "quantum", .. }));

        let config = SuiteConfig::default().with_aging(Policy::PriorityAging {
            aging_interval: 0,
            aging_delta: 1,
        });
        assert!(run_suite(&reference_processes(), &config).is_err());
    }

    #[test]
    fn test_runs_do_not_share_state() {
        let procs = reference_processes();
        let config = SuiteConfig::default().with_policies(vec![Policy::Fcfs, Policy::Fcfs]);
        let reports = run_suite(&procs, &config).unwrap();
        assert_eq!(reports[0].timeline, reports[1].timeline);
        assert_eq!(reports[0].per_process, reports[1].per_process);
    }

    #[test]
    fn test_summary_rows() {
        let reports = run_suite(&reference_processes(), &SuiteConfig::default()).unwrap();
        let rows = summarize(&reports);
        assert_eq!(rows.len(), reports.len());
        assert_eq!(rows[0].label, "FCFS");
        assert_eq!(rows[0].makespan, 9);
        assert_eq!(rows[0].context_switches, 2);
        assert_eq!(rows[3].label, "Round Robin (q=2)");
    }

    #[test]
    fn test_config_from_json() {
        let config: SuiteConfig = serde_json::from_str(
            r#"{
                "policies": [
                    {"policy": "fcfs"},
                    {"policy": "round_robin", "quantum": 3},
                    {"policy": "weighted_fair"}
                ],
                "starvation_threshold": 12
            }"#,
        )
        .unwrap();
        assert_eq!(config.policies.len(), 3);
        assert_eq!(config.policies[1], Policy::RoundRobin { quantum: 3 });
        assert_eq!(config.policies[2], Policy::weighted_fair());
        assert_eq!(config.starvation_threshold, 12);
        assert_eq!(config.aging, Some(Policy::priority_aging()));
    }

    #[test]
    fn test_config_defaults_from_empty_json() {
        let config: SuiteConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SuiteConfig::default());
    }

    #[test]
    fn test_report_serializes() {
        let report = run_policy(&Policy::Fcfs, &reference_processes(), 20).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["policy"]["policy"], "fcfs");
        assert_eq!(json["global"]["makespan"], 9);
        assert_eq!(json["timeline"]["slices"][0]["finish"], 5);
    }
}
