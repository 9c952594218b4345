//! Input validation for simulation runs.
//!
//! Checks the process list at the input boundary, before any policy takes
//! a simulation step. Detects:
//! - Empty process lists
//! - Duplicate or non-positive pids
//! - Non-positive bursts
//! - Negative arrivals
//! - Workloads whose last possible completion does not fit in [`Time`]
//!
//! Policy parameters are checked separately by [`require_positive`].

use crate::error::{SchedError, SchedResult};
use crate::models::{ProcessDescriptor, Time};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The process list is empty.
    EmptyInput,
    /// Two processes share the same pid.
    DuplicatePid,
    /// A pid is zero.
    InvalidPid,
    /// A burst is zero or negative.
    NonPositiveBurst,
    /// An arrival is negative.
    NegativeArrival,
    /// The latest arrival plus the total burst exceeds `Time::MAX`.
    TimeOverflow,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a process list.
///
/// Checks:
/// 1. At least one process
/// 2. Every pid is positive
/// 3. No duplicate pids
/// 4. Every burst is at least 1
/// 5. No negative arrival
/// 6. Latest arrival plus total burst fits in [`Time`]
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_processes(processes: &[ProcessDescriptor]) -> ValidationResult {
    let mut errors = Vec::new();

    if processes.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInput,
            "Process list is empty",
        ));
    }

    let mut pids = HashSet::new();
    for p in processes {
        if p.pid == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPid,
                "Pid 0 is not a valid process id",
            ));
        }
        if !pids.insert(p.pid) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicatePid,
                format!("Duplicate pid: {}", p.pid),
            ));
        }
        if p.burst <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveBurst,
                format!("Process {} has burst {}", p.pid, p.burst),
            ));
        }
        if p.arrival < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeArrival,
                format!("Process {} arrives at {}", p.pid, p.arrival),
            ));
        }
    }

    if completion_bound(processes).is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::TimeOverflow,
            "Latest arrival plus total burst exceeds the time range",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Latest time any schedule of `processes` can reach: the last arrival plus
/// every burst. `None` on overflow. Non-positive values are ignored.
fn completion_bound(processes: &[ProcessDescriptor]) -> Option<Time> {
    let latest = processes.iter().map(|p| p.arrival.max(0)).max().unwrap_or(0);
    processes
        .iter()
        .try_fold(latest, |acc, p| acc.checked_add(p.burst.max(0)))
}

/// [`validate_processes`] lifted into a [`SchedError::InvalidInput`].
pub fn check_processes(processes: &[ProcessDescriptor]) -> SchedResult<()> {
    validate_processes(processes).map_err(SchedError::InvalidInput)
}

/// Rejects a parameter that is zero or negative.
pub fn require_positive(name: &'static str, value: i64) -> SchedResult<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(SchedError::parameter(
            name,
            format!("must be positive, got {value}"),
        ))
    }
}
