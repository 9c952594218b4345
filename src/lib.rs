//! Deterministic single-CPU scheduling simulator.
//!
//! Replays a fixed set of processes through classic scheduling policies and
//! reports the resulting execution timeline and its performance metrics.
//! Every run is a pure function of its input: no wall-clock time, no shared
//! state, identical output for identical input.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ProcessDescriptor`, `ExecutionSlice`, `Timeline`
//! - **`validation`**: Input integrity checks (empty input, duplicate pids, bad bursts)
//! - **`error`**: `SchedError` and `SchedResult`
//! - **`dispatching`**: Per-run state, ready-set containers and selection rules
//! - **`scheduler`**: FCFS, SJF, SRTF, Round Robin, Priority, Priority with aging,
//!   weighted-fair (CFS-style) and MLFQ, plus the `Policy` configuration enum
//! - **`metrics`**: Per-process and global metrics, starvation detection
//! - **`suite`**: Multi-policy comparison runs
//! - **`workload`**: Seeded synthetic process lists
//!
//! # Example
//!
//! ```
//! use u_cpusched::models::ProcessDescriptor;
//! use u_cpusched::scheduler::Policy;
//! use u_cpusched::metrics::aggregate;
//!
//! let procs = vec![
//!     ProcessDescriptor::new(1, 0, 5),
//!     ProcessDescriptor::new(2, 1, 3),
//!     ProcessDescriptor::new(3, 2, 1),
//! ];
//! let timeline = Policy::round_robin().run(&procs)?;
//! let (_, global) = aggregate(&timeline, &procs)?;
//! assert_eq!(global.makespan, 9);
//! # Ok::<(), u_cpusched::SchedError>(())
//! ```
//!
//! # Logging
//!
//! Runs emit `tracing` events (`debug` per run, `trace` per dispatch
//! decision). The crate installs no subscriber.
//!
//! # References
//!
//! - Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5
//! - Arpaci-Dusseau (2018), "Operating Systems: Three Easy Pieces", Ch. 7-9

pub mod dispatching;
pub mod error;
pub mod metrics;
pub mod models;
pub mod scheduler;
pub mod suite;
pub mod validation;
pub mod workload;

pub use error::{SchedError, SchedResult};
pub use models::{ExecutionSlice, Pid, ProcessDescriptor, Time, Timeline};
pub use scheduler::Policy;
