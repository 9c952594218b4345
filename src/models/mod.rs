//! Simulation domain models.
//!
//! Provides the plain data types exchanged with callers: the immutable
//! process descriptors a run consumes and the timeline it produces.
//!
//! # Domain Mappings
//!
//! | u-cpusched | Operating system | Textbook |
//! |------------|------------------|----------|
//! | ProcessDescriptor | Task / thread | Job |
//! | ExecutionSlice | Time on a run queue | Gantt bar |
//! | Timeline | Per-CPU trace | Gantt chart |

mod process;
mod timeline;

pub(crate) use process::arrival_order;
pub use process::{Pid, ProcessDescriptor, Time, DEFAULT_PRIORITY};
pub use timeline::{ExecutionSlice, Timeline};
