//! Timeline metrics and starvation detection.
//!
//! [`aggregate`] turns a timeline and its process list into per-process and
//! global records; the records carry no behavior and serialize as plain
//! data for reporting.
//!
//! # Reference
//! Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5.2

mod aggregate;
mod starvation;

pub use aggregate::{aggregate, GlobalMetrics, ProcessMetrics};
pub use starvation::detect_starvation;
