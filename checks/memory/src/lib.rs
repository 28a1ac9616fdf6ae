//! Memory usage check for hostcheck-rs.
//!
//! This crate reads memory statistics from `/proc/meminfo`, computes used
//! memory in kB and percent, and compares it against warning/critical
//! thresholds given either as kB or as a percentage of total memory.
//!
//! # Examples
//!
//! ```rust
//! use hostcheck_rs_core::{Status, ThresholdSpec};
//! use hostcheck_rs_memory::{evaluate, MemorySnapshot};
//!
//! let snapshot = MemorySnapshot::new(1_000_000, 300_000);
//! let result = evaluate(&snapshot, "70%".parse()?, ThresholdSpec::percent(80))?;
//!
//! assert_eq!(result.level, Status::Warning);
//! assert_eq!(result.used_percent, 70);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod evaluate;
pub mod meminfo;
pub mod memory;

pub use evaluate::{evaluate, EvaluationResult};
pub use meminfo::{MemInfo, MemorySnapshot, PROC_MEMINFO_PATH};
pub use memory::MemoryCheck;
