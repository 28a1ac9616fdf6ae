//! Memory usage check for hostcheck-rs.
//!
//! This module ties the meminfo reader to the evaluator behind the [`Check`]
//! trait.

use crate::evaluate::{evaluate, EvaluationResult};
use crate::meminfo::{MemorySnapshot, PROC_MEMINFO_PATH};
use hostcheck_rs_core::{Check, CheckError, CheckOutput, ThresholdSpec};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Memory usage check comparing used RAM against warning/critical limits.
///
/// # Examples
///
/// ```rust,no_run
/// use hostcheck_rs_core::{Check, ThresholdSpec};
/// use hostcheck_rs_memory::MemoryCheck;
///
/// let mut check = MemoryCheck::new(ThresholdSpec::percent(70), ThresholdSpec::percent(90));
/// let output = check.run()?;
/// println!("{output}");
/// # Ok::<(), hostcheck_rs_core::CheckError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MemoryCheck {
    name: String,
    warning: ThresholdSpec,
    critical: ThresholdSpec,
    meminfo_path: PathBuf,
}

impl MemoryCheck {
    /// Create a check reading `/proc/meminfo`.
    ///
    /// Thresholds are taken as given; a warning above critical is allowed and
    /// simply means the warning level is never reported.
    #[must_use]
    pub fn new(warning: ThresholdSpec, critical: ThresholdSpec) -> Self {
        Self {
            name: "memory".to_owned(),
            warning,
            critical,
            meminfo_path: PathBuf::from(PROC_MEMINFO_PATH),
        }
    }

    /// Create a check with the default `70%` / `80%` thresholds.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ThresholdSpec::DEFAULT_WARNING, ThresholdSpec::DEFAULT_CRITICAL)
    }

    /// Read from a different meminfo file.
    #[must_use]
    pub fn with_meminfo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.meminfo_path = path.into();
        self
    }

    #[must_use]
    pub fn warning(&self) -> ThresholdSpec {
        self.warning
    }

    #[must_use]
    pub fn critical(&self) -> ThresholdSpec {
        self.critical
    }

    #[must_use]
    pub fn meminfo_path(&self) -> &Path {
        &self.meminfo_path
    }

    /// Take one snapshot from the configured source.
    ///
    /// # Errors
    ///
    /// Propagates read, parse and missing-key errors.
    pub fn snapshot(&self) -> Result<MemorySnapshot, CheckError> {
        MemorySnapshot::from_meminfo_path(&self.meminfo_path)
    }

    /// Read and evaluate without rendering.
    ///
    /// # Errors
    ///
    /// Returns any snapshot error, or [`CheckError::Compute`] if the totals
    /// cannot be converted.
    pub fn evaluate(&self) -> Result<EvaluationResult, CheckError> {
        let snapshot = self.snapshot()?;
        debug!(
            total_kb = snapshot.total_kb,
            available_kb = snapshot.available_kb,
            "read memory snapshot"
        );

        let result = evaluate(&snapshot, self.warning, self.critical)?;
        debug!(
            used_kb = result.used_kb,
            warn_kb = result.warn_kb,
            crit_kb = result.crit_kb,
            level = %result.level,
            "evaluated memory usage"
        );
        Ok(result)
    }
}

impl Default for MemoryCheck {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Check for MemoryCheck {
    type Error = CheckError;

    fn run(&mut self) -> Result<CheckOutput, Self::Error> {
        Ok(self.evaluate()?.to_output())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn check_availability(&self) -> Result<(), Self::Error> {
        if !self.meminfo_path.exists() {
            return Err(CheckError::source_read(format!(
                "{} does not exist (not a Linux system?)",
                self.meminfo_path.display()
            )));
        }

        // Both required keys must be there, not just the file.
        self.snapshot().map(|_| ())
    }
}
