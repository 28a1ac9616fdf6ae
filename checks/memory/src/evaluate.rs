//! Threshold evaluation and report rendering for memory usage.

use crate::meminfo::MemorySnapshot;
use hostcheck_rs_core::convert::{self, ConversionError};
use hostcheck_rs_core::{format, CheckOutput, PerfData, Status, ThresholdSpec};
use serde::Serialize;
use tracing::warn;

/// Outcome of comparing one snapshot against the two thresholds.
///
/// Both thresholds carry a kB and a percent view regardless of the unit they
/// were written in. Derived percentages above 100 are legitimate (an absolute
/// threshold larger than the machine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    pub level: Status,
    pub used_kb: u64,
    pub total_kb: u64,
    pub used_percent: u64,
    pub warn_kb: u64,
    pub warn_percent: u64,
    pub crit_kb: u64,
    pub crit_percent: u64,
}

/// Decide the status for `snapshot`.
///
/// Comparison happens in kB space: percentage thresholds are converted against
/// the total first, and the truncated used percentage is only ever reported.
/// The comparison uses the unnarrowed kB limit, so a threshold too large to
/// report in `u64` is never reached.
///
/// # Errors
///
/// Returns [`ConversionError::DivisionByZero`] when the snapshot's total is 0.
pub fn evaluate(
    snapshot: &MemorySnapshot,
    warning: ThresholdSpec,
    critical: ThresholdSpec,
) -> Result<EvaluationResult, ConversionError> {
    let total_kb = snapshot.total_kb;
    let used_kb = snapshot.used_kb();
    let used_percent = convert::to_percent(used_kb, total_kb)?;

    let warn = convert::resolve(warning, total_kb)?;
    let crit = convert::resolve(critical, total_kb)?;

    Ok(EvaluationResult {
        level: Status::for_thresholds(u128::from(used_kb), warn.exact_kb, crit.exact_kb),
        used_kb,
        total_kb,
        used_percent,
        warn_kb: warn.kb,
        warn_percent: warn.percent,
        crit_kb: crit.kb,
        crit_percent: crit.percent,
    })
}

impl EvaluationResult {
    /// `Memory usage: <used>kB / <total>kB (<pct>%)`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Memory usage: {} / {} ({}%)",
            format::kilobytes(self.used_kb),
            format::kilobytes(self.total_kb),
            self.used_percent
        )
    }

    /// Used kB and used percent, in that order.
    #[must_use]
    pub fn perfdata(&self) -> [PerfData; 2] {
        [
            PerfData::new("used", self.used_kb, "KB")
                .with_thresholds(self.warn_kb, self.crit_kb)
                .with_range(0, self.total_kb),
            PerfData::new("used_pct", self.used_percent, "%")
                .with_thresholds(self.warn_percent, self.crit_percent)
                .with_range(0, 100),
        ]
    }

    /// Full check output, including the evaluation as JSON details.
    #[must_use]
    pub fn to_output(&self) -> CheckOutput {
        let mut output = CheckOutput::new(self.level, self.summary());
        for perf in self.perfdata() {
            output = output.with_perfdata(perf);
        }
        match serde_json::to_value(self) {
            Ok(details) => output.with_details(details),
            Err(e) => {
                warn!("Failed to attach evaluation details: {e}");
                output
            }
        }
    }
}
