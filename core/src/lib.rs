//! # hostcheck-rs-core
//!
//! Core library for the hostcheck-rs suite providing the pieces every
//! monitoring check shares.
//!
//! ## Features
//!
//! - **Plugin status model** - `OK`/`WARNING`/`CRITICAL`/`UNKNOWN` with fixed exit codes
//! - **Threshold parsing** - `N` (kB) or `N%` limits
//! - **Unit conversion** - truncating kB/percent conversion against a total
//! - **Performance data** - stable `label=value;warn;crit;min;max` rendering
//! - **Error handling** - one error type that maps every failure to UNKNOWN
//!
//! ## Quick Start
//!
//! ```rust
//! use hostcheck_rs_core::{Check, CheckError, CheckOutput, Status};
//!
//! struct AlwaysOk {
//!     name: String,
//! }
//!
//! impl Check for AlwaysOk {
//!     type Error = CheckError;
//!
//!     fn run(&mut self) -> Result<CheckOutput, Self::Error> {
//!         Ok(CheckOutput::new(Status::Ok, "nothing to see"))
//!     }
//!
//!     fn name(&self) -> &str {
//!         &self.name
//!     }
//! }
//! ```

pub mod convert;
pub mod error;
pub mod threshold;

pub use convert::{ConversionError, ResolvedThreshold};
pub use error::{CheckError, ErrorCategory};
pub use threshold::{ThresholdKind, ThresholdParseError, ThresholdSpec};

use serde::Serialize;
use std::fmt;

/// Result level of a check, as understood by the monitoring supervisor.
///
/// The derived ordering runs from best to worst, so [`Status::worst`] is a
/// plain maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Process exit code the supervisor expects for this status.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Unknown => 3,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Get the status for a value compared against two thresholds.
    ///
    /// Critical is checked first, so a value that reaches both thresholds is
    /// `Critical` even when the warning threshold is the larger of the two:
    /// - `Critical` if `value >= critical`
    /// - `Warning` if `value >= warning`
    /// - `Ok` otherwise
    #[must_use]
    pub fn for_thresholds<T: PartialOrd>(value: T, warning: T, critical: T) -> Self {
        if value >= critical {
            Self::Critical
        } else if value >= warning {
            Self::Warning
        } else {
            Self::Ok
        }
    }

    /// The more severe of two statuses.
    #[must_use]
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One performance data metric.
///
/// Rendered as `label=value[uom];[warn];[crit];[min];[max]`, with trailing
/// empty fields dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerfData {
    pub label: String,
    pub value: u64,
    pub uom: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
}

impl PerfData {
    #[must_use]
    pub fn new(label: impl Into<String>, value: u64, uom: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value,
            uom: uom.into(),
            warning: None,
            critical: None,
            min: None,
            max: None,
        }
    }

    /// Attach warning and critical bounds.
    #[must_use]
    pub fn with_thresholds(mut self, warning: u64, critical: u64) -> Self {
        self.warning = Some(warning);
        self.critical = Some(critical);
        self
    }

    /// Attach the value range.
    #[must_use]
    pub fn with_range(mut self, min: u64, max: u64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }
}

impl fmt::Display for PerfData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}{}",
            format::perfdata_label(&self.label),
            self.value,
            self.uom
        )?;

        let fields = [self.warning, self.critical, self.min, self.max];
        let used = fields.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
        for field in &fields[..used] {
            match field {
                Some(v) => write!(f, ";{v}")?,
                None => f.write_str(";")?,
            }
        }
        Ok(())
    }
}

/// Final result of one check run: one status, one line.
///
/// # Examples
///
/// ```rust
/// use hostcheck_rs_core::{CheckOutput, PerfData, Status};
///
/// let output = CheckOutput::new(Status::Warning, "Load: 4.2")
///     .with_perfdata(PerfData::new("load1", 4, "").with_thresholds(4, 8));
///
/// assert_eq!(output.to_string(), "WARNING - Load: 4.2 | load1=4;4;8");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutput {
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub perfdata: Vec<PerfData>,
    /// Optional structured payload for JSON output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CheckOutput {
    #[must_use]
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            perfdata: Vec::new(),
            details: None,
        }
    }

    /// An `UNKNOWN` result carrying a diagnostic.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Status::Unknown, message)
    }

    /// Append a performance data metric.
    #[must_use]
    pub fn with_perfdata(mut self, perfdata: PerfData) -> Self {
        self.perfdata.push(perfdata);
        self
    }

    /// Attach a structured payload, emitted only in JSON mode.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Serialize as a single line of JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the details payload fails to serialize.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for CheckOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::status_line(self.status, &self.message))?;
        if !self.perfdata.is_empty() {
            write!(f, " | {}", format::perfdata_list(&self.perfdata))?;
        }
        Ok(())
    }
}

/// Trait for all checks producing supervisor-compatible output.
///
/// A check is built once from its arguments, run once, and discarded.
pub trait Check {
    /// Error type for check operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Collect data, evaluate it and return the final result.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be read or evaluated. Callers
    /// report such errors as [`Status::Unknown`].
    fn run(&mut self) -> Result<CheckOutput, Self::Error>;

    /// Get the unique name/identifier for this check.
    fn name(&self) -> &str;

    /// Check if the data source is usable on this system.
    ///
    /// Default implementation returns `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns an error if the check cannot run here.
    fn check_availability(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Utility functions for rendering check output.
pub mod format {
    use super::{PerfData, Status};

    /// `<LEVEL> - <message>`.
    #[must_use]
    pub fn status_line(status: Status, message: &str) -> String {
        format!("{status} - {message}")
    }

    /// Space-separated metrics in the order given.
    #[must_use]
    pub fn perfdata_list(perfdata: &[PerfData]) -> String {
        perfdata
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Quote a perfdata label when it contains characters the format reserves.
    #[must_use]
    pub fn perfdata_label(label: &str) -> String {
        if label.contains([' ', '=', '\'']) {
            format!("'{}'", label.replace('\'', "''"))
        } else {
            label.to_owned()
        }
    }

    /// Kilobyte figure as printed in status lines, e.g. `700000kB`.
    #[must_use]
    pub fn kilobytes(kb: u64) -> String {
        format!("{kb}kB")
    }
}

/// Diagnostic output on stderr.
pub mod logging {
    use std::io::IsTerminal;
    use tracing::Level;

    /// Install the stderr subscriber.
    ///
    /// Stdout carries exactly the check result, so every event goes to stderr
    /// with a timestamp. Calling this twice is harmless.
    pub fn init(verbose: bool) {
        let level = if verbose { Level::DEBUG } else { Level::WARN };
        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(level)
            .with_target(false)
            .with_ansi(std::io::stderr().is_terminal())
            .try_init();
    }
}
