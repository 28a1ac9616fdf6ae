//! Warning and critical threshold values.
//!
//! A threshold is written either as a plain kilobyte count (`2000000`) or as a
//! percentage of total capacity (`80%`). Both forms are kept verbatim; turning
//! one into the other is the job of the [`convert`](crate::convert) module once
//! the total is known.

use std::fmt;
use std::str::FromStr;

/// Unit a [`ThresholdSpec`] was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThresholdKind {
    /// Percentage of the total (`N%`).
    Percent,
    /// Absolute value in kilobytes (`N`).
    Absolute,
}

/// A parsed `--warning` / `--critical` value.
///
/// No upper bound is applied: `150%` is accepted and simply never fires
/// against real memory figures.
///
/// # Examples
///
/// ```rust
/// use hostcheck_rs_core::{ThresholdKind, ThresholdSpec};
///
/// let spec: ThresholdSpec = "80%".parse().unwrap();
/// assert_eq!(spec.kind(), ThresholdKind::Percent);
/// assert_eq!(spec.value(), 80);
///
/// let spec: ThresholdSpec = "2000000".parse().unwrap();
/// assert_eq!(spec.kind(), ThresholdKind::Absolute);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThresholdSpec {
    kind: ThresholdKind,
    value: u64,
}

impl ThresholdSpec {
    /// Default warning threshold, `70%`.
    pub const DEFAULT_WARNING: Self = Self::percent(70);
    /// Default critical threshold, `80%`.
    pub const DEFAULT_CRITICAL: Self = Self::percent(80);

    /// Threshold expressed as a percentage of the total.
    #[must_use]
    pub const fn percent(value: u64) -> Self {
        Self {
            kind: ThresholdKind::Percent,
            value,
        }
    }

    /// Threshold expressed as an absolute kilobyte count.
    #[must_use]
    pub const fn absolute(value: u64) -> Self {
        Self {
            kind: ThresholdKind::Absolute,
            value,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ThresholdKind {
        self.kind
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }
}

impl fmt::Display for ThresholdSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ThresholdKind::Percent => write!(f, "{}%", self.value),
            ThresholdKind::Absolute => write!(f, "{}", self.value),
        }
    }
}

impl FromStr for ThresholdSpec {
    type Err = ThresholdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, kind) = match s.strip_suffix('%') {
            Some(rest) => (rest, ThresholdKind::Percent),
            None => (s, ThresholdKind::Absolute),
        };

        // u64::from_str would also take a leading '+'; only bare digits are valid.
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ThresholdParseError::new(s));
        }

        let value = digits
            .parse::<u64>()
            .map_err(|_| ThresholdParseError::new(s))?;

        Ok(Self { kind, value })
    }
}

/// Error type for parsing [`ThresholdSpec`] from string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid threshold '{input}'. Expected <int> (kB) or <int>%")]
pub struct ThresholdParseError {
    input: String,
}

impl ThresholdParseError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_owned(),
        }
    }

    /// The rejected argument text.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percent() {
        let spec: ThresholdSpec = "70%".parse().unwrap();
        assert_eq!(spec, ThresholdSpec::percent(70));
        assert_eq!(spec.kind(), ThresholdKind::Percent);
    }

    #[test]
    fn test_parse_absolute() {
        let spec: ThresholdSpec = "2000000".parse().unwrap();
        assert_eq!(spec.kind(), ThresholdKind::Absolute);
        assert_eq!(spec.value(), 2_000_000);
    }

    #[test]
    fn test_parse_above_hundred_percent() {
        assert_eq!(
            "150%".parse::<ThresholdSpec>().unwrap(),
            ThresholdSpec::percent(150)
        );
        assert_eq!(
            "0%".parse::<ThresholdSpec>().unwrap(),
            ThresholdSpec::percent(0)
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "%", "-5", "+5", "5%%", "abc", "5 %", " 5", "5.0", "%5", "5kB"] {
            let err = input.parse::<ThresholdSpec>().unwrap_err();
            assert_eq!(err.input(), input);
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!("18446744073709551616".parse::<ThresholdSpec>().is_err());
        assert!("18446744073709551615".parse::<ThresholdSpec>().is_ok());
    }

    #[test]
    fn test_display_round_trips() {
        assert_eq!(ThresholdSpec::DEFAULT_WARNING.to_string(), "70%");
        assert_eq!(ThresholdSpec::DEFAULT_CRITICAL.to_string(), "80%");
        assert_eq!(ThresholdSpec::absolute(4_000_000).to_string(), "4000000");
    }
}
