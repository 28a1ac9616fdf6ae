//! Kilobyte/percentage conversions against a known total.
//!
//! All conversions use truncating integer division so that reported figures
//! match what monitoring tooling computes from the same raw numbers. Products
//! are taken in 128-bit space. A reported figure that does not fit in `u64`
//! saturates; threshold comparisons use the exact 128-bit value.

use crate::threshold::{ThresholdKind, ThresholdSpec};

/// Conversion failure against a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// The total was zero, so no ratio exists.
    #[error("division by zero: total is 0 kB")]
    DivisionByZero,
}

/// Used memory from total and available, clamped at zero.
#[must_use]
pub const fn used_kb(total_kb: u64, available_kb: u64) -> u64 {
    total_kb.saturating_sub(available_kb)
}

fn saturate(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// `floor(kb * 100 / total_kb)`, saturating at `u64::MAX`.
///
/// # Errors
///
/// Returns [`ConversionError::DivisionByZero`] when `total_kb` is 0.
pub fn to_percent(kb: u64, total_kb: u64) -> Result<u64, ConversionError> {
    if total_kb == 0 {
        return Err(ConversionError::DivisionByZero);
    }
    Ok(saturate(u128::from(kb) * 100 / u128::from(total_kb)))
}

/// `floor(total_kb * percent / 100)` without narrowing.
///
/// # Errors
///
/// Returns [`ConversionError::DivisionByZero`] when `total_kb` is 0, keeping
/// both directions consistent for a degenerate total.
pub fn to_kb_exact(percent: u64, total_kb: u64) -> Result<u128, ConversionError> {
    if total_kb == 0 {
        return Err(ConversionError::DivisionByZero);
    }
    Ok(u128::from(total_kb) * u128::from(percent) / 100)
}

/// `floor(total_kb * percent / 100)`, saturating at `u64::MAX`.
///
/// # Errors
///
/// See [`to_kb_exact`].
pub fn to_kb(percent: u64, total_kb: u64) -> Result<u64, ConversionError> {
    to_kb_exact(percent, total_kb).map(saturate)
}

/// A threshold expressed in both units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedThreshold {
    /// Reported kB, saturated at `u64::MAX`
    pub kb: u64,
    /// Reported percent, saturated at `u64::MAX`
    pub percent: u64,
    /// kB limit used for comparison
    pub exact_kb: u128,
}

/// Resolve a threshold to its kB and percent views.
///
/// The unit the user wrote is carried through unchanged; the other view is
/// derived from `total_kb`. No threshold value is too large: a percentage
/// whose kB form exceeds `u64` is simply never reached.
///
/// # Errors
///
/// Returns [`ConversionError::DivisionByZero`] when `total_kb` is 0.
pub fn resolve(spec: ThresholdSpec, total_kb: u64) -> Result<ResolvedThreshold, ConversionError> {
    match spec.kind() {
        ThresholdKind::Percent => {
            let exact_kb = to_kb_exact(spec.value(), total_kb)?;
            Ok(ResolvedThreshold {
                kb: saturate(exact_kb),
                percent: spec.value(),
                exact_kb,
            })
        }
        ThresholdKind::Absolute => Ok(ResolvedThreshold {
            kb: spec.value(),
            percent: to_percent(spec.value(), total_kb)?,
            exact_kb: u128::from(spec.value()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_to_percent_truncates() {
        assert_eq!(to_percent(700_000, 1_000_000), Ok(70));
        assert_eq!(to_percent(1, 3), Ok(33));
        assert_eq!(to_percent(2, 3), Ok(66));
        assert_eq!(to_percent(2_000_000, 1_000_000), Ok(200));
    }

    #[test]
    fn test_to_kb_truncates() {
        assert_eq!(to_kb(70, 1_000_000), Ok(700_000));
        assert_eq!(to_kb(33, 7), Ok(2));
        assert_eq!(to_kb(150, 1_000_000), Ok(1_500_000));
    }

    #[test]
    fn test_zero_total_is_division_by_zero() {
        assert_eq!(to_percent(10, 0), Err(ConversionError::DivisionByZero));
        assert_eq!(to_kb(10, 0), Err(ConversionError::DivisionByZero));
        assert_eq!(
            resolve(ThresholdSpec::absolute(5), 0),
            Err(ConversionError::DivisionByZero)
        );
    }

    #[test]
    fn test_oversized_values_saturate() {
        assert_eq!(to_percent(u64::MAX, 1), Ok(u64::MAX));
        assert_eq!(to_kb(u64::MAX, u64::MAX), Ok(u64::MAX));
        assert_eq!(to_kb(100, u64::MAX), Ok(u64::MAX));
        assert_eq!(
            to_kb_exact(u64::MAX, u64::MAX),
            Ok(u128::from(u64::MAX) * u128::from(u64::MAX) / 100)
        );
    }

    #[test]
    fn test_huge_percent_threshold_is_never_reached() {
        let resolved =
            resolve(ThresholdSpec::percent(200_000_000_000_000_000), 16_384_000).unwrap();
        assert_eq!(resolved.kb, u64::MAX);
        assert!(u128::from(16_384_000u64) < resolved.exact_kb);

        // Saturation alone would make a full machine of u64::MAX kB "reach" it.
        let resolved = resolve(ThresholdSpec::percent(101), u64::MAX).unwrap();
        assert_eq!(resolved.kb, u64::MAX);
        assert!(u128::from(u64::MAX) < resolved.exact_kb);
    }

    #[test]
    fn test_resolve_keeps_written_unit() {
        assert_eq!(
            resolve(ThresholdSpec::percent(80), 1_000_000),
            Ok(ResolvedThreshold {
                kb: 800_000,
                percent: 80,
                exact_kb: 800_000
            })
        );
        assert_eq!(
            resolve(ThresholdSpec::absolute(4_000_000), 1_000_000),
            Ok(ResolvedThreshold {
                kb: 4_000_000,
                percent: 400,
                exact_kb: 4_000_000
            })
        );
    }

    #[test]
    fn test_used_kb_edges() {
        assert_eq!(used_kb(1_000_000, 300_000), 700_000);
        assert_eq!(used_kb(1_000, 1_000), 0);
        assert_eq!(used_kb(1_000, 5_000), 0);
        assert_eq!(used_kb(0, 0), 0);
    }

    proptest! {
        #[test]
        fn prop_used_kb_is_difference(a in any::<u64>(), b in any::<u64>()) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert_eq!(used_kb(high, low), high - low);
            prop_assert_eq!(used_kb(high, high), 0);
            if low < high {
                prop_assert_eq!(used_kb(low, high), 0);
            }
        }

        #[test]
        fn prop_round_trip_never_grows(total in 1u64..=u64::MAX / 2, ratio in 0.0f64..=1.0) {
            let kb = ((total as f64) * ratio) as u64;
            let kb = kb.min(total);
            let percent = to_percent(kb, total).unwrap();
            prop_assert!(percent <= 100);
            prop_assert!(to_kb(percent, total).unwrap() <= kb);
        }
    }
}
