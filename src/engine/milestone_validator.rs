// ==========================================
// PipeTrak Progress Engine - milestone weight validator
// ==========================================
// Responsibility: the single source of truth for "is this weight set
// valid". Every template write path (bulk edit, single value tweak, clone)
// must pass through here before anything is committed - there are never
// divergent copies of this rule.
// ==========================================
// Rule: Σ weight == 100 exactly, compared in fixed decimal (integer
// hundredths), so 33.34 + 33.33 + 33.33 passes and floating drift cannot
// creep in. Individual weights must lie in [0, 100]; a weight of exactly 0
// marks an optional milestone, but at least one weight must be > 0.
// ==========================================

use crate::domain::milestone::MilestoneWeight;
use thiserror::Error;

/// Target sum in hundredths of a percent
const TARGET_SUM_HUNDREDTHS: i64 = 100_00;

// ==========================================
// WeightValidationError - rejected weight sets
// ==========================================
// Carries the actual computed sum so the caller can display
// actual-vs-expected without consulting logs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeightValidationError {
    #[error("milestone weights must sum to exactly 100, got {actual_sum}")]
    SumMismatch { actual_sum: f64 },

    #[error("milestone weight out of range [0, 100]: {name} = {weight}")]
    OutOfRange { name: String, weight: f64 },

    #[error("at least one milestone weight must be greater than 0")]
    AllZero,

    #[error("milestone weight set is empty")]
    Empty,

    #[error("duplicate milestone name: {name}")]
    DuplicateName { name: String },

    #[error("milestone name must not be blank")]
    BlankName,
}

/// Round a weight to integer hundredths (fixed-decimal comparison basis)
fn to_hundredths(weight: f64) -> i64 {
    (weight * 100.0).round() as i64
}

/// Validate a milestone weight set
///
/// Returns `Ok(())` iff the set can be persisted. Enforced identically for
/// every mutation path.
pub fn validate(weights: &[MilestoneWeight]) -> Result<(), WeightValidationError> {
    if weights.is_empty() {
        return Err(WeightValidationError::Empty);
    }

    let mut sum_hundredths: i64 = 0;
    let mut any_positive = false;
    let mut seen: Vec<&str> = Vec::with_capacity(weights.len());

    for entry in weights {
        let name = entry.name.trim();
        if name.is_empty() {
            return Err(WeightValidationError::BlankName);
        }
        if seen.iter().any(|s| s.eq_ignore_ascii_case(name)) {
            return Err(WeightValidationError::DuplicateName {
                name: name.to_string(),
            });
        }
        seen.push(name);

        if !entry.weight.is_finite() || entry.weight < 0.0 || entry.weight > 100.0 {
            return Err(WeightValidationError::OutOfRange {
                name: name.to_string(),
                weight: entry.weight,
            });
        }

        let h = to_hundredths(entry.weight);
        if h > 0 {
            any_positive = true;
        }
        sum_hundredths += h;
    }

    if sum_hundredths != TARGET_SUM_HUNDREDTHS {
        return Err(WeightValidationError::SumMismatch {
            actual_sum: sum_hundredths as f64 / 100.0,
        });
    }
    if !any_positive {
        return Err(WeightValidationError::AllZero);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(name: &str, weight: f64) -> MilestoneWeight {
        MilestoneWeight::new(name, weight)
    }

    #[test]
    fn test_valid_set() {
        let weights = vec![w("Fitup", 10.0), w("Weld", 60.0), w("Test", 30.0)];
        assert!(validate(&weights).is_ok());
    }

    #[test]
    fn test_sum_mismatch_reports_actual() {
        let weights = vec![w("Fitup", 10.0), w("Weld", 60.0), w("Test", 25.0)];
        match validate(&weights) {
            Err(WeightValidationError::SumMismatch { actual_sum }) => {
                assert_eq!(actual_sum, 95.0)
            }
            other => panic!("expected SumMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_fixed_decimal_comparison_accepts_thirds() {
        // 33.34 + 33.33 + 33.33 == 100.00 in hundredths, even though the
        // f64 sum is 99.99999999999999
        let weights = vec![w("Receive", 33.34), w("Erect", 33.33), w("Punch", 33.33)];
        assert!(validate(&weights).is_ok());
    }

    #[test]
    fn test_zero_weight_milestone_allowed() {
        let weights = vec![w("Fitup", 0.0), w("Weld", 70.0), w("Test", 30.0)];
        assert!(validate(&weights).is_ok());
    }

    #[test]
    fn test_all_zero_rejected() {
        let weights = vec![w("A", 0.0), w("B", 0.0)];
        // sum is 0, so the mismatch fires first with the actual sum
        match validate(&weights) {
            Err(WeightValidationError::SumMismatch { actual_sum }) => {
                assert_eq!(actual_sum, 0.0)
            }
            other => panic!("expected SumMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            validate(&[w("A", -5.0), w("B", 105.0)]),
            Err(WeightValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate(&[w("A", 101.0)]),
            Err(WeightValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate(&[w("A", f64::NAN)]),
            Err(WeightValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_empty_and_duplicates() {
        assert_eq!(validate(&[]), Err(WeightValidationError::Empty));
        assert!(matches!(
            validate(&[w("Weld", 50.0), w("weld", 50.0)]),
            Err(WeightValidationError::DuplicateName { .. })
        ));
        assert_eq!(
            validate(&[w("  ", 100.0)]),
            Err(WeightValidationError::BlankName)
        );
    }

    #[test]
    fn test_single_milestone_at_100() {
        assert!(validate(&[w("Install", 100.0)]).is_ok());
    }
}
