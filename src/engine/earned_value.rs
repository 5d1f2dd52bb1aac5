// ==========================================
// PipeTrak Progress Engine - earned-value helpers
// ==========================================
// Earned value is always computed on demand, never stored. A stored or
// materialized "earned" column would drift from percent_complete; computing
// fresh is what keeps Σ(group earned) == project earned at all times.
// ==========================================

/// Earned value of one component
///
/// earned = budgeted_effort * (percent_complete / 100)
pub fn earned(budgeted_effort: f64, percent_complete: f64) -> f64 {
    budgeted_effort * (percent_complete / 100.0)
}

/// Percent complete of a group, rounded to 2 decimals
///
/// A zero-budget group reports 0 rather than dividing by zero (covers
/// post-baseline-only buckets).
pub fn group_percent(budgeted: f64, earned: f64) -> f64 {
    if budgeted == 0.0 {
        0.0
    } else {
        round2(earned / budgeted * 100.0)
    }
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earned() {
        assert!((earned(10.0, 18.0) - 1.8).abs() < 1e-12);
        assert_eq!(earned(0.0, 100.0), 0.0); // post-baseline: budget 0 -> earned 0
        assert_eq!(earned(250.0, 0.0), 0.0);
    }

    #[test]
    fn test_group_percent() {
        assert_eq!(group_percent(0.0, 0.0), 0.0);
        assert_eq!(group_percent(200.0, 50.0), 25.0);
        assert_eq!(group_percent(3.0, 1.0), 33.33);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.006), 1.01);
        assert_eq!(round2(2.824), 2.82);
    }
}
