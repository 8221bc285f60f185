//! Marks turn-in: converts surplus marks above the reserve into turn-in sets.
use crate::numbers::floor_f64_to_u32;

/// Number of whole turn-in sets available from `marks_before_turn_in`.
///
/// Returns 0 when turn-ins are disabled or marks sit at or below the reserve.
/// `bundle_size` is the marks consumed per set (1 for per-lane tracking).
#[must_use]
pub fn compute_turn_in_sets(
    marks_before_turn_in: f64,
    marks_reserve: f64,
    bundle_size: f64,
    enable_turn_ins: bool,
) -> u32 {
    if !enable_turn_ins || bundle_size <= 0.0 {
        return 0;
    }
    let excess = (marks_before_turn_in - marks_reserve).max(0.0);
    floor_f64_to_u32(excess / bundle_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_sets_at_or_below_reserve() {
        assert_eq!(compute_turn_in_sets(150.0, 150.0, 3.0, true), 0);
        assert_eq!(compute_turn_in_sets(100.0, 150.0, 3.0, true), 0);
    }

    #[test]
    fn pooled_bundles_floor_partial_sets() {
        assert_eq!(compute_turn_in_sets(153.0, 150.0, 3.0, true), 1);
        assert_eq!(compute_turn_in_sets(160.0, 150.0, 3.0, true), 3);
        assert_eq!(compute_turn_in_sets(200.0, 150.0, 3.0, true), 16);
        assert_eq!(compute_turn_in_sets(204.0, 200.0, 4.0, true), 1);
        assert_eq!(compute_turn_in_sets(220.0, 200.0, 4.0, true), 5);
    }

    #[test]
    fn per_lane_units_count_whole_marks() {
        assert_eq!(compute_turn_in_sets(56.67, 50.0, 1.0, true), 6);
        assert_eq!(compute_turn_in_sets(12.0, 0.0, 1.0, true), 12);
    }

    #[test]
    fn exact_multiples_return_exact_counts() {
        for k in 0..20_u32 {
            let marks = 150.0 + f64::from(k) * 3.0;
            assert_eq!(compute_turn_in_sets(marks, 150.0, 3.0, true), k);
        }
    }

    #[test]
    fn disabled_turn_ins_never_convert() {
        assert_eq!(compute_turn_in_sets(200.0, 150.0, 3.0, false), 0);
        assert_eq!(compute_turn_in_sets(1.0e6, 0.0, 1.0, false), 0);
    }
}
