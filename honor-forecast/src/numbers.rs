//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

use crate::constants::SOLVER_ROUNDING_STEPS;

/// Floor a f64 and clamp it to the u32 range, returning 0 for non-finite values.
#[must_use]
pub fn floor_f64_to_u32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(0.0, max).floor();
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Convert a signed day delta to a day count, treating negative spans as empty.
#[must_use]
pub fn day_span_to_u32(days: i64) -> u32 {
    cast::<i64, u32>(days.max(0)).unwrap_or(u32::MAX)
}

/// Round a rate up to the solver's reporting precision (one decimal place).
#[must_use]
pub fn ceil_to_tenth(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    (value * SOLVER_ROUNDING_STEPS).ceil() / SOLVER_ROUNDING_STEPS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_handles_non_finite_and_negative() {
        assert_eq!(floor_f64_to_u32(f64::NAN), 0);
        assert_eq!(floor_f64_to_u32(f64::INFINITY), 0);
        assert_eq!(floor_f64_to_u32(-3.5), 0);
        assert_eq!(floor_f64_to_u32(16.67), 16);
        assert_eq!(floor_f64_to_u32(f64::from(u32::MAX) * 2.0), u32::MAX);
    }

    #[test]
    fn day_span_clamps_negative() {
        assert_eq!(day_span_to_u32(-4), 0);
        assert_eq!(day_span_to_u32(29), 29);
    }

    #[test]
    fn ceil_to_tenth_never_rounds_down() {
        assert!((ceil_to_tenth(12.01) - 12.1).abs() < 1e-9);
        assert!((ceil_to_tenth(12.0) - 12.0).abs() < 1e-9);
        assert!((ceil_to_tenth(0.0)).abs() < 1e-9);
    }
}
