//! Penalty calculation

/// Penalty for a resolved violation, rounded to the nearest whole unit.
///
/// The amount is `max_excess × (duration_minutes / 60) × rate_per_hour`. It
/// charges the peak excess for the whole duration, not the excess integrated
/// over time.
pub fn compute_penalty(max_excess: u32, duration_minutes: u64, rate_per_hour: f64) -> u64 {
    let hours = duration_minutes as f64 / 60.0;
    let amount = max_excess as f64 * hours * rate_per_hour;
    if !amount.is_finite() || amount <= 0.0 {
        return 0;
    }
    amount.round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_excess_charged_for_full_duration() {
        assert_eq!(compute_penalty(30, 120, 50.0), 3000);
        assert_eq!(compute_penalty(1, 60, 100.0), 100);
    }

    #[test]
    fn test_rounding_to_nearest() {
        // 7 × (10/60) × 10 = 11.67
        assert_eq!(compute_penalty(7, 10, 10.0), 12);
        // 1 × (1/60) × 20 = 0.33
        assert_eq!(compute_penalty(1, 1, 20.0), 0);
        // 3 × (30/60) × 1 = 1.5
        assert_eq!(compute_penalty(3, 30, 1.0), 2);
    }

    #[test]
    fn test_zero_inputs() {
        assert_eq!(compute_penalty(0, 600, 50.0), 0);
        assert_eq!(compute_penalty(10, 0, 50.0), 0);
        assert_eq!(compute_penalty(10, 60, 0.0), 0);
    }
}
