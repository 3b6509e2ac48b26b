//! Small numeric helpers shared by the scoring modules.

/// Computes `part / total` as a percentage. Returns 0.0 when `total` is
/// zero or negative, so sparse periods never divide by zero.
pub fn pct(part: f64, total: f64) -> f64 {
    if total <= 0.0 {
        0.0
    } else {
        (part / total) * 100.0
    }
}

/// Rounds to one decimal place, matching the precision the source data
/// carries for shift and daily averages.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(pct(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(pct(50.0, 100.0), 50.0);
        assert_eq!(pct(1.0, 4.0), 25.0);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(283.333333), 283.3);
        assert_eq!(round1(283.35), 283.4);
        assert_eq!(round1(283.0), 283.0);
    }
}
