/// True when any day's minimum drops at least `threshold` below the
/// previous day's minimum.
pub fn has_cold_front(daily_mins: &[f64], threshold: f64) -> bool {
    daily_mins
        .windows(2)
        .any(|pair| pair[0] - pair[1] >= threshold)
}

pub fn largest_drop(daily_mins: &[f64]) -> Option<f64> {
    daily_mins
        .windows(2)
        .map(|pair| pair[0] - pair[1])
        .reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_series_never_has_a_front() {
        assert!(!has_cold_front(&[], 10.0));
        assert!(!has_cold_front(&[55.0], 10.0));
        assert!(!has_cold_front(&[55.0], -100.0));
    }

    #[test]
    fn drop_equal_to_threshold_counts() {
        assert!(has_cold_front(&[10.0, 0.0], 10.0));
        assert!(!has_cold_front(&[10.0, 0.5], 10.0));
    }

    #[test]
    fn sharp_drop_between_two_days() {
        assert!(has_cold_front(&[40.0, 28.0], 10.0));
    }

    #[test]
    fn detects_a_drop_anywhere_in_the_window() {
        let mins = [50.0, 52.0, 51.0, 38.0, 40.0];
        assert!(has_cold_front(&mins, 12.0));
        assert!(!has_cold_front(&mins, 14.0));
        assert_eq!(largest_drop(&mins), Some(13.0));
    }

    #[test]
    fn warming_is_not_a_front() {
        assert!(!has_cold_front(&[30.0, 45.0, 60.0], 10.0));
        assert_eq!(largest_drop(&[30.0]), None);
    }
}
