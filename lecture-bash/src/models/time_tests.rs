#[cfg(test)]
mod tests {
    use crate::error::BashError;
    use crate::models::time::{
        parse_academic_weeks, parse_clock_time, parse_free_time_ranges, FreeInterval,
    };
    use proptest::prelude::*;

    fn interval(start: f64, end: f64) -> FreeInterval {
        FreeInterval::new(start, end).unwrap()
    }

    #[test]
    fn test_clock_time_half_hour() {
        assert_eq!(parse_clock_time("13:30").unwrap(), 13.5);
    }

    #[test]
    fn test_clock_time_with_seconds() {
        assert_eq!(parse_clock_time("10:15:00").unwrap(), 10.25);
    }

    #[test]
    fn test_clock_time_tolerates_spaces() {
        assert_eq!(parse_clock_time(" 9:00 ").unwrap(), 9.0);
    }

    #[test]
    fn test_clock_time_without_separator_fails() {
        let err = parse_clock_time("1330").unwrap_err();
        assert!(matches!(err, BashError::Parse { .. }));
    }

    #[test]
    fn test_clock_time_non_numeric_fails() {
        assert!(parse_clock_time("ab:cd").is_err());
        assert!(parse_clock_time("10:").is_err());
    }

    #[test]
    fn test_weeks_range_and_single() {
        assert_eq!(parse_academic_weeks("3-5,8").unwrap(), vec![3, 4, 5, 8]);
    }

    #[test]
    fn test_weeks_single() {
        assert_eq!(parse_academic_weeks("12").unwrap(), vec![12]);
    }

    #[test]
    fn test_weeks_with_spaces() {
        assert_eq!(parse_academic_weeks("1 - 2, 16").unwrap(), vec![1, 2, 16]);
    }

    #[test]
    fn test_weeks_garbage_fails() {
        assert!(parse_academic_weeks("x").is_err());
        assert!(parse_academic_weeks("").is_err());
        assert!(parse_academic_weeks("2-").is_err());
    }

    #[test]
    fn test_free_time_empty() {
        assert!(parse_free_time_ranges("").unwrap().is_empty());
    }

    #[test]
    fn test_free_time_without_digits_is_empty() {
        assert!(parse_free_time_ranges("-").unwrap().is_empty());
        assert!(parse_free_time_ranges("busy").unwrap().is_empty());
    }

    #[test]
    fn test_free_time_two_ranges() {
        assert_eq!(
            parse_free_time_ranges("9:00-11:00,14:00-15:30").unwrap(),
            vec![interval(9.0, 11.0), interval(14.0, 15.5)]
        );
    }

    #[test]
    fn test_free_time_missing_dash_fails() {
        assert!(parse_free_time_ranges("9:00").is_err());
    }

    #[test]
    fn test_free_time_reversed_range_fails() {
        assert!(parse_free_time_ranges("12:00-10:00").is_err());
    }

    #[test]
    fn test_interval_covers_start_instant() {
        let free = interval(9.5, 11.0);
        assert!(free.covers(10.0, 0.0));
        assert!(free.covers(9.5, 0.0));
        assert!(free.covers(11.0, 0.0));
        assert!(!free.covers(11.25, 0.0));
        assert!(!free.covers(10.5, 1.0));
    }

    #[test]
    fn test_oversized_week_range_is_rejected() {
        let err = parse_academic_weeks("1-4000000000").unwrap_err();
        assert!(matches!(err, BashError::Parse { .. }));
        assert_eq!(parse_academic_weeks("1-61").unwrap().len(), 61);
        assert!(parse_academic_weeks("1-62").is_err());
    }

    proptest! {
        #[test]
        fn prop_week_range_expands_inclusively(first in 1u32..30, len in 0u32..20) {
            let last = first + len;
            let weeks = parse_academic_weeks(&format!("{}-{}", first, last)).unwrap();
            prop_assert_eq!(weeks.len() as u32, len + 1);
            prop_assert_eq!(weeks.first().copied(), Some(first));
            prop_assert_eq!(weeks.last().copied(), Some(last));
        }

        #[test]
        fn prop_clock_time_round_trips_minutes(h in 0u32..24, m in 0u32..60) {
            let parsed = parse_clock_time(&format!("{:02}:{:02}", h, m)).unwrap();
            prop_assert!((parsed - (h as f64 + m as f64 / 60.0)).abs() < 1e-9);
        }
    }
}
