//! Employee time-tracking tests

use chrono::{Duration, NaiveTime};
use proptest::prelude::*;
use shared::daily_hours;

fn time(h: u32, m: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_standard_day() {
        let hours = daily_hours(time(8, 0), time(12, 0), time(13, 0), time(17, 0));
        assert_eq!(hours, Duration::hours(8));
    }

    #[test]
    fn test_half_day() {
        assert_eq!(
            daily_hours(time(8, 30), time(12, 30), None, None),
            Duration::hours(4)
        );
        assert_eq!(
            daily_hours(None, None, time(14, 0), time(18, 0)),
            Duration::hours(4)
        );
    }

    /// Clock-in at morning, clock-out in the evening with no break entries
    /// counts as one continuous span.
    #[test]
    fn test_continuous_day() {
        let hours = daily_hours(time(7, 30), None, None, time(16, 0));
        assert_eq!(hours, Duration::minutes(8 * 60 + 30));
    }

    #[test]
    fn test_reversed_span_counts_nothing() {
        assert_eq!(
            daily_hours(time(12, 0), time(8, 0), None, None),
            Duration::zero()
        );
        // A reversed continuous day also counts nothing
        assert_eq!(
            daily_hours(time(17, 0), None, None, time(8, 0)),
            Duration::zero()
        );
    }

    #[test]
    fn test_absent_day() {
        assert_eq!(daily_hours(None, None, None, None), Duration::zero());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn minutes_strategy() -> impl Strategy<Value = u32> {
        0u32..(24 * 60)
    }

    fn to_time(minutes: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Worked hours never go negative and never exceed the two
        /// same-day spans that produce them.
        #[test]
        fn prop_hours_bounded(
            ms in minutes_strategy(),
            me in minutes_strategy(),
            as_ in minutes_strategy(),
            ae in minutes_strategy()
        ) {
            let hours = daily_hours(to_time(ms), to_time(me), to_time(as_), to_time(ae));
            prop_assert!(hours >= Duration::zero());
            prop_assert!(hours <= Duration::hours(48));
        }

        /// With two well-formed spans the total is exactly their sum.
        #[test]
        fn prop_two_spans_sum(
            (ms, me) in (0u32..600, 600u32..720),
            (as_, ae) in (720u32..1000, 1000u32..1440)
        ) {
            let hours = daily_hours(to_time(ms), to_time(me), to_time(as_), to_time(ae));
            let expected = Duration::minutes(i64::from(me - ms) + i64::from(ae - as_));
            prop_assert_eq!(hours, expected);
        }
    }
}
