//! Period window calculation.
//!
//! Maps a budget limit's period granularity onto the inclusive start date of
//! the window containing a given day. Pure; the only inputs are the period
//! kind and the reference date.

use crate::entities::Period;
use chrono::{Datelike, Days, NaiveDate};

/// Returns the inclusive start date of the period window containing `today`.
///
/// - `Day` → `today` unchanged
/// - `Week` → the Monday of the week containing `today`
/// - `Month` → the first calendar day of `today`'s month
#[must_use]
pub fn period_start(period: Period, today: NaiveDate) -> NaiveDate {
    match period {
        Period::Day => today,
        Period::Week => {
            let offset = u64::from(today.weekday().num_days_from_monday());
            today - Days::new(offset)
        }
        // Day 1 exists in every month, so the fallback is unreachable.
        Period::Month => today.with_day(1).unwrap_or(today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_period_is_identity() {
        let d = date(2026, 8, 6);
        assert_eq!(period_start(Period::Day, d), d);
    }

    #[test]
    fn test_week_period_returns_monday_of_week() {
        // 2026-08-06 is a Thursday
        let thursday = date(2026, 8, 6);
        assert_eq!(period_start(Period::Week, thursday), date(2026, 8, 3));
    }

    #[test]
    fn test_week_period_monday_maps_to_itself() {
        let monday = date(2026, 8, 3);
        assert_eq!(period_start(Period::Week, monday), monday);
    }

    #[test]
    fn test_week_period_crosses_month_boundary() {
        // 2026-03-01 is a Sunday; its week started the previous February
        let sunday = date(2026, 3, 1);
        assert_eq!(period_start(Period::Week, sunday), date(2026, 2, 23));
    }

    #[test]
    fn test_month_period_returns_first_of_month() {
        assert_eq!(period_start(Period::Month, date(2026, 8, 6)), date(2026, 8, 1));
        assert_eq!(period_start(Period::Month, date(2026, 2, 28)), date(2026, 2, 1));
    }

    #[test]
    fn test_week_start_properties_over_a_full_year() {
        let mut d = date(2026, 1, 1);
        let end = date(2027, 1, 1);
        while d < end {
            let start = period_start(Period::Week, d);
            assert_eq!(start.weekday(), Weekday::Mon);
            assert!(start <= d);
            assert!(d - start < chrono::Duration::days(7));

            let month_start = period_start(Period::Month, d);
            assert_eq!(month_start.day(), 1);
            assert!(month_start <= d);

            d = d + Days::new(1);
        }
    }
}
