//! UTC week and day bucketing
//!
//! Curator scores are bucketed into weeks starting Monday 00:00 UTC, and
//! the daily vote counter resets at UTC midnight. Both boundaries are
//! computed here; there is no configurable timezone.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};

/// Seconds in one week, for deriving the previous week's bucket.
pub const WEEK_SECS: i64 = 7 * 24 * 60 * 60;

/// Unix timestamp of the most recent Monday 00:00:00 UTC.
pub fn current_week_start() -> i64 {
    week_start(Utc::now())
}

/// Week bucket for an arbitrary instant.
pub fn week_start(now: DateTime<Utc>) -> i64 {
    let days_from_monday = now.weekday().num_days_from_monday() as i64;
    let monday = now.date_naive() - Duration::days(days_from_monday);
    monday.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Unix timestamp of today's 00:00:00 UTC.
pub fn current_day_start() -> i64 {
    day_start(Utc::now())
}

/// Day bucket for an arbitrary instant.
pub fn day_start(now: DateTime<Utc>) -> i64 {
    now.date_naive().and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike, Weekday};

    #[test]
    fn test_week_start_is_monday_midnight() {
        // Sweep a couple of weeks hour by hour
        let base = Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap();
        for hours in 0..(14 * 24) {
            let now = base + Duration::hours(hours);
            let start = Utc
                .timestamp_opt(week_start(now), 0)
                .single()
                .expect("valid timestamp");

            assert_eq!(start.weekday(), Weekday::Mon);
            assert_eq!(start.hour(), 0);
            assert_eq!(start.minute(), 0);
            assert_eq!(start.second(), 0);
            assert!(start <= now);
            assert!(now - start < Duration::days(7));
        }
    }

    #[test]
    fn test_week_start_on_monday_is_same_day() {
        let monday_noon = Utc.with_ymd_and_hms(2025, 3, 3, 12, 30, 0).unwrap();
        let start = week_start(monday_noon);
        assert_eq!(
            start,
            Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap().timestamp()
        );
    }

    #[test]
    fn test_week_start_on_sunday_goes_back_six_days() {
        let sunday = Utc.with_ymd_and_hms(2025, 3, 9, 23, 59, 59).unwrap();
        let start = week_start(sunday);
        assert_eq!(
            start,
            Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap().timestamp()
        );
    }

    #[test]
    fn test_day_start() {
        let now = Utc.with_ymd_and_hms(2025, 3, 5, 17, 45, 12).unwrap();
        assert_eq!(
            day_start(now),
            Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap().timestamp()
        );
    }
}
