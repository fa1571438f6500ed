//! Business time zone helpers
//!
//! Timestamps are stored in UTC; calendar days and hours of day are always
//! computed in the restaurant's business time zone.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

/// Current UTC time
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Calendar date of `at` in the business time zone
pub fn local_date(at: DateTime<Utc>, tz: Tz) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

/// Hour of day (0-23) of `at` in the business time zone
pub fn local_hour(at: DateTime<Utc>, tz: Tz) -> u32 {
    at.with_timezone(&tz).hour()
}

/// Local midnight of the day containing `at`, as UTC
///
/// DST gap fallback: if local midnight does not exist, use UTC midnight.
pub fn start_of_local_day(at: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let naive = local_date(at, tz).and_time(NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// Parse `HH:MM` into minutes since midnight
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let (h, m) = value.split_once(':')?;
    let h: u32 = h.trim().parse().ok()?;
    let m: u32 = m.trim().parse().ok()?;
    (h < 24 && m < 60).then_some(h * 60 + m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_date_and_hour_follow_zone() {
        // 2025-03-10 02:30 UTC is still 2025-03-09 in New York
        let at = Utc.with_ymd_and_hms(2025, 3, 10, 2, 30, 0).unwrap();
        let tz: Tz = "America/New_York".parse().unwrap();
        assert_eq!(local_date(at, tz), NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
        assert_eq!(local_hour(at, tz), 22);
        assert_eq!(local_hour(at, Tz::UTC), 2);
    }

    #[test]
    fn test_start_of_local_day() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 15, 45, 0).unwrap();
        assert_eq!(
            start_of_local_day(at, Tz::UTC),
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
        );

        let tz: Tz = "Europe/Madrid".parse().unwrap();
        // Madrid is UTC+2 in June
        assert_eq!(
            start_of_local_day(at, tz),
            Utc.with_ymd_and_hms(2025, 5, 31, 22, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("09:00"), Some(540));
        assert_eq!(parse_hhmm("23:59"), Some(1439));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("noon"), None);
    }
}
