//! Calendar-day handling.
//!
//! Attendance is deduplicated per UTC calendar day and batches are scheduled on
//! whole days, so the API works with `NaiveDate` values interpreted in UTC.
//! Clients may send either a bare `YYYY-MM-DD` or a full RFC 3339 timestamp; the
//! latter is truncated to the day it falls on in UTC.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer};

/// Canonical textual form of a day, used both on the wire and in storage.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp into a UTC calendar day.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, DAY_FORMAT) {
        return Some(day);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc).date_naive())
}

pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Short chart label for a day, e.g. `May 1`.
pub fn day_label(day: NaiveDate) -> String {
    day.format("%b %-d").to_string()
}

/// The UTC day window `[start, start + 24h)` containing `now`.
pub fn utc_day_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::hours(24))
}

/// Deserializes a list of days, accepting any form understood by [`parse_day`].
pub fn deserialize_days<'de, D>(deserializer: D) -> Result<Vec<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    raw.iter()
        .map(|s| {
            parse_day(s).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", s)))
        })
        .collect()
}

/// Optional variant of [`deserialize_days`] for partial updates.
pub fn deserialize_optional_days<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<String>>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(values) => values
            .iter()
            .map(|s| {
                parse_day(s)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", s)))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_plain_days_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(parse_day("2024-05-01"), Some(expected));
        assert_eq!(parse_day("2024-05-01T00:00:00.000Z"), Some(expected));
        // 23:30 at UTC-02:00 is already the next day in UTC.
        assert_eq!(
            parse_day("2024-04-30T23:30:00-02:00"),
            Some(expected)
        );
        assert_eq!(parse_day("May 1st"), None);
    }

    #[test]
    fn window_starts_at_utc_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 17, 45, 12).unwrap();
        let (start, end) = utc_day_window(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn labels_use_short_month_names() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(day_label(day), "May 1");
        assert_eq!(format_day(day), "2024-05-01");
    }
}
