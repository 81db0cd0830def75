use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// Midnight UTC of the calendar day containing `instant`.
pub fn start_of_utc_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Half-open `[start, start + 24h)` window of the UTC day containing `instant`.
pub fn utc_day_bounds(instant: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start_of_utc_day(instant);
    (start, start + Duration::hours(24))
}

/// Current UTC calendar date.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
