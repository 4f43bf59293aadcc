//! Calendar helpers. Instants are stored in UTC; day boundaries and
//! calendar arithmetic follow the local time zone.

use chrono::{DateTime, Days, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

fn to_utc(naive: NaiveDateTime, fallback: DateTime<Utc>) -> DateTime<Utc> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or(fallback)
}

/// Move `base` by whole calendar days, keeping the local wall-clock time.
pub fn add_days(base: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    let local = base.with_timezone(&Local).naive_local();
    let shifted = if days >= 0 {
        local.checked_add_days(Days::new(days as u64))
    } else {
        local.checked_sub_days(Days::new(days.unsigned_abs()))
    };

    match shifted {
        Some(naive) => to_utc(naive, base + chrono::Duration::days(days)),
        None => base,
    }
}

/// Move `base` by calendar months. Days past the end of the target month
/// are clamped to its last day.
pub fn add_months(base: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    let local = base.with_timezone(&Local).naive_local();
    match local.checked_add_months(Months::new(months)) {
        Some(naive) => to_utc(naive, base + chrono::Duration::days(30 * months as i64)),
        None => base,
    }
}

/// Local calendar day of an instant.
pub fn local_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

pub fn same_local_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    local_day(a) == local_day(b)
}

/// Last millisecond of the given local day.
pub fn end_of_local_day(day: NaiveDate) -> DateTime<Utc> {
    let end = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    let naive = day.and_time(end);
    to_utc(naive, naive.and_utc())
}

/// Local midnight at the start of the given day.
pub fn start_of_local_day(day: NaiveDate) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN);
    to_utc(naive, naive.and_utc())
}

/// Whole days elapsed from `from` to `to`, rounded down (negative when `to` is earlier).
pub fn floor_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().div_euclid(MS_PER_DAY)
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` (local midnight).
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    parse_date(s).map(start_of_local_day)
}

pub fn format_local(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_day(ts: DateTime<Utc>) -> String {
    local_day(ts).format("%Y-%m-%d").to_string()
}
