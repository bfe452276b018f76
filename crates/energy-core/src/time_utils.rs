use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Date-time layouts accepted from meter exports, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts; these resolve to midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Years accepted from meter exports. Anything outside is treated as
/// unparseable.
pub const MIN_YEAR: i32 = 1677;
pub const MAX_YEAR: i32 = 2262;

/// Parse a meter-export timestamp cell into a wall-clock instant.
///
/// RFC 3339 values with an offset keep their local time; the offset is
/// dropped, not applied. Returns `None` for empty or unrecognised input and
/// for years outside `MIN_YEAR..=MAX_YEAR`.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    parse_any(s).filter(|ts| (MIN_YEAR..=MAX_YEAR).contains(&ts.year()))
}

fn parse_any(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

// ── Buckets ───────────────────────────────────────────────────────────────────

/// Label of the calendar-day bucket containing `ts`: that day at midnight.
pub fn day_bucket(ts: NaiveDateTime) -> NaiveDateTime {
    ts.date().and_time(chrono::NaiveTime::MIN)
}

/// Label of the Sunday-ending week containing `ts`.
///
/// The label is the Sunday on or after `ts`'s date, at midnight, so a
/// reading taken at any time on a Sunday belongs to that Sunday's week.
/// `None` when that Sunday is past the last representable date.
pub fn week_end_bucket(ts: NaiveDateTime) -> Option<NaiveDateTime> {
    let date = ts.date();
    let days_to_sunday = (7 - date.weekday().num_days_from_sunday()) % 7;
    day_bucket(ts).checked_add_signed(Duration::days(i64::from(days_to_sunday)))
}

/// Every label from `first` to `last` inclusive, `step` apart.
///
/// Empty when `last < first`; stops early if the next label would overflow.
pub fn bucket_range(
    first: NaiveDateTime,
    last: NaiveDateTime,
    step: Duration,
) -> Vec<NaiveDateTime> {
    let mut out = Vec::new();
    let mut cursor = Some(first);
    while let Some(label) = cursor.filter(|c| *c <= last) {
        out.push(label);
        cursor = label.checked_add_signed(step);
    }
    out
}
