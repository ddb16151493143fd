//! Publication date parsing and `<lastmod>` formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Parse a publication date into a UTC instant.
///
/// Accepted forms:
/// - RFC 3339 with any offset (`2024-01-01T08:00:00+08:00`), converted to UTC
/// - naive date-time (`2024-01-01T00:00:00`), taken as UTC
/// - plain date (`2024-01-01`), midnight UTC
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format an instant as `YYYY-MM-DDTHH:MM:SS.sssZ`.
#[inline]
pub fn to_iso8601(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
