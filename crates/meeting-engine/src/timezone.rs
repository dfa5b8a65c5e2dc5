//! Timezone-aware labels for meeting times.
//!
//! Every formatting function here is total: an unknown or missing zone name
//! renders in the process-local zone instead of failing the caller.

use chrono::{DateTime, Local, NaiveDateTime, Offset, Utc};
use chrono_tz::Tz;

use crate::error::{EngineError, Result};
use crate::locale::Locale;

/// Zones offered by the meeting timezone picker, most common first.
pub const COMMON_TIMEZONES: &[&str] = &[
    "Europe/Kyiv",
    "Europe/Warsaw",
    "Europe/Berlin",
    "Europe/London",
    "Europe/Lisbon",
    "America/New_York",
    "America/Chicago",
    "America/Los_Angeles",
    "Asia/Dubai",
    "Asia/Tokyo",
    "UTC",
];

/// Look up an IANA zone name. Blank and unknown names give `None`.
pub fn parse_timezone(name: &str) -> Option<Tz> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Like [`parse_timezone`], but reports unknown names as an error.
pub fn require_timezone(name: &str) -> Result<Tz> {
    parse_timezone(name).ok_or_else(|| EngineError::InvalidTimezone(name.to_string()))
}

/// Convert an instant into the named zone, if the name is valid.
pub fn to_timezone(ts: DateTime<Utc>, name: &str) -> Option<DateTime<Tz>> {
    parse_timezone(name).map(|tz| ts.with_timezone(&tz))
}

/// Render date and time in `timezone`, e.g. `17.10.2026, 14:30`.
pub fn format_in_timezone(ts: DateTime<Utc>, timezone: Option<&str>, locale: Locale) -> String {
    render(ts, timezone, locale.date_time_pattern())
}

/// Render only the wall-clock time in `timezone`, e.g. `14:30`.
pub fn format_time_in_timezone(
    ts: DateTime<Utc>,
    timezone: Option<&str>,
    locale: Locale,
) -> String {
    render(ts, timezone, locale.time_pattern())
}

/// Render only the calendar date in `timezone`, e.g. `17.10.2026`.
pub fn format_date_in_timezone(
    ts: DateTime<Utc>,
    timezone: Option<&str>,
    locale: Locale,
) -> String {
    render(ts, timezone, locale.date_pattern())
}

/// UTC offset of `timezone` at `ts`, e.g. `UTC+03:00`.
pub fn utc_offset_label(ts: DateTime<Utc>, timezone: Option<&str>) -> String {
    let seconds = match timezone.and_then(parse_timezone) {
        Some(tz) => ts.with_timezone(&tz).offset().fix().local_minus_utc(),
        None => ts.with_timezone(&Local).offset().fix().local_minus_utc(),
    };

    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.abs();
    format!("UTC{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
}

fn render(ts: DateTime<Utc>, timezone: Option<&str>, pattern: &str) -> String {
    match timezone.and_then(parse_timezone) {
        Some(tz) => ts.with_timezone(&tz).format(pattern).to_string(),
        None => {
            if let Some(name) = timezone {
                log::debug!("unknown timezone '{name}', rendering in local time");
            }
            ts.with_timezone(&Local).format(pattern).to_string()
        }
    }
}

/// Parse an ISO 8601 timestamp into UTC.
///
/// Accepts RFC 3339 with an offset (`2026-02-17T14:00:00+02:00`) and naive
/// `YYYY-MM-DDTHH:MM:SS`, which is read as UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| EngineError::InvalidTimestamp {
            value: s.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_not_zones() {
        assert!(parse_timezone("").is_none());
        assert!(parse_timezone("   ").is_none());
        assert!(parse_timezone(" Europe/Kyiv ").is_some());
    }

    #[test]
    fn picker_zones_all_parse() {
        for name in COMMON_TIMEZONES {
            assert!(parse_timezone(name).is_some(), "{name} should parse");
        }
    }
}
