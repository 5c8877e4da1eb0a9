//! Status normalization and duration formatting.
//!
//! The server reports statuses either as plain strings or wrapped enum
//! objects (`{ "_value_": "completed" }`); everything downstream works on the
//! single normalized form produced here. Timestamps arrive as strings in
//! either RFC 3339 or a naive `YYYY-MM-DD HH:MM:SS[.frac]` shape.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

use super::payload::RawStatus;

/// Statuses for which the rendered document should show the update banner
const ACTIVE_STATUSES: [&str; 2] = ["running", "initializing"];

/// Normalize a possibly-wrapped status value into a plain string.
///
/// Idempotent: a plain status string passes through unchanged, a wrapped
/// enum object yields its inner value, and an absent status yields "".
pub fn normalize_status(raw: Option<&RawStatus>) -> String {
    match raw {
        Some(RawStatus::Wrapped { value }) => value.clone(),
        Some(RawStatus::Plain(s)) => s.clone(),
        None => String::new(),
    }
}

/// Whether the run is still active and the output should offer an update
pub fn needs_update(status: &str) -> bool {
    ACTIVE_STATUSES.contains(&status)
}

/// Parse a server timestamp, accepting RFC 3339 or naive datetime strings
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Whole seconds between two server timestamps.
///
/// Returns `None` for unparsable or negative spans; that is logged and the
/// duration line is simply omitted from the rendered node.
pub fn duration_between(start: &str, end: &str) -> Option<i64> {
    let (Some(start), Some(end)) = (parse_timestamp(start), parse_timestamp(end)) else {
        debug!(%start, %end, "Unparsable step timestamps, omitting duration");
        return None;
    };

    let seconds = (end - start).num_seconds();
    if end < start {
        debug!(seconds, "Negative step duration, omitting");
        return None;
    }

    Some(seconds)
}

/// Format a whole-second duration for display
pub fn format_duration(seconds: i64) -> String {
    if seconds < 1 {
        "< 1s".to_string()
    } else if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        let minutes = seconds / 60;
        let rest = seconds % 60;
        if rest == 0 {
            format!("{}m", minutes)
        } else {
            format!("{}m {}s", minutes, rest)
        }
    } else {
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        if minutes == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, minutes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_is_identity() {
        let raw = RawStatus::Plain("completed".to_string());
        assert_eq!(normalize_status(Some(&raw)), "completed");
        // Idempotent: normalizing the normalized form changes nothing
        let again = RawStatus::Plain(normalize_status(Some(&raw)));
        assert_eq!(normalize_status(Some(&again)), "completed");
    }

    #[test]
    fn test_normalize_wrapped() {
        let raw = RawStatus::Wrapped {
            value: "completed".to_string(),
        };
        assert_eq!(normalize_status(Some(&raw)), "completed");
    }

    #[test]
    fn test_normalize_absent_is_empty() {
        assert_eq!(normalize_status(None), "");
    }

    #[test]
    fn test_needs_update() {
        assert!(needs_update("running"));
        assert!(needs_update("initializing"));
        assert!(!needs_update("completed"));
        assert!(!needs_update("failed"));
        assert!(!needs_update(""));
    }

    #[test]
    fn test_duration_sub_second() {
        let d = duration_between("2024-03-01 12:00:00.000", "2024-03-01 12:00:00.500").unwrap();
        assert_eq!(format_duration(d), "< 1s");
    }

    #[test]
    fn test_duration_seconds() {
        let d = duration_between("2024-03-01 12:00:00", "2024-03-01 12:00:45").unwrap();
        assert_eq!(format_duration(d), "45s");
    }

    #[test]
    fn test_duration_minutes_and_seconds() {
        let d = duration_between("2024-03-01 12:00:00", "2024-03-01 12:02:05").unwrap();
        assert_eq!(format_duration(d), "2m 5s");
    }

    #[test]
    fn test_duration_exact_hour() {
        let d = duration_between("2024-03-01 12:00:00", "2024-03-01 13:00:00").unwrap();
        assert_eq!(format_duration(d), "1h");
    }

    #[test]
    fn test_duration_hours_and_minutes() {
        let d = duration_between("2024-03-01 12:00:00", "2024-03-01 13:30:00").unwrap();
        assert_eq!(format_duration(d), "1h 30m");
    }

    #[test]
    fn test_duration_exact_minute() {
        let d = duration_between("2024-03-01 12:00:00", "2024-03-01 12:03:00").unwrap();
        assert_eq!(format_duration(d), "3m");
    }

    #[test]
    fn test_duration_rfc3339() {
        let d = duration_between("2024-03-01T12:00:00Z", "2024-03-01T12:00:10Z").unwrap();
        assert_eq!(d, 10);
    }

    #[test]
    fn test_negative_duration_omitted() {
        assert!(duration_between("2024-03-01 12:00:10", "2024-03-01 12:00:00").is_none());
    }

    #[test]
    fn test_unparsable_duration_omitted() {
        assert!(duration_between("not a time", "2024-03-01 12:00:00").is_none());
        assert!(duration_between("2024-03-01 12:00:00", "also not").is_none());
    }
}
