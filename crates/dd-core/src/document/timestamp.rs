use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a backend timestamp into epoch milliseconds.
///
/// Accepts RFC 3339, naive date-times (treated as UTC) and plain dates.
/// Returns `None` instead of failing so callers can fall back to a default.
pub fn parse_timestamp_millis(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339() {
        assert_eq!(parse_timestamp_millis("1970-01-01T00:00:01Z"), Some(1000));
        assert_eq!(parse_timestamp_millis("1970-01-01T01:00:00+01:00"), Some(0));
    }

    #[test]
    fn parses_naive_datetime_as_utc() {
        assert_eq!(parse_timestamp_millis("1970-01-01T00:00:02.500"), Some(2500));
        assert_eq!(parse_timestamp_millis("1970-01-01 00:00:03"), Some(3000));
    }

    #[test]
    fn parses_plain_date() {
        let jan = parse_timestamp_millis("2024-01-01").unwrap();
        let feb = parse_timestamp_millis("2024-02-01").unwrap();
        assert!(jan < feb);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp_millis(""), None);
        assert_eq!(parse_timestamp_millis("yesterday"), None);
        assert_eq!(parse_timestamp_millis("2024-13-45"), None);
    }
}
