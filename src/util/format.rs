//! Display glue shared by the TUI panels and CLI listings.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Placeholder for a missing value
pub const MISSING: &str = "\u{2014}";

/// The value, or `—` when absent or empty.
pub fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => MISSING,
    }
}

/// Meeting times as `YYYY-MM-DD HH:MM`. Accepts RFC 3339 and the
/// `datetime-local` form (`2025-03-01T09:30`); anything else is shown as is.
pub fn format_scheduled_at(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return MISSING.to_string();
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
    }
    raw.to_string()
}

/// Dates as `YYYY-MM-DD`, dropping any time part the server appended.
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return MISSING.to_string();
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Pretty-printed JSON, or `—` for null/absent.
pub fn format_json(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(v) => serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()),
    }
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dash_for_missing() {
        assert_eq!(or_dash(None), "\u{2014}");
        assert_eq!(or_dash(Some("")), "\u{2014}");
        assert_eq!(or_dash(Some("Dana")), "Dana");
    }

    #[test]
    fn scheduled_at_variants() {
        assert_eq!(
            format_scheduled_at(Some("2025-03-01T09:30")),
            "2025-03-01 09:30"
        );
        assert_eq!(
            format_scheduled_at(Some("2025-03-01T09:30:00Z")),
            "2025-03-01 09:30"
        );
        assert_eq!(format_scheduled_at(Some("next tuesday")), "next tuesday");
        assert_eq!(format_scheduled_at(None), "\u{2014}");
    }

    #[test]
    fn dates_drop_time() {
        assert_eq!(format_date(Some("2025-06-30")), "2025-06-30");
        assert_eq!(format_date(Some("2025-06-30T00:00:00+00:00")), "2025-06-30");
        assert_eq!(format_date(Some("Q3")), "Q3");
    }

    #[test]
    fn json_is_pretty() {
        assert_eq!(format_json(Some(&Value::Null)), "\u{2014}");
        assert_eq!(
            format_json(Some(&json!({"cost": 5}))),
            "{\n  \"cost\": 5\n}"
        );
    }
}
