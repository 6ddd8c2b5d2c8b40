//! Reusable formatting utilities for CLI output

use chrono::{DateTime, NaiveDate, Utc};

/// Format a registry date as `DD.MM.YYYY`.
///
/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps. Returns "N/A" for empty
/// input and the input unchanged when it cannot be parsed.
pub fn format_date(value: Option<&str>) -> String {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return "N/A".to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.format("%d.%m.%Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.format("%d.%m.%Y").to_string();
    }
    value.to_string()
}

/// Time left until `expires`, e.g. `2h 15m`, or "expired".
pub fn format_remaining(expires: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = expires.signed_duration_since(now);
    if remaining.num_seconds() <= 0 {
        return "expired".to_string();
    }

    let days = remaining.num_days();
    let hours = remaining.num_hours() % 24;
    let mins = remaining.num_minutes() % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins.max(1))
    }
}

/// Truncate to `max_chars` characters with a trailing ellipsis.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
