use chrono::{DateTime, SecondsFormat, Utc};
use std::time::SystemTime;

/// Format a modification time as UTC RFC3339 with whole seconds, e.g. `2024-01-01T00:00:00Z`
pub fn format_mod_time(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an RFC3339 modification time, normalising any offset to UTC
pub fn parse_mod_time(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value.trim()).map(|t| t.with_timezone(&Utc))
}
