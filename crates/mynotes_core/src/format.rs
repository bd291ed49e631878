//! Display helpers for note listings.
//!
//! # Responsibility
//! - Render `updated_at` as a short relative label for the dashboard.
//! - Derive a plain-text preview from serialized markup content.

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;

const MINUTE_MS: i64 = 60_000;
const PREVIEW_MAX_CHARS: usize = 100;

static MARKUP_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid markup tag regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Formats `timestamp_ms` relative to `now_ms`.
///
/// Rules (floors, singular when the count is 1):
/// - under a minute, or in the future: `Just now`
/// - under an hour: `N minute(s) ago`
/// - under a day: `N hour(s) ago`
/// - under a week: `N day(s) ago`
/// - otherwise the UTC calendar date as `M/D/YYYY`
pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let minutes = now_ms.saturating_sub(timestamp_ms).div_euclid(MINUTE_MS);
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return ago(minutes, "minute");
    }
    if hours < 24 {
        return ago(hours, "hour");
    }
    if days < 7 {
        return ago(days, "day");
    }

    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(date) => date.format("%-m/%-d/%Y").to_string(),
        None => "Unknown date".to_string(),
    }
}

fn ago(count: i64, unit: &str) -> String {
    let plural = if count > 1 { "s" } else { "" };
    format!("{count} {unit}{plural} ago")
}

/// Strips markup tags, decodes the common entities and collapses
/// whitespace; keeps the first 100 chars. `None` when nothing readable is left.
pub fn content_preview(content: &str) -> Option<String> {
    let without_tags = MARKUP_TAG_RE.replace_all(content, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    let normalized = WHITESPACE_RE.replace_all(&decoded, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{content_preview, format_relative_time};

    const NOW: i64 = 1_700_000_000_000;
    const MINUTE: i64 = 60_000;

    #[test]
    fn under_a_minute_and_future_read_just_now() {
        assert_eq!(format_relative_time(NOW - 59_999, NOW), "Just now");
        assert_eq!(format_relative_time(NOW + 5 * MINUTE, NOW), "Just now");
    }

    #[test]
    fn singular_and_plural_units() {
        assert_eq!(format_relative_time(NOW - MINUTE, NOW), "1 minute ago");
        assert_eq!(format_relative_time(NOW - 59 * MINUTE, NOW), "59 minutes ago");
        assert_eq!(format_relative_time(NOW - 60 * MINUTE, NOW), "1 hour ago");
        assert_eq!(format_relative_time(NOW - 23 * 60 * MINUTE, NOW), "23 hours ago");
        assert_eq!(format_relative_time(NOW - 24 * 60 * MINUTE, NOW), "1 day ago");
        assert_eq!(format_relative_time(NOW - 6 * 24 * 60 * MINUTE, NOW), "6 days ago");
    }

    #[test]
    fn a_week_or_older_falls_back_to_calendar_date() {
        // 2023-11-14T22:13:20Z
        let week_ago = NOW - 7 * 24 * 60 * MINUTE;
        assert_eq!(format_relative_time(week_ago, NOW), "11/7/2023");
    }

    #[test]
    fn preview_strips_tags_and_entities() {
        let preview = content_preview("<p>milk &amp; <strong>eggs</strong></p><p>bread</p>");
        assert_eq!(preview.as_deref(), Some("milk & eggs bread"));
    }

    #[test]
    fn preview_of_empty_paragraph_is_none() {
        assert_eq!(content_preview("<p></p>"), None);
        assert_eq!(content_preview("  "), None);
    }

    #[test]
    fn preview_is_capped() {
        let long = format!("<p>{}</p>", "a".repeat(300));
        assert_eq!(content_preview(&long).unwrap().chars().count(), 100);
    }
}
