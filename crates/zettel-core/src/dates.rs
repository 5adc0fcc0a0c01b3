use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::{MigrateError, Result};
use crate::note::Note;

static ISO_IN_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap()
});

static US_IN_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2})-(\d{2})-(\d{4})").unwrap()
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m-%d-%Y", "%Y/%m/%d"];

/// Date-resolution settings.
#[derive(Debug, Clone)]
pub struct DateOptions {
    /// `date` values that are known to be garbage and must be skipped,
    /// e.g. an unexpanded `{{date}}` template placeholder.
    pub skip_literals: Vec<String>,
}

impl Default for DateOptions {
    fn default() -> Self {
        Self {
            skip_literals: vec!["{{date}}".to_string()],
        }
    }
}

/// Parse a calendar date from a metadata value.
///
/// Accepts ISO dates with or without a time part, RFC 3339, `MM-DD-YYYY`,
/// `YYYY/MM/DD`, and compact zettel ids (`YYYYMMDD`, `YYYYMMDDHHMM`,
/// `YYYYMMDDHHMMSS`). Returns `None` when nothing matches.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(date) = parse_compact_id(value) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    None
}

/// Extract a `YYYY-MM-DD` (preferred) or `MM-DD-YYYY` date embedded in a title.
pub fn date_from_title(title: &str) -> Option<NaiveDate> {
    for cap in ISO_IN_TITLE_RE.captures_iter(title) {
        if let Some(date) = ymd(&cap[1], &cap[2], &cap[3]) {
            return Some(date);
        }
    }
    for cap in US_IN_TITLE_RE.captures_iter(title) {
        if let Some(date) = ymd(&cap[3], &cap[1], &cap[2]) {
            return Some(date);
        }
    }
    None
}

/// Resolve the calendar date of a note.
///
/// Priority: `date` field (unless it is a skip literal or unparseable), a
/// date embedded in the title, then the `id` field. Fails with
/// `UnresolvableDate` when none of them yields a date.
pub fn resolve_date(note: &Note, options: &DateOptions) -> Result<NaiveDate> {
    if let Some(raw) = note.field("date") {
        if options.skip_literals.iter().any(|s| s == raw.trim()) {
            tracing::debug!("{}: skipping placeholder date {:?}", note.identifier, raw);
        } else if let Some(date) = parse_calendar_date(&raw) {
            return Ok(date);
        } else {
            tracing::debug!("{}: unparseable date {:?}", note.identifier, raw);
        }
    }

    if let Some(date) = date_from_title(&note.title()) {
        return Ok(date);
    }

    if let Some(date) = note.field("id").as_deref().and_then(parse_calendar_date) {
        return Ok(date);
    }

    Err(MigrateError::UnresolvableDate {
        identifier: note.identifier.clone(),
    })
}

/// Compact ids are all digits: `YYYYMMDD` optionally followed by `HHMM[SS]`.
fn parse_compact_id(value: &str) -> Option<NaiveDate> {
    if !matches!(value.len(), 8 | 12 | 14) || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    ymd(&value[..4], &value[4..6], &value[6..8])
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(text: &str) -> Note {
        Note::parse("some-note", text).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // === parse_calendar_date tests ===

    #[test]
    fn parses_supported_formats() {
        assert_eq!(parse_calendar_date("2021-03-05"), Some(date(2021, 3, 5)));
        assert_eq!(parse_calendar_date("2021-03-05 08:30"), Some(date(2021, 3, 5)));
        assert_eq!(parse_calendar_date("2021-03-05T08:30:00"), Some(date(2021, 3, 5)));
        assert_eq!(parse_calendar_date("2021-03-05T08:30:00-05:00"), Some(date(2021, 3, 5)));
        assert_eq!(parse_calendar_date("03-05-2021"), Some(date(2021, 3, 5)));
        assert_eq!(parse_calendar_date("2021/03/05"), Some(date(2021, 3, 5)));
        assert_eq!(parse_calendar_date("202103051230"), Some(date(2021, 3, 5)));
        assert_eq!(parse_calendar_date("20210305"), Some(date(2021, 3, 5)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("{{date}}"), None);
        assert_eq!(parse_calendar_date("2021-13-45"), None);
        assert_eq!(parse_calendar_date("12345"), None);
    }

    // === date_from_title tests ===

    #[test]
    fn finds_dates_inside_titles() {
        assert_eq!(date_from_title("Journal 2020-12-24 evening"), Some(date(2020, 12, 24)));
        assert_eq!(date_from_title("Notes from 12-24-2020"), Some(date(2020, 12, 24)));
        assert_eq!(date_from_title("No date here"), None);
    }

    // === resolve_date tests ===

    #[test]
    fn date_field_wins() {
        let n = note("---\ntitle: 2020-01-01\ndate: 2021-03-05\nid: 20190101\n---\n");
        assert_eq!(resolve_date(&n, &DateOptions::default()).unwrap(), date(2021, 3, 5));
    }

    #[test]
    fn skip_literal_falls_through_to_title() {
        let n = note("---\ntitle: Daily 2020-01-02\ndate: \"{{date}}\"\n---\n");
        assert_eq!(resolve_date(&n, &DateOptions::default()).unwrap(), date(2020, 1, 2));
    }

    #[test]
    fn id_is_last_resort() {
        let n = note("---\ntitle: Thoughts\nid: 201912312359\n---\n");
        assert_eq!(resolve_date(&n, &DateOptions::default()).unwrap(), date(2019, 12, 31));
    }

    #[test]
    fn nothing_resolvable_is_fatal() {
        let n = note("---\ntitle: Thoughts\ntags: [\"#journal\"]\n---\n");
        match resolve_date(&n, &DateOptions::default()) {
            Err(MigrateError::UnresolvableDate { identifier }) => assert_eq!(identifier, "some-note"),
            other => panic!("expected UnresolvableDate, got {other:?}"),
        }
    }
}
