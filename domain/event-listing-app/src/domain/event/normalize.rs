use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

use super::ValidationError;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern is valid"));
static REPEATED_HYPHENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("hyphen pattern is valid"));
static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})(?::\d{2})?$").expect("clock time pattern is valid")
});
static MERIDIEM_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2})\s*(am|pm)$").expect("meridiem time pattern is valid")
});

/// Calendar-only formats, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%m/%d/%Y",
];

/// Local date-times without an offset; only the calendar part is kept.
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Lowercases the title and turns every run of characters outside `[a-z0-9]`
/// into a single hyphen, without leading or trailing hyphens.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let hyphenated = NON_SLUG_CHARS.replace_all(&lowered, "-");
    let trimmed = hyphenated.trim_matches('-');
    REPEATED_HYPHENS.replace_all(trimmed, "-").into_owned()
}

pub fn normalize_date(input: &str) -> Result<String, ValidationError> {
    let input = input.trim();
    let date =
        parse_calendar_date(input).ok_or_else(|| ValidationError::InvalidDate(input.to_string()))?;
    Ok(format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month(),
        date.day()
    ))
}

fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
    {
        return Some(date);
    }

    if let Ok(date_time) = DateTime::parse_from_rfc3339(input) {
        return Some(date_time.with_timezone(&Utc).date_naive());
    }

    if let Ok(date_time) = DateTime::parse_from_rfc2822(input) {
        return Some(date_time.with_timezone(&Utc).date_naive());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|date_time| date_time.date())
}

/// Accepts `H:MM`, `HH:MM`, `HH:MM:SS` and `H am`/`H pm` and returns `HH:MM`.
pub fn normalize_time(input: &str) -> Result<String, ValidationError> {
    let input = input.trim();
    let invalid = || ValidationError::InvalidTime(input.to_string());

    if let Some(caps) = CLOCK_TIME.captures(input) {
        let hour: u32 = caps[1].parse().map_err(|_| invalid())?;
        let minute: u32 = caps[2].parse().map_err(|_| invalid())?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }
        return Ok(format!("{:02}:{:02}", hour, minute));
    }

    if let Some(caps) = MERIDIEM_TIME.captures(input) {
        let hour: u32 = caps[1].parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&hour) {
            return Err(invalid());
        }
        let is_pm = caps[2].eq_ignore_ascii_case("pm");
        let hour = match (is_pm, hour) {
            (false, 12) => 0,
            (true, 12) => 12,
            (true, h) => h + 12,
            (false, h) => h,
        };
        return Ok(format!("{:02}:00", hour));
    }

    Err(ValidationError::InvalidTimeFormat(input.to_string()))
}

/// Trims every entry and drops the ones left empty.
pub fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
