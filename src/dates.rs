//! German free-text date parsing.
//!
//! Listing pages print dates either relative to the time of the request
//! ("vor 2 Stunden", "gestern") or as absolute calendar dates
//! ("15. Januar 2024", "09.12.2025", "2025-12-09"). Parsing never fails:
//! text that matches nothing resolves to the reference time and a warning is
//! logged with the input text.

use chrono::{DateTime, Local, NaiveDate, TimeDelta, TimeZone};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::warn;

/// Point in time produced by the parser.
pub type DateValue = DateTime<Local>;

static RELATIVE_HOURS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)vor\s+(\d+)\s+stunden?").unwrap());

static RELATIVE_MINUTES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)vor\s+(\d+)\s+minuten?").unwrap());

static RELATIVE_DAYS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)vor\s+(\d+)\s+tag(?:en)?").unwrap());

static MONTH_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d{1,2})\.\s*(januar|jänner|februar|märz|maerz|april|mai|juni|juli|august|september|oktober|november|dezember)\s+(\d{4})",
    )
    .unwrap()
});

static NUMERIC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\.(\d{1,2})\.(\d{4})").unwrap());

static ISO_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap());

/// Parse `text` relative to the current local time.
pub fn parse(text: &str) -> DateValue {
    parse_at(text, Local::now())
}

/// Parse `text` relative to `now`, falling back to `now` when nothing matches.
pub fn parse_at(text: &str, now: DateValue) -> DateValue {
    match resolve(text, now) {
        Some(date) => date,
        None => {
            warn!(text = %text, "Unrecognised date text, using current time");
            now
        }
    }
}

/// Try every known date form in precedence order.
///
/// The first form whose pattern appears in `text` decides the result, even
/// when its components are unusable (an impossible calendar day, an amount
/// too large to subtract). Relative forms come first, so
/// "vor 3 Stunden · 09.12.2025" resolves through the relative phrase.
pub fn resolve(text: &str, now: DateValue) -> Option<DateValue> {
    let relative_forms: [(&Regex, fn(i64) -> Option<TimeDelta>); 3] = [
        (&*RELATIVE_HOURS_REGEX, TimeDelta::try_hours),
        (&*RELATIVE_MINUTES_REGEX, TimeDelta::try_minutes),
        (&*RELATIVE_DAYS_REGEX, TimeDelta::try_days),
    ];
    for (regex, unit) in relative_forms {
        if let Some(caps) = regex.captures(text) {
            return relative(&caps, now, unit);
        }
    }

    let lower = text.to_lowercase();
    if lower.contains("gestern") {
        return now.checked_sub_signed(TimeDelta::days(1));
    }
    if lower.contains("heute") {
        return Some(now);
    }

    if let Some(caps) = MONTH_NAME_REGEX.captures(text) {
        let (year, day) = (number(&caps, 3)?, number(&caps, 1)?);
        return calendar_day(year, german_month(&caps[2])?, day);
    }
    if let Some(caps) = NUMERIC_REGEX.captures(text) {
        return calendar_day(number(&caps, 3)?, number(&caps, 2)?, number(&caps, 1)?);
    }
    if let Some(caps) = ISO_REGEX.captures(text) {
        return calendar_day(number(&caps, 1)?, number(&caps, 2)?, number(&caps, 3)?);
    }

    None
}

fn relative(
    caps: &Captures<'_>,
    now: DateValue,
    unit: fn(i64) -> Option<TimeDelta>,
) -> Option<DateValue> {
    let amount: i64 = number(caps, 1)?;
    now.checked_sub_signed(unit(amount)?)
}

fn number<T: std::str::FromStr>(caps: &Captures<'_>, group: usize) -> Option<T> {
    caps.get(group)?.as_str().parse().ok()
}

/// Midnight local time of the given calendar day. `month` is 1-based.
fn calendar_day(year: i32, month: u32, day: u32) -> Option<DateValue> {
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
    Local.from_local_datetime(&naive).earliest()
}

fn german_month(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "januar" | "jänner" => 1,
        "februar" => 2,
        "märz" | "maerz" => 3,
        "april" => 4,
        "mai" => 5,
        "juni" => 6,
        "juli" => 7,
        "august" => 8,
        "september" => 9,
        "oktober" => 10,
        "november" => 11,
        "dezember" => 12,
        _ => return None,
    };
    Some(month)
}
