//! Gregorian to Jalali (Persian solar calendar) conversion.

use crate::formatters::digits::to_persian_digits;

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DATE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("ISO date prefix pattern is valid")
});

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Cumulative days before each Gregorian month in a common year.
const GREGORIAN_DAYS_BEFORE_MONTH: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Which digit glyphs formatted dates use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DigitStyle {
    /// `۱۴۰۳/۰۱/۰۱`
    #[default]
    Persian,
    /// `1403/01/01`
    Latin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JalaliDate {
    pub year: i64,
    pub month: u32,
    pub day: u32,
}

impl JalaliDate {
    /// Arithmetic conversion on the 33-year leap cycle, which agrees with the
    /// observed calendar for modern dates.
    pub fn from_gregorian(date: NaiveDate) -> Self {
        let gy = i64::from(date.year());
        let gm = date.month() as usize;
        let gd = i64::from(date.day());

        let gy2 = if gm > 2 { gy + 1 } else { gy };
        let mut days = 355_666 + 365 * gy + (gy2 + 3).div_euclid(4) - (gy2 + 99).div_euclid(100)
            + (gy2 + 399).div_euclid(400)
            + gd
            + GREGORIAN_DAYS_BEFORE_MONTH[gm - 1];

        let mut year = -1595 + 33 * days.div_euclid(12_053);
        days = days.rem_euclid(12_053);
        year += 4 * days.div_euclid(1461);
        days = days.rem_euclid(1461);

        if days > 365 {
            year += (days - 1).div_euclid(365);
            days = (days - 1).rem_euclid(365);
        }

        let (month, day) = if days < 186 {
            (1 + days / 31, 1 + days % 31)
        } else {
            (7 + (days - 186) / 30, 1 + (days - 186) % 30)
        };

        Self {
            year,
            month: month as u32,
            day: day as u32,
        }
    }
}

/// `jYYYY/jMM/jDD` with Latin digits.
impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

/// Parse the ISO-8601 shapes the backend emits. Offset-bearing timestamps
/// are shown in local time.
fn parse_iso(input: &str) -> Option<NaiveDateTime> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Some(timestamp.with_timezone(&Local).naive_local());
    }

    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn format_with<'a>(
    input: &'a str,
    style: DigitStyle,
    render: impl Fn(&NaiveDateTime) -> String,
) -> Cow<'a, str> {
    if !ISO_DATE_PREFIX.is_match(input) {
        return Cow::Borrowed(input);
    }

    let Some(moment) = parse_iso(input) else {
        return Cow::Borrowed(input);
    };

    let rendered = render(&moment);
    match style {
        DigitStyle::Latin => Cow::Owned(rendered),
        DigitStyle::Persian => Cow::Owned(to_persian_digits(&rendered).into_owned()),
    }
}

/// ISO date to `jYYYY/jMM/jDD` in Persian digits.
///
/// Anything that is not an ISO date comes back unchanged.
pub fn format_jalali_date(input: &str) -> Cow<'_, str> {
    format_jalali_date_with(input, DigitStyle::Persian)
}

pub fn format_jalali_date_with(input: &str, style: DigitStyle) -> Cow<'_, str> {
    format_with(input, style, |moment| {
        JalaliDate::from_gregorian(moment.date()).to_string()
    })
}

/// ISO timestamp to `jYYYY/jMM/jDD HH:mm` in Persian digits.
pub fn format_jalali_date_time(input: &str) -> Cow<'_, str> {
    format_jalali_date_time_with(input, DigitStyle::Persian)
}

pub fn format_jalali_date_time_with(input: &str, style: DigitStyle) -> Cow<'_, str> {
    format_with(input, style, |moment| {
        format!(
            "{} {:02}:{:02}",
            JalaliDate::from_gregorian(moment.date()),
            moment.hour(),
            moment.minute()
        )
    })
}
