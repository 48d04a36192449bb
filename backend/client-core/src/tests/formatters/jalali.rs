// Unit tests for Gregorian -> Jalali conversion and formatting

use crate::formatters::{
    DigitStyle, JalaliDate, format_jalali_date, format_jalali_date_time,
    format_jalali_date_time_with, format_jalali_date_with, to_english_digits,
};

use chrono::NaiveDate;
use regex::Regex;

fn gregorian(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

// ============================================
// CONVERSION
// ============================================

/// **VALUE**: Verifies Nowruz (first day of the Jalali year) lands on the right Gregorian day.
///
/// **WHY THIS MATTERS**: The year boundary is where off-by-one errors in the day count show up
/// first. 1403 started on 2024-03-20 and 1402 on 2023-03-21.
#[test]
fn given_nowruz_dates_when_converted_then_returns_first_of_farvardin() {
    assert_eq!(
        JalaliDate::from_gregorian(gregorian(2024, 3, 20)),
        JalaliDate { year: 1403, month: 1, day: 1 }
    );
    assert_eq!(
        JalaliDate::from_gregorian(gregorian(2023, 3, 21)),
        JalaliDate { year: 1402, month: 1, day: 1 }
    );
}

/// **VALUE**: Verifies the last day of a common Jalali year is Esfand 29.
///
/// **BUG THIS CATCHES**: Would catch a leap-cycle error that gives 1402 a 30th of Esfand.
#[test]
fn given_day_before_nowruz_when_converted_then_returns_last_of_esfand() {
    assert_eq!(
        JalaliDate::from_gregorian(gregorian(2024, 3, 19)),
        JalaliDate { year: 1402, month: 12, day: 29 }
    );
}

/// **VALUE**: Verifies the switch from 31-day to 30-day months (Mehr 1).
#[test]
fn given_first_of_mehr_when_converted_then_second_half_of_year_is_correct() {
    assert_eq!(
        JalaliDate::from_gregorian(gregorian(2023, 9, 23)),
        JalaliDate { year: 1402, month: 7, day: 1 }
    );
}

#[test]
fn given_jalali_date_when_displayed_then_zero_pads_month_and_day() {
    let date = JalaliDate { year: 1403, month: 1, day: 9 };

    assert_eq!(date.to_string(), "1403/01/09");
}

// ============================================
// FORMATTING
// ============================================

/// **VALUE**: Verifies a plain ISO date becomes `jYYYY/jMM/jDD` in Persian digits.
#[test]
fn given_iso_date_when_format_jalali_date_then_returns_persian_digit_jalali() {
    let formatted = format_jalali_date("2024-03-20");

    let pattern = Regex::new(r"^[۰-۹]{4}/[۰-۹]{2}/[۰-۹]{2}$").unwrap();
    assert!(pattern.is_match(&formatted), "got {formatted}");
    assert_eq!(formatted, "۱۴۰۳/۰۱/۰۱");
    assert_eq!(to_english_digits(&formatted), "1403/01/01");
}

#[test]
fn given_iso_date_when_formatted_with_latin_digits_then_returns_ascii_jalali() {
    assert_eq!(
        format_jalali_date_with("2024-03-20", DigitStyle::Latin),
        "1403/01/01"
    );
}

/// **VALUE**: Verifies timestamps keep only the date part for `format_jalali_date`.
#[test]
fn given_naive_timestamp_when_format_jalali_date_then_drops_time() {
    assert_eq!(
        format_jalali_date_with("2023-09-23T18:45:10.123456", DigitStyle::Latin),
        "1402/07/01"
    );
    assert_eq!(
        format_jalali_date_with("2023-09-23 18:45:10", DigitStyle::Latin),
        "1402/07/01"
    );
}

/// **VALUE**: Verifies the date-time variant appends a 24-hour `HH:mm`.
#[test]
fn given_naive_timestamp_when_format_jalali_date_time_then_appends_hours_and_minutes() {
    assert_eq!(
        format_jalali_date_time_with("2024-03-20T09:05:59", DigitStyle::Latin),
        "1403/01/01 09:05"
    );
    assert_eq!(format_jalali_date_time("2024-03-20T21:30:00"), "۱۴۰۳/۰۱/۰۱ ۲۱:۳۰");
}

/// **VALUE**: Verifies a date-only value renders midnight in the date-time variant.
#[test]
fn given_date_only_when_format_jalali_date_time_then_uses_midnight() {
    assert_eq!(
        format_jalali_date_time_with("2024-03-20", DigitStyle::Latin),
        "1403/01/01 00:00"
    );
}

/// **VALUE**: Verifies non-dates are returned verbatim.
///
/// **WHY THIS MATTERS**: Views pass arbitrary backend fields through the formatter. Showing
/// "Invalid date" or an empty cell instead of the original text would hide data.
#[test]
fn given_non_iso_input_when_formatted_then_returns_input_unchanged() {
    assert_eq!(format_jalali_date("not-a-date"), "not-a-date");
    assert_eq!(format_jalali_date(""), "");
    assert_eq!(format_jalali_date("20/03/2024"), "20/03/2024");
    assert_eq!(format_jalali_date_time("yesterday"), "yesterday");
}

/// **VALUE**: Verifies values that look like ISO dates but cannot be parsed are returned verbatim.
///
/// **BUG THIS CATCHES**: Would catch a parse failure escaping as a panic or an error string.
#[test]
fn given_malformed_iso_input_when_formatted_then_returns_input_unchanged() {
    assert_eq!(format_jalali_date("2024-13-45"), "2024-13-45");
    assert_eq!(format_jalali_date("2024-02-30T10:00:00"), "2024-02-30T10:00:00");
    assert_eq!(format_jalali_date_time("2024-03-20 garbage"), "2024-03-20 garbage");
}

#[test]
fn given_absent_value_when_mapped_through_format_jalali_date_then_stays_absent() {
    let due_date: Option<&str> = None;

    assert_eq!(due_date.map(format_jalali_date), None);
}
