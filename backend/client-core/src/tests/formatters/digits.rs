// Unit tests for digit transliteration

use crate::formatters::{to_english_digits, to_persian_digits};

use std::borrow::Cow;

/// **VALUE**: Verifies Persian digits become ASCII digits.
///
/// **WHY THIS MATTERS**: Users type phone numbers and years with a Persian keyboard. The
/// backend expects ASCII digits, so search and form fields go through this first.
#[test]
fn given_persian_digits_when_to_english_digits_then_returns_ascii() {
    assert_eq!(to_english_digits("۱۴۰۲"), "1402");
    assert_eq!(to_english_digits("۰۹۱۲۳۴۵۶۷۸۹"), "09123456789");
}

/// **VALUE**: Verifies text without Persian digits passes through untouched and unallocated.
#[test]
fn given_text_without_persian_digits_when_to_english_digits_then_borrows_input() {
    let result = to_english_digits("abc");

    assert_eq!(result, "abc");
    assert!(matches!(result, Cow::Borrowed(_)));
}

/// **VALUE**: Verifies mixed strings only have their digits replaced.
#[test]
fn given_mixed_text_when_to_english_digits_then_only_digits_change() {
    assert_eq!(to_english_digits("سفارش ۱۲ - 3"), "سفارش 12 - 3");
}

/// **VALUE**: Verifies absent values stay absent when mapped.
///
/// **WHY THIS MATTERS**: Optional backend fields (e.g. a missing phone) are passed through the
/// formatter with `Option::map`; a `None` must come out as `None`, not as an empty string.
#[test]
fn given_absent_value_when_mapped_through_to_english_digits_then_stays_absent() {
    let phone: Option<&str> = None;

    assert_eq!(phone.map(to_english_digits), None);
}

#[test]
fn given_ascii_digits_when_to_persian_digits_then_returns_persian_glyphs() {
    assert_eq!(to_persian_digits("1403/01/01"), "۱۴۰۳/۰۱/۰۱");
    assert_eq!(to_english_digits(&to_persian_digits("2024")), "2024");
}
