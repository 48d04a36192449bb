use std::borrow::Cow;

const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];

fn persian_digit_value(c: char) -> Option<u32> {
    PERSIAN_DIGITS.iter().position(|&d| d == c).map(|i| i as u32)
}

/// Replace Persian digit glyphs (`۰`-`۹`) with ASCII digits.
///
/// Borrows when there is nothing to replace.
pub fn to_english_digits(input: &str) -> Cow<'_, str> {
    if !input.chars().any(|c| persian_digit_value(c).is_some()) {
        return Cow::Borrowed(input);
    }

    input
        .chars()
        .map(|c| match persian_digit_value(c).and_then(|v| char::from_digit(v, 10)) {
            Some(ascii) => ascii,
            None => c,
        })
        .collect::<String>()
        .into()
}

/// Replace ASCII digits with Persian digit glyphs.
pub fn to_persian_digits(input: &str) -> Cow<'_, str> {
    if !input.chars().any(|c| c.is_ascii_digit()) {
        return Cow::Borrowed(input);
    }

    input
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(v) => PERSIAN_DIGITS[v as usize],
            None => c,
        })
        .collect::<String>()
        .into()
}
