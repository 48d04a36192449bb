//! Locale formatting for Persian-language views.
//!
//! All functions are pure. Inputs that are not dates are handed back as-is,
//! so callers can feed raw backend fields through without checking them first.

pub mod digits;
pub mod jalali;

pub use digits::{to_english_digits, to_persian_digits};
pub use jalali::{
    DigitStyle, JalaliDate, format_jalali_date, format_jalali_date_time, format_jalali_date_time_with,
    format_jalali_date_with,
};
