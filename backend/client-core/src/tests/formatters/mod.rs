mod digits;
mod jalali;
