use serde::Serialize;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;

/// Source position where an error was raised.
///
/// Built from `Location::caller()` inside `#[track_caller]` conversions so the
/// position is the caller's, not the conversion's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorLocation {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl ErrorLocation {
    /// Position of whoever called the enclosing `#[track_caller]` function.
    #[track_caller]
    pub fn here() -> Self {
        Self::from(Location::caller())
    }
}

impl From<&'static Location<'static>> for ErrorLocation {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl Display for ErrorLocation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "[{}:{}:{}]", self.file, self.line, self.column)
    }
}
