//! Opaque bearer credential with redacted Debug output.

use crate::{ErrorLocation, RedactError};

use std::fmt;
use std::panic::Location;

use serde::ser::Error;
use zeroize::Zeroize;

/// The session token issued by the backend on login.
///
/// The value is never validated locally: presence alone means "authenticated"
/// and the backend is the only authority on whether it is still good.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    inner: String,
}

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            inner: token.into(),
        }
    }

    /// The raw token, for the `Authorization` header or the token store only.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Value for an `Authorization` header.
    pub fn bearer_header_value(&self) -> String {
        format!("Bearer {}", self.inner)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken([REDACTED])")
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED SESSION TOKEN]")
    }
}

impl Drop for SessionToken {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

// Stores persist through expose(), never through serde
impl serde::Serialize for SessionToken {
    #[track_caller]
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::Serialization {
            type_name: "SessionToken",
            location: ErrorLocation::from(Location::caller()),
        }))
    }
}
