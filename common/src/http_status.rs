//! HTTP status classification used by the response interceptor.

/// HTTP status code as returned by the CRM backend.
///
/// Stored directly rather than parsed from error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    pub const UNAUTHORIZED: HttpStatusCode = HttpStatusCode(401);

    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// 401, the only status that tears the local session down.
    pub fn is_unauthorized(&self) -> bool {
        self.0 == Self::UNAUTHORIZED.0
    }

    /// 4xx client errors.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// 500 and above. Anything the server could not answer sensibly is
    /// treated as "server down" for diagnostics.
    pub fn is_server_error(&self) -> bool {
        self.0 >= 500
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
