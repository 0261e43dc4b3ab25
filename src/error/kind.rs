//! Error kind enumeration for categorizing dashboard errors.

/// Categorization of SDK errors.
///
/// `ErrorKind` is what callers `match` on. Most kinds come straight from the
/// HTTP status returned by the data service; a few are raised locally by the
/// controller (`Busy`, `Cancelled`, `InvalidArgument` for draft validation).
///
/// ## Retriable vs Non-Retriable
///
/// | ErrorKind         | Retriable | Action                          |
/// |-------------------|-----------|---------------------------------|
/// | `Unavailable`     | Yes       | Retry with backoff              |
/// | `Timeout`         | Yes       | Retry with backoff              |
/// | `RateLimited`     | Yes       | Use `retry_after()` delay       |
/// | `Connection`      | Yes       | Retry with backoff              |
/// | `Busy`            | Yes       | Wait for the pending operation  |
/// | `Unauthorized`    | No        | Log in again                    |
/// | `Forbidden`       | No        | Server refused the actor        |
/// | `NotFound`        | No        | Record no longer exists         |
/// | `Conflict`        | No        | Refresh and retry               |
/// | `InvalidArgument` | No        | Fix the draft or patch          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Authentication failed (missing, invalid or expired token).
    ///
    /// HTTP: 401 Unauthorized
    #[error("unauthorized")]
    Unauthorized,

    /// The data service refused the request for this actor.
    ///
    /// This is the server's verdict. A mutation refused locally by the
    /// permission gate never reaches the server and is reported as
    /// [`PermissionDenied`](crate::PermissionDenied) instead.
    ///
    /// HTTP: 403 Forbidden
    #[error("forbidden")]
    Forbidden,

    /// The record or endpoint was not found.
    ///
    /// HTTP: 404 Not Found
    #[error("not found")]
    NotFound,

    /// Invalid request payload, or a draft rejected by client-side validation.
    ///
    /// HTTP: 400 Bad Request, 422 Unprocessable Entity
    #[error("invalid argument")]
    InvalidArgument,

    /// Conflict with existing record state (duplicate username, stale row).
    ///
    /// HTTP: 409 Conflict
    #[error("conflict")]
    Conflict,

    /// Rate limit exceeded.
    ///
    /// HTTP: 429 Too Many Requests
    #[error("rate limited")]
    RateLimited,

    /// Service temporarily unavailable.
    ///
    /// HTTP: 503 Service Unavailable
    #[error("service unavailable")]
    Unavailable,

    /// Request timed out, either at the gateway or on the client.
    ///
    /// HTTP: 504 Gateway Timeout
    #[error("timeout")]
    Timeout,

    /// Internal server error.
    ///
    /// HTTP: 500 Internal Server Error
    #[error("internal error")]
    Internal,

    /// The controller was torn down while the request was in flight.
    ///
    /// The late response was discarded without touching controller state.
    #[error("cancelled")]
    Cancelled,

    /// Another operation is already pending on this controller.
    ///
    /// Controllers run at most one operation at a time; the rejected command
    /// never reached the data service.
    #[error("operation pending")]
    Busy,

    /// Connection error (DNS, TLS handshake, network unreachable).
    #[error("connection error")]
    Connection,

    /// Protocol error (unexpected redirect or status).
    #[error("protocol error")]
    Protocol,

    /// Configuration error (invalid URL, unreadable certificate).
    #[error("configuration error")]
    Configuration,

    /// Response body could not be decoded into the expected record type.
    #[error("invalid response")]
    InvalidResponse,

    /// Transport layer error that fits no narrower category.
    #[error("transport error")]
    Transport,

    /// Unknown or unexpected error.
    #[error("unknown error")]
    Unknown,
}

impl ErrorKind {
    /// Returns `true` if this error kind is generally safe to retry.
    ///
    /// # Example
    ///
    /// ```rust
    /// use staffdesk::ErrorKind;
    ///
    /// assert!(ErrorKind::Timeout.is_retriable());
    /// assert!(!ErrorKind::NotFound.is_retriable());
    /// ```
    #[inline]
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Unavailable
                | ErrorKind::Timeout
                | ErrorKind::RateLimited
                | ErrorKind::Connection
                | ErrorKind::Busy
        )
    }

    /// Returns the default HTTP status code for this error kind.
    #[inline]
    pub fn http_status_code(&self) -> u16 {
        match self {
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::InvalidArgument => 400,
            ErrorKind::Conflict | ErrorKind::Busy => 409,
            ErrorKind::RateLimited => 429,
            ErrorKind::Timeout => 504,
            ErrorKind::Unavailable => 503,
            ErrorKind::Internal => 500,
            ErrorKind::Cancelled => 499, // Client Closed Request
            ErrorKind::Connection => 502,
            ErrorKind::Protocol | ErrorKind::Transport | ErrorKind::InvalidResponse => 502,
            ErrorKind::Configuration | ErrorKind::Unknown => 500,
        }
    }

    /// Creates an `ErrorKind` from an HTTP status code.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 | 422 => ErrorKind::InvalidArgument,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            408 => ErrorKind::Timeout,
            409 => ErrorKind::Conflict,
            429 => ErrorKind::RateLimited,
            499 => ErrorKind::Cancelled,
            500 => ErrorKind::Internal,
            502 => ErrorKind::Protocol,
            503 => ErrorKind::Unavailable,
            504 => ErrorKind::Timeout,
            _ if (400..500).contains(&status) => ErrorKind::InvalidArgument,
            _ if status >= 500 => ErrorKind::Internal,
            _ if (300..400).contains(&status) => ErrorKind::Protocol,
            _ => ErrorKind::Unknown,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_is_retriable() {
        assert!(ErrorKind::Unavailable.is_retriable());
        assert!(ErrorKind::Timeout.is_retriable());
        assert!(ErrorKind::RateLimited.is_retriable());
        assert!(ErrorKind::Connection.is_retriable());
        assert!(ErrorKind::Busy.is_retriable());

        assert!(!ErrorKind::Unauthorized.is_retriable());
        assert!(!ErrorKind::Forbidden.is_retriable());
        assert!(!ErrorKind::NotFound.is_retriable());
        assert!(!ErrorKind::InvalidArgument.is_retriable());
        assert!(!ErrorKind::Conflict.is_retriable());
        assert!(!ErrorKind::Internal.is_retriable());
        assert!(!ErrorKind::Cancelled.is_retriable());
        assert!(!ErrorKind::InvalidResponse.is_retriable());
    }

    #[test_case(400, ErrorKind::InvalidArgument ; "bad request")]
    #[test_case(401, ErrorKind::Unauthorized ; "unauthorized")]
    #[test_case(403, ErrorKind::Forbidden ; "forbidden")]
    #[test_case(404, ErrorKind::NotFound ; "not found")]
    #[test_case(408, ErrorKind::Timeout ; "request timeout")]
    #[test_case(409, ErrorKind::Conflict ; "conflict")]
    #[test_case(422, ErrorKind::InvalidArgument ; "unprocessable")]
    #[test_case(429, ErrorKind::RateLimited ; "rate limited")]
    #[test_case(451, ErrorKind::InvalidArgument ; "other client error")]
    #[test_case(500, ErrorKind::Internal ; "internal")]
    #[test_case(501, ErrorKind::Internal ; "other server error")]
    #[test_case(502, ErrorKind::Protocol ; "bad gateway")]
    #[test_case(503, ErrorKind::Unavailable ; "unavailable")]
    #[test_case(504, ErrorKind::Timeout ; "gateway timeout")]
    #[test_case(302, ErrorKind::Protocol ; "redirect")]
    #[test_case(200, ErrorKind::Unknown ; "success is not an error")]
    fn test_from_http_status(status: u16, expected: ErrorKind) {
        assert_eq!(ErrorKind::from_http_status(status), expected);
    }

    #[test]
    fn test_http_status_code() {
        assert_eq!(ErrorKind::Unauthorized.http_status_code(), 401);
        assert_eq!(ErrorKind::Forbidden.http_status_code(), 403);
        assert_eq!(ErrorKind::NotFound.http_status_code(), 404);
        assert_eq!(ErrorKind::Busy.http_status_code(), 409);
        assert_eq!(ErrorKind::Cancelled.http_status_code(), 499);
        assert_eq!(ErrorKind::Unavailable.http_status_code(), 503);
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorKind::NotFound.to_string(), "not found");
        assert_eq!(ErrorKind::Busy.to_string(), "operation pending");
        assert_eq!(ErrorKind::InvalidResponse.to_string(), "invalid response");
    }
}
