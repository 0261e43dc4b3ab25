//! Token credentials shared between a client and its services.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Authorization scheme the data service expects.
pub const TOKEN_SCHEME: &str = "Token";

/// A token slot shared by every service created from one client.
///
/// Cloning is cheap and every clone sees the same token, so logging in or
/// out through a [`Session`](crate::Session) takes effect for all controllers
/// at once. The token is sent as `Authorization: Token <token>`.
///
/// ## Example
///
/// ```rust
/// use staffdesk::TokenCredentials;
///
/// let credentials = TokenCredentials::new("9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b");
/// assert!(credentials.is_authenticated());
///
/// let shared = credentials.clone();
/// credentials.clear();
/// assert!(!shared.is_authenticated());
/// ```
#[derive(Clone, Default)]
pub struct TokenCredentials {
    token: Arc<RwLock<Option<Arc<str>>>>,
}

impl TokenCredentials {
    /// Creates credentials holding `token`.
    pub fn new(token: impl Into<String>) -> Self {
        let credentials = Self::default();
        credentials.set(token);
        credentials
    }

    /// Creates credentials with no token.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Replaces the token.
    pub fn set(&self, token: impl Into<String>) {
        *self.token.write() = Some(Arc::from(token.into()));
    }

    /// Removes the token.
    pub fn clear(&self) {
        *self.token.write() = None;
    }

    /// Returns `true` if a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    /// Returns the current token.
    pub fn token(&self) -> Option<Arc<str>> {
        self.token.read().clone()
    }

    /// Returns the `Authorization` header value, if a token is present.
    pub fn authorization(&self) -> Option<String> {
        self.token
            .read()
            .as_ref()
            .map(|token| format!("{} {}", TOKEN_SCHEME, token))
    }
}

impl fmt::Debug for TokenCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.is_authenticated() {
            "[REDACTED]"
        } else {
            "None"
        };
        f.debug_struct("TokenCredentials")
            .field("token", &token)
            .finish()
    }
}

impl From<String> for TokenCredentials {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

impl From<&str> for TokenCredentials {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_header() {
        let credentials = TokenCredentials::new("abc123");
        assert_eq!(credentials.authorization().as_deref(), Some("Token abc123"));
    }

    #[test]
    fn test_anonymous_has_no_header() {
        assert!(TokenCredentials::anonymous().authorization().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", TokenCredentials::new("secret-token"));
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_clones_share_token() {
        let credentials = TokenCredentials::anonymous();
        let shared = credentials.clone();
        shared.set("fresh");
        assert_eq!(credentials.token().as_deref(), Some("fresh"));
    }
}
