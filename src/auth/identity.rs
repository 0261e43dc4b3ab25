//! The identity collaborator: who is driving the dashboard.

use std::sync::Arc;

use parking_lot::RwLock;

use super::{Role, TokenCredentials};

/// Source of the current actor's role.
///
/// Controllers take an explicit [`Role`] at construction; an
/// `IdentityProvider` is where that role comes from. After a logout, push
/// the new role into live controllers with
/// [`ResourceController::set_role`](crate::ResourceController::set_role).
///
/// ## Object Safety
///
/// This trait is object-safe and can be used as `Arc<dyn IdentityProvider>`.
pub trait IdentityProvider: Send + Sync {
    /// Returns the role of the current actor.
    fn current_role(&self) -> Role;

    /// Ends the current session.
    fn logout(&self);
}

/// An identity with a fixed role, for tools and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticIdentity(pub Role);

impl IdentityProvider for StaticIdentity {
    fn current_role(&self) -> Role {
        self.0
    }

    fn logout(&self) {}
}

/// A logged-in staff session.
///
/// Created by [`Client::login`](crate::Client::login), or directly from a
/// stored token with [`Session::new`]. The session shares its
/// [`TokenCredentials`] with the client, so [`logout`](IdentityProvider::logout)
/// both drops the role to [`Role::Standard`] and stops sending the token.
#[derive(Debug, Clone)]
pub struct Session {
    credentials: TokenCredentials,
    role: Arc<RwLock<Role>>,
}

impl Session {
    /// Creates a session over existing credentials with the given role.
    pub fn new(credentials: TokenCredentials, role: Role) -> Self {
        Self {
            credentials,
            role: Arc::new(RwLock::new(role)),
        }
    }

    /// Returns `true` while the session holds a token.
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }

    /// Returns the credentials this session manages.
    pub fn credentials(&self) -> &TokenCredentials {
        &self.credentials
    }
}

impl IdentityProvider for Session {
    fn current_role(&self) -> Role {
        *self.role.read()
    }

    fn logout(&self) {
        self.credentials.clear();
        *self.role.write() = Role::Standard;
        tracing::debug!("session logged out");
    }
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for Arc<T> {
    fn current_role(&self) -> Role {
        (**self).current_role()
    }

    fn logout(&self) {
        (**self).logout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_identity() {
        let identity = StaticIdentity(Role::Privileged);
        identity.logout();
        assert_eq!(identity.current_role(), Role::Privileged);
    }

    #[test]
    fn test_session_logout_clears_token_and_role() {
        let credentials = TokenCredentials::new("tok");
        let session = Session::new(credentials.clone(), Role::Privileged);
        assert!(session.is_authenticated());
        assert_eq!(session.current_role(), Role::Privileged);

        session.logout();

        assert!(!session.is_authenticated());
        assert!(!credentials.is_authenticated());
        assert_eq!(session.current_role(), Role::Standard);
    }

    #[test]
    fn test_identity_is_object_safe() {
        let identity: Arc<dyn IdentityProvider> = Arc::new(StaticIdentity(Role::Standard));
        assert_eq!(identity.current_role(), Role::Standard);
    }
}
