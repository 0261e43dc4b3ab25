//! Actor roles.

use std::fmt;

/// Name of the role the dashboard treats as privileged.
pub const PRIVILEGED_ROLE_NAME: &str = "Admin";

/// The role of the actor driving a controller.
///
/// Only [`Role::Privileged`] may create, update or delete records. Every
/// other role the identity service reports ("Client", "Technicien", ...)
/// maps to [`Role::Standard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Staff allowed to mutate records.
    Privileged,
    /// Read-only staff. This is the role of a logged-out session.
    #[default]
    Standard,
}

impl Role {
    /// Maps a role name reported by the identity service to a `Role`.
    ///
    /// ```rust
    /// use staffdesk::Role;
    ///
    /// assert_eq!(Role::from_name("Admin"), Role::Privileged);
    /// assert_eq!(Role::from_name("Client"), Role::Standard);
    /// assert_eq!(Role::from_name("admin"), Role::Standard);
    /// ```
    pub fn from_name(name: &str) -> Self {
        if name == PRIVILEGED_ROLE_NAME {
            Role::Privileged
        } else {
            Role::Standard
        }
    }

    /// Returns `true` for the privileged role.
    #[inline]
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Privileged)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Privileged => write!(f, "privileged"),
            Role::Standard => write!(f, "standard"),
        }
    }
}
