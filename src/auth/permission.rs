//! The permission gate consulted before every mutation.

use std::borrow::Cow;

use super::Role;
use crate::error::PermissionDenied;

/// Decides whether an actor may mutate records.
///
/// This is the single place the mutation rule lives. Controllers call
/// [`PermissionGate::check`] before every create, update and delete; reads
/// are never gated.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionGate;

impl PermissionGate {
    /// Returns `true` only for the privileged role.
    ///
    /// ```rust
    /// use staffdesk::{PermissionGate, Role};
    ///
    /// assert!(PermissionGate::can_mutate(Role::Privileged));
    /// assert!(!PermissionGate::can_mutate(Role::Standard));
    /// ```
    #[inline]
    pub fn can_mutate(role: Role) -> bool {
        role.is_privileged()
    }

    /// Returns `Err(PermissionDenied)` unless `role` may mutate.
    pub fn check(
        role: Role,
        operation: impl Into<Cow<'static, str>>,
        resource: impl Into<Cow<'static, str>>,
    ) -> Result<(), PermissionDenied> {
        if Self::can_mutate(role) {
            Ok(())
        } else {
            Err(PermissionDenied::new(role, operation, resource))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_allows_privileged() {
        assert!(PermissionGate::check(Role::Privileged, "create", "users").is_ok());
    }

    #[test]
    fn test_check_denies_standard() {
        let denied = PermissionGate::check(Role::Standard, "remove", "users");
        let denied = denied.err();
        assert_eq!(denied.as_ref().map(|d| d.operation()), Some("remove"));
        assert_eq!(denied.as_ref().map(|d| d.role()), Some(Role::Standard));
    }
}
