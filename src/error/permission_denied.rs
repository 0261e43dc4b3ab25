//! PermissionDenied error type for mutations refused by the permission gate.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use crate::auth::Role;

/// Error returned when the permission gate refuses a mutation.
///
/// This type is **distinct from SDK errors** ([`Error`](crate::Error)). It is
/// produced locally, before any request is sent: the actor's [`Role`] does not
/// allow create, update or delete operations.
///
/// | Type                   | Raised by   | Service contacted? |
/// |------------------------|-------------|--------------------|
/// | `PermissionDenied`     | controller  | No                 |
/// | `ErrorKind::Forbidden` | data service| Yes (HTTP 403)     |
///
/// ## Example
///
/// ```rust
/// use staffdesk::{PermissionDenied, Role};
///
/// let denied = PermissionDenied::new(Role::Standard, "remove", "users");
/// assert_eq!(denied.role(), Role::Standard);
/// assert_eq!(denied.operation(), "remove");
/// assert_eq!(denied.resource(), "users");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDenied {
    role: Role,
    operation: Cow<'static, str>,
    resource: Cow<'static, str>,
}

impl PermissionDenied {
    /// Creates a new denial for `role` attempting `operation` on `resource`.
    pub fn new(
        role: Role,
        operation: impl Into<Cow<'static, str>>,
        resource: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            role,
            operation: operation.into(),
            resource: resource.into(),
        }
    }

    /// Returns the role that was refused.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the refused operation (e.g. "create", "bulk_remove").
    #[inline]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Returns the resource the operation targeted (e.g. "users").
    #[inline]
    pub fn resource(&self) -> &str {
        &self.resource
    }
}

impl fmt::Display for PermissionDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "permission denied: {} role cannot {} {}",
            self.role, self.operation, self.resource
        )
    }
}

impl StdError for PermissionDenied {}

/// Converts a local denial into an SDK error of kind `Forbidden`.
impl From<PermissionDenied> for super::Error {
    fn from(denied: PermissionDenied) -> Self {
        super::Error::new(super::ErrorKind::Forbidden, denied.to_string())
    }
}
