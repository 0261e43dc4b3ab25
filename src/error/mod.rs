//! Error types for the staffdesk SDK.
//!
//! The SDK provides three error shapes:
//! - [`Error`]: failures talking to the data service, or commands the
//!   controller refuses locally (busy, cancelled, invalid draft)
//! - [`PermissionDenied`]: a mutation refused by the permission gate before
//!   any request was sent
//! - [`MutationError`]: what mutating controller commands return, one of the
//!   two above
//!
//! ## Key Invariant
//!
//! A partially failed bulk delete is **not** an error: it is reported as
//! [`BulkOutcome::PartialFailure`](crate::BulkOutcome::PartialFailure) so the
//! caller sees exactly which identifiers succeeded.

mod core;
mod kind;
mod permission_denied;

pub use core::Error;
pub use kind::ErrorKind;
pub use permission_denied::PermissionDenied;

/// A specialized `Result` type for staffdesk operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by mutating controller commands.
#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    /// The actor's role may not mutate records. The service was not contacted.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    /// The command was refused locally or the data service call failed.
    #[error(transparent)]
    Service(#[from] Error),
}

impl MutationError {
    /// Returns `true` if the permission gate refused the command.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, MutationError::PermissionDenied(_))
    }

    /// Returns the error kind: `Forbidden` for a denial, otherwise the
    /// service error's kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MutationError::PermissionDenied(_) => ErrorKind::Forbidden,
            MutationError::Service(err) => err.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn test_mutation_error_kind() {
        let denied: MutationError = PermissionDenied::new(Role::Standard, "remove", "users").into();
        assert!(denied.is_permission_denied());
        assert_eq!(denied.kind(), ErrorKind::Forbidden);

        let service: MutationError = Error::not_found("gone").into();
        assert!(!service.is_permission_denied());
        assert_eq!(service.kind(), ErrorKind::NotFound);
    }
}
