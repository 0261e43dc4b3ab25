//! The in-flight operation slot and bulk outcomes.

use std::fmt;

use crate::Error;

/// Kind of the operation awaiting the data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Fetching the collection.
    Refresh,
    /// Creating a record.
    Create,
    /// Updating a record.
    Update,
    /// Deleting one record.
    Remove,
    /// Deleting several records concurrently.
    BulkRemove,
}

impl OperationKind {
    /// Verb used in logs and permission errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Refresh => "refresh",
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Remove => "remove",
            OperationKind::BulkRemove => "bulk remove",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The operation a controller is waiting on. At most one exists at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOperation<Id> {
    /// What is being done.
    pub kind: OperationKind,
    /// Records it targets; empty for refresh and create.
    pub target_ids: Vec<Id>,
}

/// Result of a bulk delete that passed the permission gate.
#[derive(Debug)]
pub enum BulkOutcome<Id> {
    /// Every delete succeeded.
    Success {
        /// Identifiers removed from the collection.
        removed: Vec<Id>,
    },
    /// At least one delete failed. Succeeded identifiers were removed;
    /// failed ones are still in the collection.
    PartialFailure {
        /// Identifiers removed from the collection.
        succeeded: Vec<Id>,
        /// Identifiers whose delete failed, with the error for each.
        failed: Vec<(Id, Error)>,
    },
}

impl<Id> BulkOutcome<Id> {
    /// Returns `true` if every delete succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, BulkOutcome::Success { .. })
    }

    /// Identifiers that were removed.
    pub fn succeeded(&self) -> &[Id] {
        match self {
            BulkOutcome::Success { removed } => removed,
            BulkOutcome::PartialFailure { succeeded, .. } => succeeded,
        }
    }

    /// Identifiers whose delete failed.
    pub fn failed_ids(&self) -> Vec<&Id> {
        match self {
            BulkOutcome::Success { .. } => Vec::new(),
            BulkOutcome::PartialFailure { failed, .. } => failed.iter().map(|(id, _)| id).collect(),
        }
    }
}
