//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types for easy importing:
//!
//! ```rust
//! use staffdesk::prelude::*;
//! ```
//!
//! This provides access to:
//! - The client and the resource controller
//! - Error types
//! - Identity and permission types
//! - Record types with their sort and filter keys
//! - Export encoders

#[cfg(feature = "rest")]
pub use crate::client::{Client, ClientBuilder};
pub use crate::{
    auth::{IdentityProvider, PermissionGate, Role, Session, StaticIdentity, TokenCredentials},
    config::{ControllerConfig, RetryConfig, TlsConfig},
    controller::{BulkOutcome, ControllerSnapshot, ResourceController, SortState, VisibleSlice},
    error::{Error, ErrorKind, MutationError, PermissionDenied, Result},
    export::{CsvEncoder, ExportEncoder, ExportSheet, JsonEncoder},
    transport::ResourceService,
    types::{
        AuthLogEntry, AuthLogSortKey, ConnectionEntry, ConnectionSortKey, InstallationFilter,
        InstallationRecord, InstallationSortKey, Record, SecuritySetting, SecuritySettings,
        SortOrder, StockFilter, StockItem, StockSortKey, StockStatus, User, UserFilter, UserPatch,
        UserSortKey, UserType,
    },
};
