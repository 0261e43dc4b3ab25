//! # staffdesk
//!
//! Rust SDK for staff administration dashboards: typed, client-resident
//! controllers over the records of a REST data service.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use staffdesk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::from_env()?;
//!     let session = client.login("admin@example.com", "s3cret").await?;
//!
//!     let stock = client.stock_items(session.current_role());
//!     stock.refresh().await?;
//!
//!     stock.set_filter(StockFilter::Status, "Available");
//!     stock.set_sort(StockSortKey::Quantity);
//!     for item in stock.visible_slice().records {
//!         println!("{:>4}  {}", item.quantity, item.name);
//!     }
//!
//!     let csv = stock.export_visible(&CsvEncoder::new())?;
//!     std::fs::write("stock.csv", csv)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **One controller per resource**: [`ResourceController<R>`] owns the
//!   collection, the view (search, filters, sort, page) and the selection
//! - **The view is derived**: the visible page is recomputed from the
//!   collection on every read and never reorders it
//! - **Confirm, then apply**: mutations touch the collection only after the
//!   data service confirms them
//! - **One gate**: [`PermissionGate`] refuses every mutation for a
//!   [`Role::Standard`] actor before any request is sent
//! - **Partial failure ≠ Error**: a bulk delete that partly fails returns
//!   [`BulkOutcome::PartialFailure`], not `Err`
//!
//! ## Features
//!
//! - `rest` (default): REST data service and [`Client`] via reqwest
//! - `rustls` (default): Use rustls for TLS
//! - `native-tls`: Use native TLS (OpenSSL on Linux, Secure Transport on macOS)

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod types;

// Client
#[cfg(feature = "rest")]
#[cfg_attr(docsrs, doc(cfg(feature = "rest")))]
pub mod client;

// Transport layer
pub mod transport;

// Testing utilities
pub mod testing;

#[cfg(feature = "rest")]
mod user_agent;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
#[cfg(feature = "rest")]
pub use client::{Client, ClientBuilder};
pub use controller::{
    BulkOutcome, ControllerSnapshot, OperationKind, PendingOperation, ResourceController,
    SortState, VisibleSlice,
};
pub use error::{Error, ErrorKind, MutationError, PermissionDenied, Result};
pub use export::{CsvEncoder, ExportEncoder, ExportSheet, JsonEncoder};
pub use types::{
    AuthAction, AuthLogEntry, AuthLogFilter, AuthLogSortKey, ConnectionEntry, ConnectionFilter,
    ConnectionSortKey, InstallationFilter, InstallationPatch, InstallationRecord,
    InstallationSortKey, JobKind, JobStatus, NewInstallation, NewSecuritySetting, NewStockItem,
    NewUser, ReadOnly, Record, SecurityFilter, SecuritySetting, SecuritySettingPatch,
    SecuritySettings, SecuritySortKey, SettingValue, SortOrder, StockFilter, StockItem,
    StockItemPatch, StockSortKey, StockStatus, User, UserFilter, UserPatch, UserSortKey, UserType,
};

// Re-export auth types
pub use auth::{IdentityProvider, PermissionGate, Role, Session, StaticIdentity, TokenCredentials};

// Re-export config types
pub use config::{ControllerConfig, RetryConfig, TlsConfig};

// Re-export transport types
pub use transport::ResourceService;
#[cfg(feature = "rest")]
pub use transport::{RestService, RestTransport};
