//! Transport layer for data service communication.
//!
//! - [`ResourceService`]: the CRUD contract a controller talks to
//! - [`RestTransport`] / [`RestService`]: HTTP + JSON implementation (via reqwest)
//!
//! An in-memory implementation for tests lives in
//! [`testing::InMemoryService`](crate::testing::InMemoryService).
//!
//! ## Feature Flags
//!
//! - `rest` (default): Enable the REST transport

pub(crate) mod traits;

#[cfg(feature = "rest")]
pub(crate) mod rest;

pub use traits::ResourceService;

#[cfg(feature = "rest")]
pub use rest::{DEFAULT_TIMEOUT, RestService, RestTransport, RestTransportBuilder};
