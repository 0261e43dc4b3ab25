//! Configuration types for the staffdesk SDK.
//!
//! This module provides configuration options for:
//! - [`ControllerConfig`]: Page size of a resource controller
//! - [`RetryConfig`]: Which failed requests are retried, and when
//! - [`TlsConfig`]: TLS/SSL settings for the data service

mod controller;
mod retry;
mod tls;

pub use controller::{ControllerConfig, DEFAULT_PAGE_SIZE};
pub use retry::{RetryCause, RetryConfig, is_replayable};
pub use tls::TlsConfig;
