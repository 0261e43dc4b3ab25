//! Integration tests for the staffdesk SDK.
//!
//! Controllers are driven end-to-end against a `wiremock` data service or
//! the in-memory service from `staffdesk::testing`. No external service is
//! needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//!
//! # With controller logs
//! RUST_LOG=staffdesk=debug cargo test --test integration -- --nocapture
//! ```

mod common;
mod controller_tests;
mod rest_tests;
mod session_tests;
