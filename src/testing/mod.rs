//! Testing utilities for staffdesk.
//!
//! - [`InMemoryService`]: a [`ResourceService`](crate::ResourceService)
//!   backed by a vector, with failure injection, request counting and a
//!   hold/release gate for observing in-flight operations
//!
//! ## Quick Start
//!
//! ```rust
//! use staffdesk::testing::InMemoryService;
//! use staffdesk::{ControllerConfig, ResourceController, Role, StockItem, StockStatus};
//!
//! # tokio_test();
//! # fn tokio_test() {
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let service = InMemoryService::<StockItem>::new().with_records([StockItem {
//!     id: 1,
//!     name: "Pump".into(),
//!     quantity: 4,
//!     status: StockStatus::Available,
//!     store: "Tunis".into(),
//! }]);
//!
//! let stock = ResourceController::new(service, Role::Standard, ControllerConfig::default());
//! stock.refresh().await.unwrap();
//! assert_eq!(stock.visible_slice().total_matches, 1);
//! # });
//! # }
//! ```

mod in_memory;

pub use in_memory::InMemoryService;
