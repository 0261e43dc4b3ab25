//! Per-controller view configuration.

use crate::types::SortOrder;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Configuration for a [`ResourceController`](crate::ResourceController).
///
/// The page size is fixed for the lifetime of a controller instance.
///
/// ## Example
///
/// ```rust
/// use staffdesk::ControllerConfig;
///
/// let config = ControllerConfig::builder().page_size(20).build();
/// assert_eq!(config.page_size(), 20);
///
/// // Zero is not a valid page size and is raised to one.
/// let config = ControllerConfig::builder().page_size(0).build();
/// assert_eq!(config.page_size(), 1);
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct ControllerConfig {
    /// Number of records per page.
    #[builder(default = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Direction a fresh controller sorts in.
    #[builder(default)]
    default_order: SortOrder,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ControllerConfig {
    /// Returns the page size, never less than one.
    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }

    /// Returns the initial sort direction.
    #[inline]
    pub fn default_order(&self) -> SortOrder {
        self.default_order
    }

    /// Returns a copy with a different page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}
