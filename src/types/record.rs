//! The `Record` trait every resource type implements.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::Result;

/// One entity type served by the data service.
///
/// The controller is generic over `Record` and never inspects attributes
/// directly: searching, filtering, sorting and exporting all go through the
/// accessors below, so each resource keeps its own typed schema.
///
/// ## Associated types
///
/// - `Id`: the stable identifier, used in URLs and in the selection set
/// - `SortKey`: the sortable attributes
/// - `FilterKey`: the attributes that support equality filters
/// - `Draft`: the body of a create request
/// - `Patch`: the body of a partial update
///
/// Read-only resources use [`ReadOnly`] for `Draft` and `Patch`, which makes
/// create and update impossible to call.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + fmt::Debug + 'static {
    /// Stable unique identifier.
    type Id: Clone
        + Eq
        + Ord
        + Hash
        + fmt::Debug
        + fmt::Display
        + Send
        + Sync
        + Serialize
        + DeserializeOwned
        + 'static;

    /// Sortable attributes.
    type SortKey: Copy + Eq + fmt::Debug + Send + Sync + 'static;

    /// Attributes that accept equality filters.
    type FilterKey: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    /// Create request body.
    type Draft: Serialize + fmt::Debug + Send + Sync;

    /// Partial update body.
    type Patch: Serialize + fmt::Debug + Send + Sync;

    /// Short resource name used in logs and permission errors.
    const RESOURCE: &'static str;

    /// Collection path relative to the API base URL, with a trailing slash.
    const ENDPOINT: &'static str;

    /// Title used for exported sheets.
    const TITLE: &'static str;

    /// Returns the record's identifier.
    fn id(&self) -> Self::Id;

    /// String projection of every attribute, matched by free-text search.
    fn search_fields(&self) -> Vec<String>;

    /// Total order over the attribute named by `key`.
    fn compare(&self, other: &Self, key: Self::SortKey) -> Ordering;

    /// The key a fresh controller sorts by.
    fn default_sort_key() -> Self::SortKey;

    /// Value of the attribute named by `key`, compared by equality.
    ///
    /// `None` never matches a filter.
    fn filter_value(&self, key: Self::FilterKey) -> Option<String>;

    /// Column labels for export, in cell order.
    fn export_columns() -> &'static [&'static str];

    /// Export cells, aligned with [`export_columns`](Record::export_columns).
    fn export_row(&self) -> Vec<String>;

    /// Client-side check run before a create request is sent.
    fn validate_draft(_draft: &Self::Draft) -> Result<()> {
        Ok(())
    }

    /// Returns `true` if any searchable attribute contains `needle`.
    ///
    /// `needle` must already be lowercase.
    fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Ascending order (A-Z, oldest first).
    #[default]
    Ascending,
    /// Descending order (Z-A, newest first).
    Descending,
}

impl SortOrder {
    /// Returns `true` if this is ascending order.
    pub fn is_ascending(&self) -> bool {
        matches!(self, SortOrder::Ascending)
    }

    /// Returns the opposite direction.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Returns the short form used in query strings and headers.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Uninhabited body type for resources the dashboard only reads.
///
/// No value of this type exists, so `create` and `update` cannot be called
/// on a controller whose record uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadOnly {}

/// Formats an optional value for export, empty when absent.
pub(crate) fn cell<T: fmt::Display>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_toggle() {
        assert_eq!(SortOrder::default(), SortOrder::Ascending);
        assert_eq!(SortOrder::Ascending.toggled(), SortOrder::Descending);
        assert_eq!(SortOrder::Descending.toggled(), SortOrder::Ascending);
        assert_eq!(SortOrder::Descending.as_str(), "desc");
    }

    #[test]
    fn test_cell() {
        assert_eq!(cell(Some(&42)), "42");
        assert_eq!(cell::<String>(None), "");
    }
}
