//! Connection history.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{ReadOnly, Record};

/// One connection as served by `connections/`. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionEntry {
    /// Service-assigned identifier.
    pub id: i64,
    /// Username that connected.
    pub user: String,
    /// When the connection was opened.
    #[serde(deserialize_with = "super::timestamp::required")]
    pub date: DateTime<Utc>,
    /// Region the connection came from.
    pub province: String,
    /// Connection status as reported by the service.
    pub status: String,
}

/// Sortable connection attributes.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionSortKey {
    Id,
    User,
    Date,
    Province,
    Status,
}

/// Filterable connection attributes.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionFilter {
    User,
    Province,
    Status,
}

impl Record for ConnectionEntry {
    type Id = i64;
    type SortKey = ConnectionSortKey;
    type FilterKey = ConnectionFilter;
    type Draft = ReadOnly;
    type Patch = ReadOnly;

    const RESOURCE: &'static str = "connections";
    const ENDPOINT: &'static str = "connections/";
    const TITLE: &'static str = "Statistics and Connection History";

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.user.clone(),
            self.date.to_rfc3339(),
            self.province.clone(),
            self.status.clone(),
        ]
    }

    fn compare(&self, other: &Self, key: ConnectionSortKey) -> Ordering {
        match key {
            ConnectionSortKey::Id => self.id.cmp(&other.id),
            ConnectionSortKey::User => self.user.cmp(&other.user),
            ConnectionSortKey::Date => self.date.cmp(&other.date),
            ConnectionSortKey::Province => self.province.cmp(&other.province),
            ConnectionSortKey::Status => self.status.cmp(&other.status),
        }
    }

    fn default_sort_key() -> ConnectionSortKey {
        ConnectionSortKey::Date
    }

    fn filter_value(&self, key: ConnectionFilter) -> Option<String> {
        match key {
            ConnectionFilter::User => Some(self.user.clone()),
            ConnectionFilter::Province => Some(self.province.clone()),
            ConnectionFilter::Status => Some(self.status.clone()),
        }
    }

    fn export_columns() -> &'static [&'static str] {
        &["ID", "User", "Date", "Province", "Status"]
    }

    fn export_row(&self) -> Vec<String> {
        self.search_fields()
    }
}
