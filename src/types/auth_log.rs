//! Authentication audit log.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{ReadOnly, Record};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthAction {
    /// Successful login.
    Login,
    /// Explicit logout.
    Logout,
    /// Rejected credentials.
    #[serde(rename = "Failed Login")]
    FailedLogin,
}

impl AuthAction {
    /// Returns the wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthAction::Login => "Login",
            AuthAction::Logout => "Logout",
            AuthAction::FailedLogin => "Failed Login",
        }
    }
}

impl fmt::Display for AuthAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit entry as served by `auth-logs/`. The log is read-only; entries
/// can be listed, exported and deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthLogEntry {
    /// Service-assigned identifier.
    pub id: i64,
    /// Username the attempt was made for.
    pub user: String,
    /// Outcome.
    pub action: AuthAction,
    /// When it happened.
    #[serde(deserialize_with = "super::timestamp::required")]
    pub timestamp: DateTime<Utc>,
    /// Client address.
    pub ip_address: String,
}

/// Sortable log attributes.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthLogSortKey {
    Id,
    User,
    Action,
    Timestamp,
    IpAddress,
}

/// Filterable log attributes.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthLogFilter {
    User,
    Action,
}

impl Record for AuthLogEntry {
    type Id = i64;
    type SortKey = AuthLogSortKey;
    type FilterKey = AuthLogFilter;
    type Draft = ReadOnly;
    type Patch = ReadOnly;

    const RESOURCE: &'static str = "auth logs";
    const ENDPOINT: &'static str = "auth-logs/";
    const TITLE: &'static str = "Authentication Logs";

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.user.clone(),
            self.action.to_string(),
            self.timestamp.to_rfc3339(),
            self.ip_address.clone(),
        ]
    }

    fn compare(&self, other: &Self, key: AuthLogSortKey) -> Ordering {
        match key {
            AuthLogSortKey::Id => self.id.cmp(&other.id),
            AuthLogSortKey::User => self.user.cmp(&other.user),
            AuthLogSortKey::Action => self.action.as_str().cmp(other.action.as_str()),
            AuthLogSortKey::Timestamp => self.timestamp.cmp(&other.timestamp),
            AuthLogSortKey::IpAddress => self.ip_address.cmp(&other.ip_address),
        }
    }

    fn default_sort_key() -> AuthLogSortKey {
        AuthLogSortKey::Timestamp
    }

    fn filter_value(&self, key: AuthLogFilter) -> Option<String> {
        match key {
            AuthLogFilter::User => Some(self.user.clone()),
            AuthLogFilter::Action => Some(self.action.to_string()),
        }
    }

    fn export_columns() -> &'static [&'static str] {
        &["ID", "User", "Action", "Timestamp", "IP address"]
    }

    fn export_row(&self) -> Vec<String> {
        self.search_fields()
    }
}
