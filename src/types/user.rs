//! Staff and customer accounts.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{Record, cell};
use crate::{Error, Result};

/// Account category, serialized with the service's labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    /// Field technician.
    #[serde(rename = "Technicien")]
    Technician,
    /// End customer.
    #[serde(rename = "Client")]
    Client,
    /// Reseller.
    #[serde(rename = "Commerçant")]
    Merchant,
}

impl UserType {
    /// Returns the label the service uses for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Technician => "Technicien",
            UserType::Client => "Client",
            UserType::Merchant => "Commerçant",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account as served by `users/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Service-assigned identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Account category.
    pub user_type: UserType,
    /// Blocked accounts cannot log in.
    #[serde(default)]
    pub is_blocked: bool,
    /// Free-form account status reported by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Time of the most recent login, absent for new accounts.
    #[serde(
        default,
        deserialize_with = "super::timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_login: Option<DateTime<Utc>>,
}

/// Sortable user attributes.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserSortKey {
    Id,
    Username,
    Email,
    UserType,
    Blocked,
    LastLogin,
}

/// Filterable user attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserFilter {
    /// Matches the service label, e.g. `"Technicien"`.
    UserType,
    /// Matches `"true"` or `"false"`.
    Blocked,
    /// Matches the free-form status; accounts without one never match.
    Status,
}

/// Body of a create request.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub user_type: UserType,
    pub is_blocked: bool,
}

impl NewUser {
    /// Creates an unblocked account draft.
    pub fn new(username: impl Into<String>, email: impl Into<String>, user_type: UserType) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            user_type,
            is_blocked: false,
        }
    }
}

/// Partial update. Absent fields are left unchanged by the service.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_blocked: Option<bool>,
}

impl UserPatch {
    /// Sets the blocked flag.
    #[must_use]
    pub fn blocked(mut self, blocked: bool) -> Self {
        self.is_blocked = Some(blocked);
        self
    }

    /// Patch that flips `user`'s blocked flag.
    ///
    /// ```rust
    /// use staffdesk::{User, UserPatch, UserType};
    ///
    /// let user = User {
    ///     id: 1,
    ///     username: "amina".into(),
    ///     email: "amina@example.com".into(),
    ///     user_type: UserType::Technician,
    ///     is_blocked: false,
    ///     status: None,
    ///     last_login: None,
    /// };
    /// assert_eq!(UserPatch::toggle_block(&user).is_blocked, Some(true));
    /// ```
    pub fn toggle_block(user: &User) -> Self {
        Self::default().blocked(!user.is_blocked)
    }
}

impl Record for User {
    type Id = i64;
    type SortKey = UserSortKey;
    type FilterKey = UserFilter;
    type Draft = NewUser;
    type Patch = UserPatch;

    const RESOURCE: &'static str = "users";
    const ENDPOINT: &'static str = "users/";
    const TITLE: &'static str = "Users";

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            self.email.clone(),
            self.user_type.to_string(),
            self.is_blocked.to_string(),
            self.status.clone().unwrap_or_default(),
            cell(self.last_login.as_ref()),
        ]
    }

    fn compare(&self, other: &Self, key: UserSortKey) -> Ordering {
        match key {
            UserSortKey::Id => self.id.cmp(&other.id),
            UserSortKey::Username => self.username.cmp(&other.username),
            UserSortKey::Email => self.email.cmp(&other.email),
            UserSortKey::UserType => self.user_type.as_str().cmp(other.user_type.as_str()),
            UserSortKey::Blocked => self.is_blocked.cmp(&other.is_blocked),
            UserSortKey::LastLogin => self.last_login.cmp(&other.last_login),
        }
    }

    fn default_sort_key() -> UserSortKey {
        UserSortKey::Id
    }

    fn filter_value(&self, key: UserFilter) -> Option<String> {
        match key {
            UserFilter::UserType => Some(self.user_type.to_string()),
            UserFilter::Blocked => Some(self.is_blocked.to_string()),
            UserFilter::Status => self.status.clone(),
        }
    }

    fn export_columns() -> &'static [&'static str] {
        &["ID", "Username", "Email", "Type", "Blocked", "Last login"]
    }

    fn export_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            self.email.clone(),
            self.user_type.to_string(),
            if self.is_blocked { "Yes" } else { "No" }.to_string(),
            cell(self.last_login.as_ref()),
        ]
    }

    fn validate_draft(draft: &NewUser) -> Result<()> {
        if draft.username.trim().is_empty() {
            return Err(Error::invalid_argument("username cannot be empty"));
        }
        if draft.email.trim().is_empty() {
            return Err(Error::invalid_argument("email cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn user(id: i64, username: &str, user_type: UserType) -> User {
        User {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            user_type,
            is_blocked: false,
            status: None,
            last_login: None,
        }
    }

    #[test]
    fn test_deserialize_service_payload() {
        let json = r#"{
            "id": 7,
            "username": "karim",
            "email": "karim@example.com",
            "user_type": "Commerçant",
            "is_blocked": true,
            "last_login": "2024-03-01T08:30:00Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.user_type, UserType::Merchant);
        assert!(user.is_blocked);
        assert!(user.last_login.is_some());
        assert!(user.status.is_none());
    }

    #[test]
    fn test_list_with_blank_and_naive_last_login() {
        let json = r#"[
            {"id": 1, "username": "new", "email": "new@example.com",
             "user_type": "Client", "last_login": ""},
            {"id": 2, "username": "old", "email": "old@example.com",
             "user_type": "Client", "last_login": "2024-03-01T08:30:00"}
        ]"#;
        let users: Vec<User> = serde_json::from_str(json).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].last_login, None);
        assert_eq!(
            users[1].last_login.map(|at| at.to_rfc3339()).as_deref(),
            Some("2024-03-01T08:30:00+00:00")
        );
    }

    #[test]
    fn test_garbled_last_login_is_rejected() {
        let json = r#"{"id": 1, "username": "x", "email": "x@example.com",
                       "user_type": "Client", "last_login": "soon"}"#;
        assert!(serde_json::from_str::<User>(json).is_err());
    }

    #[test]
    fn test_search_matches_any_field_case_insensitively() {
        let u = user(3, "Yasmine", UserType::Technician);
        assert!(u.matches_search("yas"));
        assert!(u.matches_search("techn"));
        assert!(u.matches_search("example.com"));
        assert!(!u.matches_search("zzz"));
    }

    #[test]
    fn test_compare_user_type_uses_service_labels() {
        let a = user(1, "a", UserType::Technician);
        let b = user(2, "b", UserType::Client);
        assert_eq!(a.compare(&b, UserSortKey::UserType), Ordering::Greater);
    }

    #[test]
    fn test_toggle_block_patch_serializes_only_flag() {
        let mut u = user(1, "a", UserType::Client);
        u.is_blocked = true;
        let json = serde_json::to_value(UserPatch::toggle_block(&u)).unwrap();
        assert_eq!(json, serde_json::json!({ "is_blocked": false }));
    }

    #[test]
    fn test_validate_draft_requires_username_and_email() {
        let err = User::validate_draft(&NewUser::new(" ", "x@example.com", UserType::Client));
        assert_eq!(err.unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert!(User::validate_draft(&NewUser::new("x", "", UserType::Client)).is_err());
        assert!(User::validate_draft(&NewUser::new("x", "x@example.com", UserType::Client)).is_ok());
    }

    #[test]
    fn test_export_row_aligned_with_columns() {
        let u = user(1, "a", UserType::Client);
        assert_eq!(u.export_row().len(), User::export_columns().len());
    }
}
