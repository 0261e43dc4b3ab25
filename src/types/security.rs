//! Security settings and the policy derived from them.

use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::record::Record;
use crate::{Error, Result};

/// Name of the setting that enables two-factor authentication.
pub const TWO_FACTOR_SETTING: &str = "TwoFactorAuth";

/// Name of the setting holding the session timeout in minutes.
pub const SESSION_TIMEOUT_SETTING: &str = "SessionTimeout";

/// Session timeout used when the setting is absent or unparsable.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// A setting value: the service stores either a flag or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Boolean setting.
    Flag(bool),
    /// Anything else, numbers included.
    Text(String),
}

impl SettingValue {
    /// Interprets the value as a flag. Text counts only when it is `"true"`.
    pub fn as_bool(&self) -> bool {
        match self {
            SettingValue::Flag(flag) => *flag,
            SettingValue::Text(text) => text == "true",
        }
    }

    /// Leading integer of a text value, e.g. `45` for `"45 min"`.
    pub fn as_minutes(&self) -> Option<u64> {
        match self {
            SettingValue::Flag(_) => None,
            SettingValue::Text(text) => {
                let text = text.trim_start();
                let end = text
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(text.len());
                text[..end].parse().ok()
            }
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Flag(flag) => write!(f, "{flag}"),
            SettingValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(flag: bool) -> Self {
        SettingValue::Flag(flag)
    }
}

impl From<&str> for SettingValue {
    fn from(text: &str) -> Self {
        SettingValue::Text(text.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(text: String) -> Self {
        SettingValue::Text(text)
    }
}

/// A named setting as served by `security-settings/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecuritySetting {
    /// Service-assigned identifier.
    pub id: i64,
    /// Setting name, e.g. [`TWO_FACTOR_SETTING`].
    pub name: String,
    /// Current value.
    pub value: SettingValue,
    /// Human-readable explanation.
    #[serde(default)]
    pub description: String,
}

impl SecuritySetting {
    /// See [`SettingValue::as_bool`].
    pub fn as_bool(&self) -> bool {
        self.value.as_bool()
    }

    /// See [`SettingValue::as_minutes`].
    pub fn as_minutes(&self) -> Option<u64> {
        self.value.as_minutes()
    }
}

/// Sortable setting attributes.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecuritySortKey {
    Id,
    Name,
    Value,
}

/// Filterable setting attributes.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityFilter {
    Name,
}

/// Body of a create request.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSecuritySetting {
    pub name: String,
    pub value: SettingValue,
    pub description: String,
}

/// Partial update. Absent fields are left unchanged by the service.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SecuritySettingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<SettingValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SecuritySettingPatch {
    /// Patch that replaces the value.
    pub fn value(value: impl Into<SettingValue>) -> Self {
        Self {
            value: Some(value.into()),
            description: None,
        }
    }
}

impl Record for SecuritySetting {
    type Id = i64;
    type SortKey = SecuritySortKey;
    type FilterKey = SecurityFilter;
    type Draft = NewSecuritySetting;
    type Patch = SecuritySettingPatch;

    const RESOURCE: &'static str = "security settings";
    const ENDPOINT: &'static str = "security-settings/";
    const TITLE: &'static str = "Security Settings";

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.value.to_string(),
            self.description.clone(),
        ]
    }

    fn compare(&self, other: &Self, key: SecuritySortKey) -> Ordering {
        match key {
            SecuritySortKey::Id => self.id.cmp(&other.id),
            SecuritySortKey::Name => self.name.cmp(&other.name),
            SecuritySortKey::Value => self.value.to_string().cmp(&other.value.to_string()),
        }
    }

    fn default_sort_key() -> SecuritySortKey {
        SecuritySortKey::Id
    }

    fn filter_value(&self, key: SecurityFilter) -> Option<String> {
        match key {
            SecurityFilter::Name => Some(self.name.clone()),
        }
    }

    fn export_columns() -> &'static [&'static str] {
        &["ID", "Name", "Value", "Description"]
    }

    fn export_row(&self) -> Vec<String> {
        self.search_fields()
    }

    fn validate_draft(draft: &NewSecuritySetting) -> Result<()> {
        if draft.name.trim().is_empty() {
            return Err(Error::invalid_argument("setting name cannot be empty"));
        }
        if draft.value.to_string().trim().is_empty() {
            return Err(Error::invalid_argument("setting value cannot be empty"));
        }
        Ok(())
    }
}

/// The security policy read from a list of settings.
///
/// ```rust
/// use staffdesk::{SecuritySetting, SecuritySettings, SettingValue};
/// use std::time::Duration;
///
/// let settings = vec![SecuritySetting {
///     id: 1,
///     name: "SessionTimeout".into(),
///     value: SettingValue::Text("45".into()),
///     description: String::new(),
/// }];
/// let policy = SecuritySettings::new(&settings);
/// assert!(!policy.two_factor_enabled());
/// assert_eq!(policy.session_timeout(), Duration::from_secs(45 * 60));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SecuritySettings<'a> {
    settings: &'a [SecuritySetting],
}

impl<'a> SecuritySettings<'a> {
    /// Wraps a settings list, typically a controller's collection.
    pub fn new(settings: &'a [SecuritySetting]) -> Self {
        Self { settings }
    }

    /// Finds a setting by exact name.
    pub fn get(&self, name: &str) -> Option<&'a SecuritySetting> {
        self.settings.iter().find(|setting| setting.name == name)
    }

    /// Whether two-factor authentication is on. Off when the setting is absent.
    pub fn two_factor_enabled(&self) -> bool {
        self.get(TWO_FACTOR_SETTING)
            .is_some_and(SecuritySetting::as_bool)
    }

    /// Session timeout, [`DEFAULT_SESSION_TIMEOUT`] when absent, zero or unparsable.
    pub fn session_timeout(&self) -> Duration {
        self.get(SESSION_TIMEOUT_SETTING)
            .and_then(SecuritySetting::as_minutes)
            .filter(|minutes| *minutes > 0)
            .map(|minutes| Duration::from_secs(minutes * 60))
            .unwrap_or(DEFAULT_SESSION_TIMEOUT)
    }
}
