//! Record types served by the data service.
//!
//! - [`Record`]: the trait a controller is generic over
//! - [`User`], [`InstallationRecord`], [`StockItem`]: editable resources
//! - [`SecuritySetting`]: editable, with [`SecuritySettings`] policy helpers
//! - [`AuthLogEntry`], [`ConnectionEntry`]: read-only history

mod auth_log;
mod connection;
mod installation;
mod record;
mod security;
mod stock;
mod timestamp;
mod user;

pub use auth_log::{AuthAction, AuthLogEntry, AuthLogFilter, AuthLogSortKey};
pub use connection::{ConnectionEntry, ConnectionFilter, ConnectionSortKey};
pub use installation::{
    InstallationFilter, InstallationPatch, InstallationRecord, InstallationSortKey, JobKind,
    JobStatus, NewInstallation,
};
pub use record::{ReadOnly, Record, SortOrder};
pub use security::{
    DEFAULT_SESSION_TIMEOUT, NewSecuritySetting, SESSION_TIMEOUT_SETTING, SecurityFilter,
    SecuritySetting, SecuritySettingPatch, SecuritySettings, SecuritySortKey, SettingValue,
    TWO_FACTOR_SETTING,
};
pub use stock::{NewStockItem, StockFilter, StockItem, StockItemPatch, StockSortKey, StockStatus};
pub use user::{NewUser, User, UserFilter, UserPatch, UserSortKey, UserType};
