//! The staffdesk client: one connection to the data service, many controllers.
//!
//! - [`Client`]: owns the HTTP connection and the token, hands out typed
//!   services and controllers
//! - [`ClientBuilder`]: typestate builder, the URL is required
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use staffdesk::prelude::*;
//!
//! let client = Client::builder()
//!     .url("http://127.0.0.1:8000/api/")
//!     .build()?;
//!
//! let session = client.login("admin@example.com", "s3cret").await?;
//! let users = client.users(session.current_role());
//! users.refresh().await?;
//! ```

mod builder;
mod inner;

pub use builder::{ClientBuilder, HasUrl, NoUrl};

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::{PermissionGate, Role, Session, TokenCredentials};
use crate::config::ControllerConfig;
use crate::controller::ResourceController;
use crate::error::{Error, MutationError, Result};
use crate::transport::{RestService, RestTransport};
use crate::types::{
    AuthLogEntry, ConnectionEntry, InstallationRecord, Record, SecuritySetting, StockItem, User,
};

/// API root used by [`Client::from_env`] when `STAFFDESK_URL` is unset.
pub const DEFAULT_URL: &str = "http://127.0.0.1:8000/api/";

/// Environment variable holding the API root.
pub const ENV_URL: &str = "STAFFDESK_URL";
/// Environment variable holding an existing token.
pub const ENV_TOKEN: &str = "STAFFDESK_TOKEN";
/// Environment variable holding the controller page size.
pub const ENV_PAGE_SIZE: &str = "STAFFDESK_PAGE_SIZE";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "STAFFDESK_TIMEOUT_SECS";

const LOGIN_PATH: &str = "auth/login/";
const API_KEY_PATH: &str = "generate-api-key/";

/// The staffdesk client.
///
/// Create one with [`Client::builder()`] or [`Client::from_env()`], then ask
/// it for a controller per resource. Every service and controller created
/// from one client shares its connection pool and its token, so a
/// [`login`](Client::login) or a logout takes effect everywhere.
///
/// ## Thread Safety
///
/// `Client` is `Clone` and thread-safe.
#[derive(Clone)]
pub struct Client {
    inner: Arc<inner::ClientInner>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default, alias = "user_type")]
    role: Option<String>,
}

#[derive(Deserialize)]
struct ApiKeyResponse {
    key: String,
}

impl Client {
    /// Creates a new client builder.
    pub fn builder() -> ClientBuilder<NoUrl> {
        ClientBuilder::new()
    }

    /// Builds a client from `STAFFDESK_*` environment variables.
    ///
    /// | Variable                 | Default                        |
    /// |--------------------------|--------------------------------|
    /// | `STAFFDESK_URL`          | `http://127.0.0.1:8000/api/`   |
    /// | `STAFFDESK_TOKEN`        | none (log in later)            |
    /// | `STAFFDESK_PAGE_SIZE`    | 5                              |
    /// | `STAFFDESK_TIMEOUT_SECS` | 30                             |
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::Configuration` if a variable is set but does not
    /// parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// [`from_env`](Client::from_env) over an arbitrary variable source.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = lookup(ENV_URL).unwrap_or_else(|| DEFAULT_URL.to_string());
        let mut builder = Client::builder().url(url);

        if let Some(token) = lookup(ENV_TOKEN).filter(|t| !t.is_empty()) {
            builder = builder.credentials(token);
        }
        if let Some(page_size) = parse_var::<usize>(&lookup, ENV_PAGE_SIZE)? {
            builder = builder.controller_config(ControllerConfig::builder().page_size(page_size).build());
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_TIMEOUT_SECS)? {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Returns the API root.
    pub fn url(&self) -> &str {
        self.inner.transport.base_url().as_str()
    }

    /// Returns the token slot shared by every service of this client.
    pub fn credentials(&self) -> &TokenCredentials {
        self.inner.transport.credentials()
    }

    /// Returns the configuration new controllers are created with.
    pub fn controller_config(&self) -> &ControllerConfig {
        &self.inner.controller_config
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &RestTransport {
        &self.inner.transport
    }

    /// Returns a typed service for record type `R`.
    pub fn service<R: Record>(&self) -> RestService<R> {
        RestService::new(self.inner.transport.clone())
    }

    /// Returns a new controller for record type `R`, acting as `role`.
    ///
    /// Each call creates an independent controller with an empty collection;
    /// call [`refresh`](ResourceController::refresh) to load it.
    pub fn controller<R: Record>(&self, role: Role) -> ResourceController<R> {
        ResourceController::new(self.service::<R>(), role, self.inner.controller_config.clone())
    }

    /// Controller for staff accounts.
    pub fn users(&self, role: Role) -> ResourceController<User> {
        self.controller(role)
    }

    /// Controller for installation and maintenance jobs.
    pub fn installations(&self, role: Role) -> ResourceController<InstallationRecord> {
        self.controller(role)
    }

    /// Controller for stock and equipment.
    pub fn stock_items(&self, role: Role) -> ResourceController<StockItem> {
        self.controller(role)
    }

    /// Controller for security settings.
    pub fn security_settings(&self, role: Role) -> ResourceController<SecuritySetting> {
        self.controller(role)
    }

    /// Controller for the authentication log. Read-only.
    pub fn auth_logs(&self, role: Role) -> ResourceController<AuthLogEntry> {
        self.controller(role)
    }

    /// Controller for the connection history. Read-only.
    pub fn connections(&self, role: Role) -> ResourceController<ConnectionEntry> {
        self.controller(role)
    }

    /// Logs in and stores the returned token for every service of this client.
    ///
    /// The role comes from the `role` (or `user_type`) field of the response;
    /// a response without one yields [`Role::Standard`].
    ///
    /// # Errors
    ///
    /// Returns the service error, typically `ErrorKind::Unauthorized` or
    /// `ErrorKind::InvalidArgument` for wrong credentials. The stored token
    /// is left untouched on failure.
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let response: LoginResponse = self
            .inner
            .transport
            .post(LOGIN_PATH, &LoginRequest { email, password })
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "login failed"))?;

        if response.token.is_empty() {
            return Err(Error::unauthorized("login response carried an empty token"));
        }

        let role = response.role.as_deref().map(Role::from_name).unwrap_or_default();
        self.credentials().set(response.token);
        tracing::debug!(%role, "logged in");

        Ok(Session::new(self.credentials().clone(), role))
    }

    /// Asks the data service for a new API key.
    ///
    /// This is a mutation: a standard role is refused before any request.
    #[tracing::instrument(skip_all)]
    pub async fn generate_api_key(&self, role: Role) -> std::result::Result<String, MutationError> {
        PermissionGate::check(role, "generate", "API keys").inspect_err(|denied| {
            tracing::warn!(%denied, "mutation refused");
        })?;

        let response: ApiKeyResponse = self
            .inner
            .transport
            .post(API_KEY_PATH, &serde_json::json!({}))
            .await?;
        tracing::debug!("API key generated");
        Ok(response.key)
    }

    pub(crate) fn from_inner(inner: inner::ClientInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.url())
            .field("credentials", self.credentials())
            .finish_non_exhaustive()
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::configuration(format!("{} must be a number, got {:?}: {}", name, raw, e))),
    }
}
