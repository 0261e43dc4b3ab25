//! Identity, credentials and the permission gate.
//!
//! - [`Role`]: the actor's role; only [`Role::Privileged`] may mutate
//! - [`PermissionGate`]: the single mutation rule every controller consults
//! - [`TokenCredentials`]: the token sent to the data service
//! - [`IdentityProvider`]: source of the current role, with a logout operation
//! - [`Session`]: a logged-in session, created by [`Client::login`](crate::Client::login)
//!
//! ## Example
//!
//! ```rust,ignore
//! use staffdesk::prelude::*;
//!
//! let client = Client::from_env()?;
//! let session = client.login("admin@example.com", "s3cret").await?;
//!
//! let users = client.controller::<User>(session.current_role());
//! users.refresh().await?;
//!
//! session.logout();
//! users.set_role(session.current_role());
//! ```

mod credentials;
mod identity;
mod permission;
mod role;

pub use credentials::{TOKEN_SCHEME, TokenCredentials};
pub use identity::{IdentityProvider, Session, StaticIdentity};
pub use permission::PermissionGate;
pub use role::{PRIVILEGED_ROLE_NAME, Role};
