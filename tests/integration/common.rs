//! Shared fixtures for the integration suite.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use staffdesk::testing::InMemoryService;
use staffdesk::{
    AuthAction, AuthLogEntry, Client, NewUser, RetryConfig, StockItem, StockStatus, User,
    UserPatch, UserType,
};
use tracing_subscriber::EnvFilter;
use wiremock::MockServer;

/// Installs a test subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Client pointed at the mock server's `/api/` root, retrying quickly.
pub fn client_for(server: &MockServer) -> anyhow::Result<Client> {
    let client = Client::builder()
        .url(format!("{}/api/", server.uri()))
        .retry_config(
            RetryConfig::new()
                .with_max_retries(1)
                .with_initial_delay(Duration::from_millis(1))
                .with_jitter(0.0),
        )
        .timeout(Duration::from_secs(5))
        .build()?;
    Ok(client)
}

pub fn stock_item(id: i64, name: &str, quantity: u32, status: StockStatus, store: &str) -> StockItem {
    StockItem {
        id,
        name: name.to_string(),
        quantity,
        status,
        store: store.to_string(),
    }
}

pub fn stock_json(item: &StockItem) -> serde_json::Value {
    serde_json::to_value(item).unwrap_or_default()
}

/// Seven items, three of them available.
pub fn warehouse() -> Vec<StockItem> {
    vec![
        stock_item(1, "Water pump", 4, StockStatus::Available, "Tunis"),
        stock_item(2, "Valve", 10, StockStatus::Unavailable, "Sfax"),
        stock_item(3, "Pump seal", 2, StockStatus::Available, "Tunis"),
        stock_item(4, "Pipe", 30, StockStatus::Unavailable, "Sousse"),
        stock_item(5, "Meter", 7, StockStatus::Unavailable, "Sfax"),
        stock_item(6, "Booster pump", 1, StockStatus::Available, "Sousse"),
        stock_item(7, "Gasket", 50, StockStatus::Unavailable, "Tunis"),
    ]
}

pub fn user(id: i64, username: &str, user_type: UserType, is_blocked: bool) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        user_type,
        is_blocked,
        status: None,
        last_login: None,
    }
}

/// In-memory user service that assigns ids and applies patches.
pub fn user_service(users: Vec<User>) -> InMemoryService<User> {
    InMemoryService::new()
        .with_records(users)
        .on_create(|seq, draft: &NewUser| User {
            id: seq as i64,
            username: draft.username.clone(),
            email: draft.email.clone(),
            user_type: draft.user_type,
            is_blocked: draft.is_blocked,
            status: None,
            last_login: None,
        })
        .on_update(|user, patch: &UserPatch| User {
            username: patch.username.clone().unwrap_or_else(|| user.username.clone()),
            email: patch.email.clone().unwrap_or_else(|| user.email.clone()),
            user_type: patch.user_type.unwrap_or(user.user_type),
            is_blocked: patch.is_blocked.unwrap_or(user.is_blocked),
            ..user.clone()
        })
}

pub fn auth_log(id: i64, user: &str, action: AuthAction, minute: u32) -> AuthLogEntry {
    AuthLogEntry {
        id,
        user: user.to_string(),
        action,
        timestamp: Utc
            .with_ymd_and_hms(2024, 2, 10, 9, minute, 0)
            .single()
            .unwrap_or_default(),
        ip_address: format!("10.0.0.{id}"),
    }
}
