//! Controllers driven end-to-end over the in-memory service.

use std::collections::BTreeSet;

use staffdesk::testing::InMemoryService;
use staffdesk::{
    AuthAction, AuthLogEntry, AuthLogFilter, AuthLogSortKey, BulkOutcome, ControllerConfig,
    ErrorKind, JsonEncoder, NewUser, ResourceController, Role, SecuritySetting, SecuritySettings,
    SettingValue, SortOrder, StockFilter, StockItem, StockSortKey, User, UserFilter, UserPatch,
    UserSortKey, UserType,
};

use crate::common::{auth_log, init_tracing, user, user_service, warehouse};

fn stock_controller(role: Role) -> (ResourceController<StockItem>, InMemoryService<StockItem>) {
    let service = InMemoryService::new().with_records(warehouse());
    let controller = ResourceController::new(service.clone(), role, ControllerConfig::default());
    (controller, service)
}

#[tokio::test]
async fn test_filter_after_paging_lands_on_first_page() -> anyhow::Result<()> {
    init_tracing();
    let (stock, _) = stock_controller(Role::Standard);
    stock.refresh().await?;

    assert_eq!(stock.go_to_page(2), 2);
    stock.set_filter(StockFilter::Status, "Available");

    let snapshot = stock.snapshot();
    assert_eq!(snapshot.total_matches, 3);
    assert_eq!(snapshot.total_pages, 1);
    assert_eq!(snapshot.current_page, 1);

    stock.set_filter(StockFilter::Status, "");
    assert_eq!(stock.visible_slice().total_matches, 7);
    Ok(())
}

#[tokio::test]
async fn test_search_sort_select_all_then_bulk_remove() -> anyhow::Result<()> {
    init_tracing();
    let (stock, service) = stock_controller(Role::Privileged);
    stock.refresh().await?;

    stock.set_search("pump");
    stock.set_sort(StockSortKey::Quantity);
    let names: Vec<String> = stock.visible_slice().records.into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["Booster pump", "Pump seal", "Water pump"]);

    stock.select_all();
    assert_eq!(stock.selection(), BTreeSet::from([1, 3, 6]));

    let outcome = stock.remove_selected().await?;
    assert!(outcome.is_success());
    assert_eq!(service.len(), 4);
    assert!(stock.selection().is_empty());
    assert_eq!(stock.visible_slice().total_matches, 0);
    Ok(())
}

#[tokio::test]
async fn test_standard_role_sees_but_cannot_touch() -> anyhow::Result<()> {
    let (stock, service) = stock_controller(Role::Standard);
    stock.refresh().await?;
    let requests = service.request_count();

    stock.select_all();
    let err = stock.remove_selected().await.unwrap_err();

    assert!(err.is_permission_denied());
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert_eq!(service.request_count(), requests);
    assert_eq!(service.len(), 7);
    assert_eq!(stock.records().len(), 7);
    assert_eq!(stock.selection().len(), 7);
    Ok(())
}

#[tokio::test]
async fn test_bulk_remove_reports_each_failure() -> anyhow::Result<()> {
    let (stock, service) = stock_controller(Role::Privileged);
    stock.refresh().await?;
    service.fail_id(4, ErrorKind::Conflict);

    let outcome = stock.bulk_remove([2, 4, 7]).await?;

    let BulkOutcome::PartialFailure { mut succeeded, failed } = outcome else {
        anyhow::bail!("expected a partial failure");
    };
    succeeded.sort_unstable();
    assert_eq!(succeeded, vec![2, 7]);
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0, 4);
    assert_eq!(failed[0].1.kind(), ErrorKind::Conflict);

    let remaining: Vec<i64> = stock.records().iter().map(|r| r.id).collect();
    assert_eq!(remaining, vec![1, 3, 4, 5, 6]);
    assert!(stock.last_error().is_some());

    stock.refresh().await?;
    assert!(stock.last_error().is_none());
    Ok(())
}

#[tokio::test]
async fn test_user_block_toggle_and_filter() -> anyhow::Result<()> {
    let service = user_service(vec![
        user(1, "amina", UserType::Technician, false),
        user(2, "karim", UserType::Client, true),
        user(3, "leila", UserType::Merchant, false),
    ]);
    let users = ResourceController::new(service, Role::Privileged, ControllerConfig::default());
    users.refresh().await?;

    let amina = users.records()[0].clone();
    let updated = users.update(amina.id, UserPatch::toggle_block(&amina)).await?;
    assert!(updated.is_blocked);

    users.set_filter(UserFilter::Blocked, "true");
    users.set_sort(UserSortKey::Username);
    users.set_sort(UserSortKey::Username);
    let blocked: Vec<String> = users.visible_slice().records.into_iter().map(|u| u.username).collect();
    assert_eq!(blocked, vec!["karim", "amina"]);
    assert_eq!(users.sort().order, SortOrder::Descending);
    Ok(())
}

#[tokio::test]
async fn test_user_draft_validation_precedes_service() -> anyhow::Result<()> {
    let service = user_service(Vec::new());
    let users: ResourceController<User> =
        ResourceController::new(service.clone(), Role::Privileged, ControllerConfig::default());

    let err = users.create(NewUser::new("", "nobody@example.com", UserType::Client)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(service.request_count(), 0);

    let created = users.create(NewUser::new("nadia", "nadia@example.com", UserType::Client)).await?;
    assert_eq!(users.records(), vec![created]);
    Ok(())
}

#[tokio::test]
async fn test_security_policy_follows_collection() -> anyhow::Result<()> {
    let service = InMemoryService::new().with_records([
        SecuritySetting {
            id: 1,
            name: "TwoFactorAuth".into(),
            value: SettingValue::Flag(true),
            description: "Require a second factor".into(),
        },
        SecuritySetting {
            id: 2,
            name: "SessionTimeout".into(),
            value: SettingValue::from("15"),
            description: String::new(),
        },
    ]);
    let settings = ResourceController::new(service, Role::Standard, ControllerConfig::default());
    settings.refresh().await?;

    let records = settings.records();
    let policy = SecuritySettings::new(&records);
    assert!(policy.two_factor_enabled());
    assert_eq!(policy.session_timeout().as_secs(), 15 * 60);
    Ok(())
}

#[tokio::test]
async fn test_auth_log_export_covers_every_page() -> anyhow::Result<()> {
    let entries: Vec<AuthLogEntry> = (1..=12)
        .map(|id| {
            let action = if id % 3 == 0 { AuthAction::FailedLogin } else { AuthAction::Login };
            auth_log(id, "amina", action, id as u32)
        })
        .collect();
    let logs = ResourceController::new(
        InMemoryService::new().with_records(entries),
        Role::Standard,
        ControllerConfig::default(),
    );
    logs.refresh().await?;

    logs.set_sort(AuthLogSortKey::Timestamp);
    assert_eq!(logs.sort().order, SortOrder::Descending);
    logs.set_filter(AuthLogFilter::Action, "Failed Login");

    assert_eq!(logs.visible_slice().total_matches, 4);
    let bytes = logs.export_visible(&JsonEncoder::new())?;
    let sheet: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(sheet["title"], "Authentication Logs");
    let ids: Vec<&str> = sheet["rows"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|row| row[0].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec!["12", "9", "6", "3"]);
    Ok(())
}

#[tokio::test]
async fn test_shutdown_discards_in_flight_refresh() -> anyhow::Result<()> {
    let (stock, service) = stock_controller(Role::Privileged);
    service.hold();

    let refresh = tokio::spawn({
        let stock = stock.clone();
        async move { stock.refresh().await }
    });
    tokio::task::yield_now().await;
    assert!(stock.is_pending());

    stock.shutdown();
    service.release();

    assert_eq!(refresh.await?.unwrap_err().kind(), ErrorKind::Cancelled);
    assert!(stock.is_shut_down());
    assert!(stock.records().is_empty());
    Ok(())
}
