//! Controllers over the REST service, against a mock data service.

use std::time::Duration;

use staffdesk::{
    Client, CsvEncoder, ErrorKind, InstallationFilter, InstallationRecord, JobStatus,
    NewStockItem, Role, StockFilter, StockItemPatch, StockStatus,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{client_for, init_tracing, stock_item, stock_json, warehouse};

async fn mount_warehouse(server: &MockServer) {
    let body: Vec<serde_json::Value> = warehouse().iter().map(stock_json).collect();
    Mock::given(method("GET"))
        .and(path("/api/stock-equipment/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_refresh_filter_and_export() -> anyhow::Result<()> {
    init_tracing();
    let server = MockServer::start().await;
    mount_warehouse(&server).await;

    let stock = client_for(&server)?.stock_items(Role::Standard);
    assert_eq!(stock.refresh().await?, 7);

    stock.set_filter(StockFilter::Store, "Tunis");
    let csv = String::from_utf8(stock.export_visible(&CsvEncoder::new())?)?;
    assert_eq!(
        csv,
        "ID,Name,Quantity,Status,Store\n\
         1,Water pump,4,Available,Tunis\n\
         3,Pump seal,2,Available,Tunis\n\
         7,Gasket,50,Unavailable,Tunis\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_create_and_update_round_trip() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_warehouse(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/stock-equipment/"))
        .and(body_json(serde_json::json!({
            "name": "Filter",
            "quantity": 12,
            "status": "Available",
            "store": "Sfax"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(stock_json(&stock_item(
            8,
            "Filter",
            12,
            StockStatus::Available,
            "Sfax",
        ))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/stock-equipment/2/"))
        .and(body_json(serde_json::json!({ "status": "Available" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(stock_json(&stock_item(
            2,
            "Valve",
            10,
            StockStatus::Available,
            "Sfax",
        ))))
        .expect(1)
        .mount(&server)
        .await;

    let stock = client_for(&server)?.stock_items(Role::Privileged);
    stock.refresh().await?;

    let created = stock
        .create(NewStockItem {
            name: "Filter".into(),
            quantity: 12,
            status: StockStatus::Available,
            store: "Sfax".into(),
        })
        .await?;
    assert_eq!(created.id, 8);
    assert_eq!(stock.records()[0].id, 8);

    let patch = StockItemPatch {
        status: Some(StockStatus::Available),
        ..Default::default()
    };
    stock.update(2, patch).await?;

    stock.set_filter(StockFilter::Status, "Available");
    assert_eq!(stock.visible_slice().total_matches, 5);
    Ok(())
}

#[tokio::test]
async fn test_bulk_delete_partial_failure_over_http() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_warehouse(&server).await;

    for id in [1, 3] {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/stock-equipment/{id}/")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("DELETE"))
        .and(path("/api/stock-equipment/6/"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "detail": "Not found." })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let stock = client_for(&server)?.stock_items(Role::Privileged);
    stock.refresh().await?;
    stock.set_search("pump");
    stock.select_all();

    let outcome = stock.remove_selected().await?;

    assert_eq!(outcome.failed_ids(), vec![&6]);
    let remaining: Vec<i64> = stock.records().iter().map(|r| r.id).collect();
    assert_eq!(remaining, vec![2, 4, 5, 6, 7]);
    assert_eq!(stock.selection().into_iter().collect::<Vec<_>>(), vec![6]);
    assert!(stock.last_error().is_some_and(|e| e.contains("1 of 3")));
    Ok(())
}

#[tokio::test]
async fn test_standard_role_sends_no_mutation() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_warehouse(&server).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let stock = client_for(&server)?.stock_items(Role::Standard);
    stock.refresh().await?;

    let err = stock.remove(1).await.unwrap_err();
    assert!(err.is_permission_denied());
    assert_eq!(stock.records().len(), 7);
    Ok(())
}

#[tokio::test]
async fn test_timed_out_create_is_not_resent() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_warehouse(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/stock-equipment/"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(stock_json(&stock_item(
                    8,
                    "Filter",
                    12,
                    StockStatus::Available,
                    "Sfax",
                )))
                .set_delay(Duration::from_millis(400)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder()
        .url(format!("{}/api/", server.uri()))
        .timeout(Duration::from_millis(150))
        .build()?;
    let stock = client.stock_items(Role::Privileged);
    stock.refresh().await?;

    let draft = NewStockItem {
        name: "Filter".into(),
        quantity: 12,
        status: StockStatus::Available,
        store: "Sfax".into(),
    };
    let err = stock.create(draft).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(stock.records().len(), 7);
    assert!(stock.last_error().is_some());
    Ok(())
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_collection() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stock-equipment/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![stock_json(&warehouse()[0])]))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stock-equipment/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let stock = client_for(&server)?.stock_items(Role::Standard);
    stock.refresh().await?;

    let err = stock.refresh().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert_eq!(stock.records().len(), 1);
    assert!(stock.last_error().is_some());
    assert!(!stock.is_pending());
    Ok(())
}

#[tokio::test]
async fn test_installations_from_paginated_envelope() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/installations/"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 2,
            "next": null,
            "results": [
                {
                    "id": 10, "client": "Hotel Amilcar", "technician": "amina",
                    "address": "Carthage", "kind": "Installation", "status": "Scheduled",
                    "scheduled_for": "2024-03-01"
                },
                {
                    "id": 11, "client": "Clinique du Lac", "technician": "karim",
                    "address": "Tunis", "kind": "Maintenance", "status": "Completed"
                }
            ]
        })))
        .mount(&server)
        .await;

    let jobs = client_for(&server)?.installations(Role::Standard);
    jobs.refresh().await?;
    jobs.set_filter(InstallationFilter::Status, JobStatus::Completed.to_string());

    let visible: Vec<InstallationRecord> = jobs.visible_slice().records;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].client, "Clinique du Lac");
    Ok(())
}

#[tokio::test]
async fn test_users_refresh_tolerates_blank_last_login() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "username": "amina", "email": "amina@example.com",
             "user_type": "Technicien", "last_login": ""},
            {"id": 2, "username": "karim", "email": "karim@example.com",
             "user_type": "Client", "last_login": "2024-03-01T08:30:00"}
        ])))
        .mount(&server)
        .await;

    let users = client_for(&server)?.users(Role::Standard);
    assert_eq!(users.refresh().await?, 2);
    assert!(users.records()[0].last_login.is_none());
    assert!(users.records()[1].last_login.is_some());
    Ok(())
}
