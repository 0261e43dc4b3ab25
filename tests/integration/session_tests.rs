//! Login, logout and the role flowing into controllers.

use staffdesk::{ErrorKind, IdentityProvider, Role, UserPatch};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{client_for, init_tracing};

fn users_body() -> serde_json::Value {
    serde_json::json!([
        {
            "id": 1, "username": "amina", "email": "amina@example.com",
            "user_type": "Technicien", "is_blocked": false,
            "last_login": "2024-02-10T09:15:00Z"
        },
        {
            "id": 2, "username": "karim", "email": "karim@example.com",
            "user_type": "Commerçant", "is_blocked": true
        }
    ])
}

#[tokio::test]
async fn test_login_then_mutate_then_logout() -> anyhow::Result<()> {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "token": "tok-admin", "role": "Admin" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/"))
        .and(header("authorization", "Token tok-admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/users/2/"))
        .and(header("authorization", "Token tok-admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 2, "username": "karim", "email": "karim@example.com",
            "user_type": "Commerçant", "is_blocked": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server)?;
    let session = client.login("admin@example.com", "s3cret").await?;
    assert_eq!(session.current_role(), Role::Privileged);

    let users = client.users(session.current_role());
    users.refresh().await?;

    let karim = users.records()[1].clone();
    let updated = users.update(karim.id, UserPatch::toggle_block(&karim)).await?;
    assert!(!updated.is_blocked);
    assert!(!users.records()[1].is_blocked);

    session.logout();
    users.set_role(session.current_role());

    let err = users.remove(1).await.unwrap_err();
    assert!(err.is_permission_denied());
    assert!(!client.credentials().is_authenticated());
    Ok(())
}

#[tokio::test]
async fn test_expired_token_surfaces_unauthorized() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/connections/"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "detail": "Invalid token." })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server)?;
    client.credentials().set("stale");
    let connections = client.connections(Role::Privileged);

    let err = connections.refresh().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert!(connections.last_error().is_some_and(|e| e.contains("Invalid token.")));
    Ok(())
}
