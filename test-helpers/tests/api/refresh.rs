use payloads::{ClientError, CredentialStore};
use reqwest::StatusCode;
use serde_json::json;

use test_helpers::spawn_app;

#[tokio::test]
async fn expired_access_token_is_refreshed_once() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let user = app.login_manager().await?;
    let stale_token = app.credentials.access_token();
    let refresh_token = app.credentials.refresh_token();
    app.expire_access_tokens();

    assert_eq!(app.client.current_user().await?, user);

    assert_eq!(app.hits("auth/refresh"), 1);
    // the original attempt and exactly one retry
    assert_eq!(app.hits("auth/me"), 2);
    assert_ne!(app.credentials.access_token(), stale_token);
    // not rotated by default
    assert_eq!(app.credentials.refresh_token(), refresh_token);

    // the new token works without another refresh
    app.client.current_user().await?;
    assert_eq!(app.hits("auth/refresh"), 1);
    assert_eq!(app.hits("auth/me"), 3);

    Ok(())
}

#[tokio::test]
async fn rotated_refresh_token_is_stored() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.login_doctor().await?;
    app.store.with_state(|state| state.rotate_refresh_tokens = true);
    let refresh_token = app.credentials.refresh_token();
    app.expire_access_tokens();

    app.client.list_services().await?;

    let rotated = app.credentials.refresh_token();
    assert!(rotated.is_some());
    assert_ne!(rotated, refresh_token);

    Ok(())
}

#[tokio::test]
async fn failed_refresh_expires_session() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.login_manager().await?;
    app.expire_access_tokens();
    app.store.revoke_refresh_tokens();

    let result = app.client.list_services().await;
    assert!(matches!(result, Err(ClientError::SessionExpired)));
    assert_eq!(
        result.unwrap_err().to_string(),
        "Your session has expired. Please sign in again."
    );

    assert_eq!(app.hits("auth/refresh"), 1);
    assert_eq!(app.hits("services"), 1);
    assert!(!app.credentials.has_session());
    assert_eq!(app.credentials.access_token(), None);
    assert_eq!(app.credentials.refresh_token(), None);
    assert_eq!(app.credentials.user_id(), None);

    Ok(())
}

#[tokio::test]
async fn second_unauthorized_is_returned_as_is() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.login_manager().await?;
    for _ in 0..2 {
        app.store.script_response(
            StatusCode::UNAUTHORIZED,
            json!({ "message": "Token rejected" }),
        );
    }

    let result = app.client.current_user().await;
    match result {
        Err(ClientError::APIError(code, message)) => {
            assert_eq!(code, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Token rejected");
        }
        other => panic!("Expected APIError, got {other:?}"),
    }

    // one refresh, one retry, and the session is left alone
    assert_eq!(app.hits("auth/refresh"), 1);
    assert_eq!(app.hits("auth/me"), 2);
    assert!(app.credentials.has_session());

    Ok(())
}

#[tokio::test]
async fn other_errors_do_not_refresh() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.login_customer().await?;
    app.store
        .script_response(StatusCode::FORBIDDEN, json!({ "title": "Nope" }));

    match app.client.list_vaccine_lots().await {
        Err(ClientError::APIError(code, message)) => {
            assert_eq!(code, StatusCode::FORBIDDEN);
            assert_eq!(message, "Nope");
        }
        other => panic!("Expected APIError, got {other:?}"),
    }
    assert_eq!(app.hits("auth/refresh"), 0);

    Ok(())
}
