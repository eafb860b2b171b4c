use payloads::{
    AccessLevel, ClientError, CredentialStore, Resource, Role, requests,
};
use reqwest::StatusCode;

use test_helpers::{assert_status_code, mock, spawn_app};

#[tokio::test]
async fn login_stores_credentials() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let user = app.login_manager().await?;
    assert_eq!(user.role, Role::Manager);
    assert_eq!(user.id, app.dataset.manager.id);

    assert!(app.credentials.access_token().is_some());
    assert!(app.credentials.refresh_token().is_some());
    assert_eq!(app.credentials.user_id(), Some(user.id));

    Ok(())
}

#[tokio::test]
async fn login_refused() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let body = requests::LoginCredentials {
        email: mock::MANAGER_EMAIL.into(),
        password: "not-the-password".into(),
    };
    let result = app.client.login(&body).await;

    match result {
        Err(ClientError::APIError(code, text)) => {
            assert_eq!(code, StatusCode::UNAUTHORIZED);
            assert_eq!(text, "Authentication failed: Invalid credentials");
        }
        other => panic!("Expected APIError, got {other:?}"),
    }
    // bad credentials are not an expired session
    assert_eq!(app.hits("auth/refresh"), 0);
    assert!(!app.credentials.has_session());

    Ok(())
}

#[tokio::test]
async fn malformed_login_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let body = requests::LoginCredentials {
        email: "not-an-email".into(),
        password: mock::PASSWORD.into(),
    };
    let result = app.client.login(&body).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn current_user_matches_login() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let logged_in = app.login_doctor().await?;
    let user = app.client.current_user().await?;
    assert_eq!(user, logged_in);
    assert!(user.permissions.codes().contains(&"LichHen_ALL".to_string()));

    Ok(())
}

#[tokio::test]
async fn current_user_picks_up_new_permissions() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let logged_in = app.login_doctor().await?;
    let statistics = |user: &payloads::UserInfo| {
        user.permissions.allows(&Resource::ThongKe, AccessLevel::View)
    };
    assert!(!statistics(&logged_in));

    app.store.with_state(|state| {
        let account = state
            .accounts
            .iter_mut()
            .find(|account| account.user.id == logged_in.id)
            .expect("doctor account is seeded");
        account
            .user
            .permissions
            .grant(Resource::ThongKe, AccessLevel::View);
    });

    // same session, no new sign-in
    let user = app.client.current_user().await?;
    assert_eq!(user.id, logged_in.id);
    assert!(statistics(&user));
    assert_eq!(app.hits("auth/refresh"), 0);

    Ok(())
}

#[tokio::test]
async fn anonymous_request_is_session_expired() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let result = app.client.current_user().await;
    assert!(matches!(result, Err(ClientError::SessionExpired)));
    // nothing to refresh with, so the refresh endpoint is never called
    assert_eq!(app.hits("auth/refresh"), 0);

    Ok(())
}

#[tokio::test]
async fn resume_without_credentials_skips_backend() -> anyhow::Result<()> {
    let app = spawn_app().await;

    assert_eq!(app.client.resume_session().await?, None);
    assert_eq!(app.hits("auth/me"), 0);

    Ok(())
}

#[tokio::test]
async fn resume_picks_up_existing_session() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let user = app.login_customer().await?;
    assert_eq!(app.client.resume_session().await?, Some(user));

    Ok(())
}

#[tokio::test]
async fn resume_with_dead_session_is_anonymous() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.login_customer().await?;
    app.expire_access_tokens();
    app.store.revoke_refresh_tokens();

    assert_eq!(app.client.resume_session().await?, None);
    assert!(!app.credentials.has_session());
    assert_eq!(app.credentials.user_id(), None);

    Ok(())
}

#[tokio::test]
async fn logout_clears_credentials() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.login_manager().await?;
    let access_token = app.credentials.access_token();
    app.client.logout().await?;

    assert!(!app.credentials.has_session());
    assert_eq!(app.credentials.user_id(), None);

    // the backend revoked the token too
    let token = access_token.expect("token stored at login");
    assert!(app.store.authenticate(&token).is_err());

    Ok(())
}
