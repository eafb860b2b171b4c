use payloads::{ClientError, envelope::PayloadErrorKind};
use reqwest::StatusCode;
use serde_json::json;

use test_helpers::spawn_app;

#[tokio::test]
async fn payload_is_unwrapped() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_customer().await?;

    let services = app.client.list_services().await?;
    let names: Vec<&str> = services.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Hepatitis B course", "Seasonal flu"]);
    assert_eq!(services[0], app.dataset.hepatitis_service);

    Ok(())
}

#[tokio::test]
async fn error_status_in_ok_body_is_a_failure() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_manager().await?;

    app.store.script_response(
        StatusCode::OK,
        json!({ "status": "error", "message": "Lot is locked" }),
    );
    match app.client.list_vaccine_lots().await {
        Err(ClientError::Payload(e)) => {
            assert_eq!(e.kind, PayloadErrorKind::Failed);
            assert_eq!(e.message, "Lot is locked");
        }
        other => panic!("Expected Payload error, got {other:?}"),
    }

    // the next call is handled normally
    assert_eq!(app.client.list_vaccine_lots().await?.len(), 3);

    Ok(())
}

#[tokio::test]
async fn validation_body_is_flattened() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_manager().await?;

    app.store.script_response(
        StatusCode::OK,
        json!({
            "title": "One or more validation errors occurred.",
            "errors": { "Quantity": ["Must be positive", "Must be whole"] }
        }),
    );
    match app.client.list_vaccines().await {
        Err(ClientError::Payload(e)) => {
            assert_eq!(e.kind, PayloadErrorKind::Validation);
            assert_eq!(e.message, "Must be positive, Must be whole");
        }
        other => panic!("Expected Payload error, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn empty_responses_are_classified_too() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_manager().await?;

    app.store
        .script_response(StatusCode::OK, json!({ "status": 500 }));
    let result = app
        .client
        .cancel_appointment(&app.dataset.pending_appointment.id)
        .await;
    match result {
        Err(ClientError::Payload(e)) => {
            assert_eq!(e.message, "An unexpected error occurred");
        }
        other => panic!("Expected Payload error, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn missing_payload_is_malformed() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_manager().await?;

    app.store
        .script_response(StatusCode::OK, json!({ "data": [] }));
    let result = app.client.list_services().await;
    assert!(matches!(result, Err(ClientError::MalformedResponse(_))));

    Ok(())
}

#[tokio::test]
async fn error_message_comes_from_body() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_manager().await?;

    app.store.script_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "title": "Database unavailable" }),
    );
    match app.client.list_services().await {
        Err(ClientError::APIError(code, message)) => {
            assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, "Database unavailable");
        }
        other => panic!("Expected APIError, got {other:?}"),
    }

    Ok(())
}
