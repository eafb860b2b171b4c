mod auth;
mod clinic;
mod envelope;
mod refresh;

use test_helpers::spawn_app;

#[tokio::test]
async fn health_check() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let response = reqwest::get(format!(
        "http://127.0.0.1:{}/api/health_check",
        app.port
    ))
    .await?;
    assert!(response.status().is_success());

    Ok(())
}
