use actix_web::{HttpRequest, HttpResponse, get, post, web};
use payloads::{requests, responses};

use crate::store::ClinicStore;

use super::{APIError, authenticate, bearer_token, payload};

#[tracing::instrument(
    skip(credentials, store),
    fields(email = %credentials.email, user_id = tracing::field::Empty),
    err(Display),
)]
#[post("/auth/login")]
pub async fn login(
    request: HttpRequest,
    credentials: web::Json<requests::LoginCredentials>,
    store: web::Data<ClinicStore>,
) -> Result<HttpResponse, APIError> {
    store.record_hit(request.path());
    credentials.validate().map_err(APIError::Validation)?;

    let (account, access_token, refresh_token) = store.login(&credentials)?;
    tracing::Span::current()
        .record("user_id", tracing::field::display(&account.user.id));
    Ok(payload(responses::LoginResponse {
        access_token,
        refresh_token,
        user: account.user,
    }))
}

#[tracing::instrument(skip(body, store), err(Display))]
#[post("/auth/refresh")]
pub async fn refresh(
    request: HttpRequest,
    body: web::Json<requests::RefreshToken>,
    store: web::Data<ClinicStore>,
) -> Result<HttpResponse, APIError> {
    store.record_hit(request.path());
    let tokens = store.refresh(&body.refresh_token)?;
    Ok(payload(responses::RefreshResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// Always succeeds; an unknown or missing token just has nothing to revoke.
#[tracing::instrument(skip(store))]
#[post("/auth/logout")]
pub async fn logout(
    request: HttpRequest,
    store: web::Data<ClinicStore>,
) -> HttpResponse {
    store.record_hit(request.path());
    if let Some(token) = bearer_token(&request) {
        store.logout(token);
    }
    HttpResponse::Ok().finish()
}

#[tracing::instrument(
    skip(request, store),
    fields(user_id = tracing::field::Empty),
    err(Display),
)]
#[get("/auth/me")]
pub async fn current_user(
    request: HttpRequest,
    store: web::Data<ClinicStore>,
) -> Result<HttpResponse, APIError> {
    let account = authenticate(&request, &store)?;
    Ok(payload(account.user))
}
