pub mod appointments;
pub mod auth;
pub mod catalog;
pub mod inventory;
pub mod plans;
pub mod statistics;

use actix_web::{
    HttpRequest, HttpResponse, Responder, ResponseError, body::BoxBody,
    dev::HttpServiceFactory,
    get,
    http::{StatusCode, header},
    web,
};
use payloads::responses::Envelope;
use serde::Serialize;
use serde_json::{Value, json};

use crate::store::{Account, ClinicStore, StoreError};

pub fn api_services() -> impl HttpServiceFactory {
    web::scope("/api")
        .service(health_check)
        .service(auth::login)
        .service(auth::refresh)
        .service(auth::logout)
        .service(auth::current_user)
        .service(catalog::list_services)
        .service(catalog::list_vaccines)
        .service(appointments::list_appointments)
        .service(appointments::register_appointment)
        .service(appointments::approve_appointment)
        .service(appointments::cancel_appointment)
        .service(appointments::create_payment)
        .service(plans::record_dose)
        .service(plans::list_vaccination_plans)
        .service(inventory::list_vaccine_lots)
        .service(inventory::create_inventory_slip)
        .service(statistics::overview)
}

#[get("/health_check")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("healthy")
}

#[derive(Debug, thiserror::Error)]
pub enum APIError {
    #[error("Authentication failed")]
    AuthError(#[source] anyhow::Error),
    #[error("Forbidden")]
    Forbidden(#[source] anyhow::Error),
    #[error("Bad request")]
    BadRequest(#[source] anyhow::Error),
    #[error("One or more validation errors occurred.")]
    Validation(String),
    #[error("Not found")]
    NotFound(#[source] anyhow::Error),
    /// A canned response queued with [`ClinicStore::script_response`].
    #[error("Scripted response")]
    Scripted(u16, Value),
    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl ResponseError for APIError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::AuthError(e) => {
                HttpResponse::Unauthorized().body(format!("{self}: {e}"))
            }
            Self::Forbidden(e) => {
                HttpResponse::Forbidden().body(format!("{self}: {e}"))
            }
            Self::BadRequest(e) => {
                HttpResponse::BadRequest().body(format!("{self}: {e}"))
            }
            // problem-details shape, as the real backend's model validation
            Self::Validation(message) => HttpResponse::BadRequest().json(json!({
                "title": self.to_string(),
                "status": 400,
                "errors": { "request": [message] },
            })),
            Self::NotFound(e) => {
                HttpResponse::NotFound().body(format!("{self}: {e}"))
            }
            Self::Scripted(status, body) => HttpResponse::build(
                StatusCode::from_u16(*status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            )
            .json(body),
            Self::UnexpectedError(_) => {
                HttpResponse::InternalServerError().body(self.to_string())
            }
        }
    }
}

impl From<StoreError> for APIError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidCredentials | StoreError::InvalidToken => {
                APIError::AuthError(e.into())
            }
            StoreError::Forbidden(_) => APIError::Forbidden(e.into()),
            StoreError::Validation(message) => APIError::Validation(message),
            StoreError::AccountNotFound => APIError::AuthError(e.into()),
            StoreError::ServiceNotFound
            | StoreError::AppointmentNotFound
            | StoreError::PlanNotFound
            | StoreError::LotNotFound => APIError::NotFound(e.into()),
            _ => APIError::BadRequest(e.into()),
        }
    }
}

/// Wrap a successful result in the `{"payload": ...}` envelope.
fn payload<T: Serialize>(value: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope { payload: value })
}

fn bearer_token(request: &HttpRequest) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the caller from its bearer token. Every protected route goes
/// through here, so this is also where hits are counted and scripted
/// responses are served.
fn authenticate(
    request: &HttpRequest,
    store: &ClinicStore,
) -> Result<Account, APIError> {
    store.record_hit(request.path());
    if let Some((status, body)) = store.next_scripted() {
        return Err(APIError::Scripted(status, body));
    }
    let token = bearer_token(request).ok_or_else(|| {
        APIError::AuthError(anyhow::anyhow!("Missing bearer token"))
    })?;
    let account = store.authenticate(token)?;
    // recorded here, but attaches to the span of the route itself
    tracing::Span::current()
        .record("user_id", tracing::field::display(&account.user.id));
    Ok(account)
}
