use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use payloads::{AppointmentId, requests};

use crate::store::ClinicStore;

use super::{APIError, authenticate, payload};

#[tracing::instrument(
    skip(request, store),
    fields(user_id = tracing::field::Empty),
    err(Display),
)]
#[get("/appointments")]
pub async fn list_appointments(
    request: HttpRequest,
    filter: web::Query<requests::AppointmentFilter>,
    store: web::Data<ClinicStore>,
) -> Result<HttpResponse, APIError> {
    let account = authenticate(&request, &store)?;
    Ok(payload(store.appointments(&account, &filter)?))
}

#[tracing::instrument(
    skip(request, store),
    fields(user_id = tracing::field::Empty),
    err(Display),
)]
#[post("/appointments")]
pub async fn register_appointment(
    request: HttpRequest,
    details: web::Json<requests::RegisterAppointment>,
    store: web::Data<ClinicStore>,
) -> Result<HttpResponse, APIError> {
    let account = authenticate(&request, &store)?;
    Ok(payload(store.register_appointment(&account, &details)?))
}

#[tracing::instrument(
    skip(request, store),
    fields(user_id = tracing::field::Empty),
    err(Display),
)]
#[put("/appointments/{appointment_id}/approve")]
pub async fn approve_appointment(
    request: HttpRequest,
    path: web::Path<AppointmentId>,
    store: web::Data<ClinicStore>,
) -> Result<HttpResponse, APIError> {
    let account = authenticate(&request, &store)?;
    Ok(payload(store.approve_appointment(&account, &path)?))
}

#[tracing::instrument(
    skip(request, store),
    fields(user_id = tracing::field::Empty),
    err(Display),
)]
#[delete("/appointments/{appointment_id}")]
pub async fn cancel_appointment(
    request: HttpRequest,
    path: web::Path<AppointmentId>,
    store: web::Data<ClinicStore>,
) -> Result<HttpResponse, APIError> {
    let account = authenticate(&request, &store)?;
    store.cancel_appointment(&account, &path)?;
    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(
    skip(request, store),
    fields(user_id = tracing::field::Empty),
    err(Display),
)]
#[post("/payments")]
pub async fn create_payment(
    request: HttpRequest,
    details: web::Json<requests::CreatePayment>,
    store: web::Data<ClinicStore>,
) -> Result<HttpResponse, APIError> {
    let account = authenticate(&request, &store)?;
    Ok(payload(store.create_payment(&account, &details)?))
}
