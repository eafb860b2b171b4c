use actix_web::{HttpRequest, HttpResponse, get, post, web};
use payloads::requests;

use crate::store::ClinicStore;

use super::{APIError, authenticate, payload};

#[tracing::instrument(
    skip(request, store),
    fields(user_id = tracing::field::Empty),
    err(Display),
)]
#[get("/vaccination-plans")]
pub async fn list_vaccination_plans(
    request: HttpRequest,
    filter: web::Query<requests::PlanFilter>,
    store: web::Data<ClinicStore>,
) -> Result<HttpResponse, APIError> {
    let account = authenticate(&request, &store)?;
    Ok(payload(store.vaccination_plans(&account, &filter)?))
}

#[tracing::instrument(
    skip(request, store),
    fields(user_id = tracing::field::Empty),
    err(Display),
)]
#[post("/vaccination-plans/doses")]
pub async fn record_dose(
    request: HttpRequest,
    details: web::Json<requests::RecordDose>,
    store: web::Data<ClinicStore>,
) -> Result<HttpResponse, APIError> {
    let account = authenticate(&request, &store)?;
    Ok(payload(store.record_dose(&account, &details)?))
}
