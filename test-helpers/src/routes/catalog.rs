use actix_web::{HttpRequest, HttpResponse, get, web};

use crate::store::ClinicStore;

use super::{APIError, authenticate, payload};

#[tracing::instrument(
    skip(request, store),
    fields(user_id = tracing::field::Empty),
)]
#[get("/services")]
pub async fn list_services(
    request: HttpRequest,
    store: web::Data<ClinicStore>,
) -> Result<HttpResponse, APIError> {
    authenticate(&request, &store)?;
    Ok(payload(store.services()))
}

#[tracing::instrument(
    skip(request, store),
    fields(user_id = tracing::field::Empty),
)]
#[get("/vaccines")]
pub async fn list_vaccines(
    request: HttpRequest,
    store: web::Data<ClinicStore>,
) -> Result<HttpResponse, APIError> {
    authenticate(&request, &store)?;
    Ok(payload(store.vaccines()))
}
