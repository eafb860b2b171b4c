use actix_web::{HttpRequest, HttpResponse, get, post, web};
use payloads::requests;

use crate::store::ClinicStore;

use super::{APIError, authenticate, payload};

#[tracing::instrument(
    skip(request, store),
    fields(user_id = tracing::field::Empty),
    err(Display),
)]
#[get("/vaccine-lots")]
pub async fn list_vaccine_lots(
    request: HttpRequest,
    store: web::Data<ClinicStore>,
) -> Result<HttpResponse, APIError> {
    let account = authenticate(&request, &store)?;
    Ok(payload(store.lots(&account)?))
}

#[tracing::instrument(
    skip(request, store),
    fields(user_id = tracing::field::Empty),
    err(Display),
)]
#[post("/inventory-slips")]
pub async fn create_inventory_slip(
    request: HttpRequest,
    details: web::Json<requests::CreateInventorySlip>,
    store: web::Data<ClinicStore>,
) -> Result<HttpResponse, APIError> {
    let account = authenticate(&request, &store)?;
    Ok(payload(store.create_inventory_slip(&account, &details)?))
}
