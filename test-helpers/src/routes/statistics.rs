use actix_web::{HttpRequest, HttpResponse, get, web};
use payloads::requests;

use crate::store::ClinicStore;

use super::{APIError, authenticate, payload};

#[tracing::instrument(
    skip(request, store),
    fields(user_id = tracing::field::Empty),
    err(Display),
)]
#[get("/statistics/overview")]
pub async fn overview(
    request: HttpRequest,
    range: web::Query<requests::StatisticsRange>,
    store: web::Data<ClinicStore>,
) -> Result<HttpResponse, APIError> {
    let account = authenticate(&request, &store)?;
    Ok(payload(store.statistics(&account, &range)?))
}
