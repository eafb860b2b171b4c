use payloads::{requests, responses};
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::{
    ApiHandle, FetchHookReturn, use_api_with_params, use_fetch, use_session,
};

/// Hook to fetch vaccine lots and their stock levels
#[hook]
pub fn use_vaccine_lots() -> FetchHookReturn<Vec<responses::VaccineLot>> {
    let session = use_session();
    use_fetch((), move || {
        let session = session.clone();
        async move {
            session.observe(get_api_client().list_vaccine_lots().await)
        }
    })
}

#[hook]
pub fn use_create_inventory_slip()
-> ApiHandle<responses::InventorySlip, requests::CreateInventorySlip> {
    let session = use_session();
    use_api_with_params(None, move |slip: requests::CreateInventorySlip| {
        let session = session.clone();
        async move {
            session.observe(get_api_client().create_inventory_slip(&slip).await)
        }
    })
}
