use payloads::responses;
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::{FetchHookReturn, use_fetch, use_session};

/// Hook to fetch the bookable vaccination services
#[hook]
pub fn use_services() -> FetchHookReturn<Vec<responses::Service>> {
    let session = use_session();
    use_fetch((), move || {
        let session = session.clone();
        async move { session.observe(get_api_client().list_services().await) }
    })
}

/// Hook to fetch the vaccine catalogue
#[hook]
pub fn use_vaccines() -> FetchHookReturn<Vec<responses::Vaccine>> {
    let session = use_session();
    use_fetch((), move || {
        let session = session.clone();
        async move { session.observe(get_api_client().list_vaccines().await) }
    })
}
