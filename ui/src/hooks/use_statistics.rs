use payloads::{requests, responses};
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::{FetchHookReturn, use_fetch, use_session};

#[hook]
pub fn use_statistics(
    range: requests::StatisticsRange,
) -> FetchHookReturn<responses::StatisticsOverview> {
    let session = use_session();
    use_fetch(range.clone(), move || {
        let session = session.clone();
        let range = range.clone();
        async move {
            session.observe(get_api_client().statistics_overview(&range).await)
        }
    })
}
