use payloads::{CustomerId, requests, responses};
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::{
    ApiHandle, FetchHookReturn, use_api_with_params, use_fetch, use_session,
};

/// Hook to fetch vaccination plans, optionally for a single customer
#[hook]
pub fn use_vaccination_plans(
    customer_id: Option<CustomerId>,
) -> FetchHookReturn<Vec<responses::VaccinationPlan>> {
    let session = use_session();
    use_fetch(customer_id, move || {
        let session = session.clone();
        async move {
            let filter = requests::PlanFilter { customer_id };
            session
                .observe(get_api_client().list_vaccination_plans(&filter).await)
        }
    })
}

/// Record an administered dose. Settles with the updated plan.
#[hook]
pub fn use_record_dose()
-> ApiHandle<responses::VaccinationPlan, requests::RecordDose> {
    let session = use_session();
    use_api_with_params(None, move |dose: requests::RecordDose| {
        let session = session.clone();
        async move { session.observe(get_api_client().record_dose(&dose).await) }
    })
}
