use payloads::{AppointmentId, requests, responses};
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::{
    ApiHandle, FetchHookReturn, use_api_with_params, use_fetch, use_session,
};

/// Hook to fetch appointments matching a filter. Refetches when the filter
/// changes.
#[hook]
pub fn use_appointments(
    filter: requests::AppointmentFilter,
) -> FetchHookReturn<Vec<responses::Appointment>> {
    let session = use_session();
    use_fetch(filter.clone(), move || {
        let session = session.clone();
        let filter = filter.clone();
        async move {
            session.observe(get_api_client().list_appointments(&filter).await)
        }
    })
}

#[hook]
pub fn use_register_appointment()
-> ApiHandle<responses::Appointment, requests::RegisterAppointment> {
    let session = use_session();
    use_api_with_params(None, move |details: requests::RegisterAppointment| {
        let session = session.clone();
        async move {
            session
                .observe(get_api_client().register_appointment(&details).await)
        }
    })
}

#[hook]
pub fn use_approve_appointment()
-> ApiHandle<responses::Appointment, AppointmentId> {
    let session = use_session();
    use_api_with_params(None, move |appointment_id: AppointmentId| {
        let session = session.clone();
        async move {
            session.observe(
                get_api_client().approve_appointment(&appointment_id).await,
            )
        }
    })
}

/// Cancel an appointment. Settles with the id of the cancelled appointment.
#[hook]
pub fn use_cancel_appointment() -> ApiHandle<AppointmentId, AppointmentId> {
    let session = use_session();
    use_api_with_params(None, move |appointment_id: AppointmentId| {
        let session = session.clone();
        async move {
            session
                .observe(
                    get_api_client().cancel_appointment(&appointment_id).await,
                )
                .map(|()| appointment_id)
        }
    })
}

#[hook]
pub fn use_create_payment()
-> ApiHandle<responses::Payment, requests::CreatePayment> {
    let session = use_session();
    use_api_with_params(None, move |details: requests::CreatePayment| {
        let session = session.clone();
        async move {
            session.observe(get_api_client().create_payment(&details).await)
        }
    })
}
