use jiff::civil::DateTime;
use payloads::{ServiceId, requests, responses};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::{ErrorBanner, RequireAuth, TimestampDisplay};
use crate::hooks::{use_register_appointment, use_services, use_title};
use crate::utils::time::clinic_timezone;

#[function_component]
pub fn ServicesPage() -> Html {
    use_title("Services");
    html! {
        <RequireAuth>
            <ServiceCatalogue />
        </RequireAuth>
    }
}

#[function_component]
fn ServiceCatalogue() -> Html {
    let services = use_services();

    services.render("services", |services, _is_loading, error| {
        html! {
            <div class="space-y-8">
                <h1 class="text-2xl font-bold">{"Vaccination services"}</h1>
                if let Some(error) = error {
                    <ErrorBanner message={error.clone()} />
                }
                <table class="w-full text-sm">
                    <thead>
                        <tr class="text-left border-b border-neutral-200 dark:border-neutral-700">
                            <th class="py-2">{"Service"}</th>
                            <th class="py-2">{"Doses"}</th>
                            <th class="py-2">{"Price"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        { for services.iter().map(|service| html! {
                            <tr key={service.id.to_string()} class="border-b border-neutral-100 dark:border-neutral-800">
                                <td class="py-2">
                                    <div class="font-medium">{&service.name}</div>
                                    if let Some(description) = &service.description {
                                        <div class="text-neutral-500">{description}</div>
                                    }
                                </td>
                                <td class="py-2">{service.dose_count}</td>
                                <td class="py-2">{format!("{} VND", service.price)}</td>
                            </tr>
                        })}
                    </tbody>
                </table>
                <BookingForm services={services.clone()} />
            </div>
        }
    })
}

#[derive(Properties, PartialEq)]
struct BookingFormProps {
    services: Vec<responses::Service>,
}

/// Parse a `datetime-local` input value as clinic time.
fn parse_schedule(value: &str) -> Option<jiff::Timestamp> {
    let datetime: DateTime = value.parse().ok()?;
    datetime
        .to_zoned(clinic_timezone())
        .ok()
        .map(|zoned| zoned.timestamp())
}

#[function_component]
fn BookingForm(props: &BookingFormProps) -> Html {
    let register = use_register_appointment();
    let service_ref = use_node_ref();
    let schedule_ref = use_node_ref();
    let validation_error = use_state(|| None::<String>);

    let on_submit = {
        let service_ref = service_ref.clone();
        let schedule_ref = schedule_ref.clone();
        let validation_error = validation_error.clone();
        let execute = register.execute.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let (Some(service), Some(schedule)) = (
                service_ref.cast::<HtmlSelectElement>(),
                schedule_ref.cast::<HtmlInputElement>(),
            ) else {
                return;
            };

            let Ok(service_id) = service.value().parse().map(ServiceId) else {
                validation_error.set(Some("Please choose a service".into()));
                return;
            };
            let Some(scheduled_at) = parse_schedule(&schedule.value()) else {
                validation_error.set(Some("Please choose a time".into()));
                return;
            };

            validation_error.set(None);
            execute.emit(requests::RegisterAppointment {
                service_id,
                scheduled_at,
                note: None,
            });
        })
    };

    let error = (*validation_error)
        .clone()
        .or_else(|| register.error().map(str::to_string));

    html! {
        <form onsubmit={on_submit} class="space-y-4 max-w-md">
            <h2 class="text-lg font-semibold">{"Book an appointment"}</h2>
            if let Some(error) = error {
                <ErrorBanner message={error} />
            }
            if let Some(appointment) = register.data() {
                <p class="text-sm text-green-700 dark:text-green-400">
                    {"Booked for "}
                    <TimestampDisplay timestamp={appointment.scheduled_at} />
                    {". We will confirm it shortly."}
                </p>
            }
            <select ref={service_ref} class="w-full px-3 py-2 border rounded-md">
                { for props.services.iter().map(|service| html! {
                    <option value={service.id.to_string()}>{&service.name}</option>
                })}
            </select>
            <input ref={schedule_ref} type="datetime-local" class="w-full px-3 py-2 border rounded-md" />
            <button
                type="submit"
                disabled={register.is_loading()}
                class="py-2 px-4 rounded-md text-sm font-medium text-white bg-neutral-900 \
                       disabled:opacity-50"
            >
                if register.is_loading() { {"Booking..."} } else { {"Book"} }
            </button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_is_read_as_clinic_time() {
        let ts = parse_schedule("2025-03-03T09:30").unwrap();
        assert_eq!(ts, "2025-03-03T02:30:00Z".parse().unwrap());
    }

    #[test]
    fn blank_schedule_is_rejected() {
        assert_eq!(parse_schedule(""), None);
    }
}
