use jiff::civil::Date;
use payloads::requests;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::{ErrorBanner, RequirePermission};
use crate::hooks::{use_statistics, use_title};

/// Manager-only: anyone else is sent to the unauthorized page.
#[function_component]
pub fn StatisticsPage() -> Html {
    use_title("Statistics");
    html! {
        <RequirePermission
            roles={vec!["MANAGER".to_string()]}
            permissions={vec!["ThongKe".to_string()]}
            redirect=true
        >
            <Statistics />
        </RequirePermission>
    }
}

fn parse_date(value: &str) -> Option<Date> {
    value.trim().parse().ok()
}

#[function_component]
fn Statistics() -> Html {
    let range = use_state(requests::StatisticsRange::default);
    let overview = use_statistics((*range).clone());

    let on_date_change = |set_from: bool| {
        let range = range.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let date = parse_date(&input.value());
            let mut next = (*range).clone();
            if set_from {
                next.from = date;
            } else {
                next.to = date;
            }
            range.set(next);
        })
    };

    html! {
        <div class="space-y-6">
            <div class="flex justify-between items-center">
                <h1 class="text-2xl font-bold">{"Statistics"}</h1>
                <div class="flex space-x-2">
                    <input type="date" onchange={on_date_change(true)} class="px-3 py-2 border rounded-md" />
                    <input type="date" onchange={on_date_change(false)} class="px-3 py-2 border rounded-md" />
                </div>
            </div>
            { overview.render("statistics", |overview, _, error| html! {
                <>
                    if let Some(error) = error {
                        <ErrorBanner message={error.clone()} />
                    }
                    <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                        {stat("Appointments", overview.appointments.to_string())}
                        {stat("Doses administered", overview.doses_administered.to_string())}
                        {stat("New customers", overview.new_customers.to_string())}
                        {stat("Revenue", format!("{} VND", overview.revenue))}
                    </div>
                </>
            })}
        </div>
    }
}

fn stat(label: &'static str, value: String) -> Html {
    html! {
        <div class="p-4 rounded-lg border border-neutral-200 dark:border-neutral-700">
            <div class="text-sm text-neutral-600 dark:text-neutral-400">{label}</div>
            <div class="text-2xl font-semibold">{value}</div>
        </div>
    }
}
