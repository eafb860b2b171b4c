use jiff::civil::Date;
use payloads::{
    Resource, VaccinationPlanId, VaccineLotId, requests,
    responses::{VaccinationPlan, VaccineLot},
};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::components::{ErrorBanner, RequirePermission, TimestampDisplay};
use crate::hooks::{
    use_permissions, use_record_dose, use_title, use_vaccination_plans,
    use_vaccine_lots,
};
use crate::utils::time::{clinic_today, format_date};

#[function_component]
pub fn VaccinationPlansPage() -> Html {
    use_title("Vaccination plans");
    html! {
        <RequirePermission permissions={vec!["KeHoachTiem".to_string()]}>
            <PlanList />
        </RequirePermission>
    }
}

/// Lots a dose can be drawn from: in stock and not expired.
pub fn usable_lots(lots: &[VaccineLot], today: Date) -> Vec<&VaccineLot> {
    lots.iter()
        .filter(|lot| lot.quantity > 0 && lot.expires_on >= today)
        .collect()
}

#[function_component]
fn PlanList() -> Html {
    let plans = use_vaccination_plans(None);
    let permissions = use_permissions();
    let can_record = permissions.can_manage(Resource::KeHoachTiem);
    let refetch = plans.refetch.clone();

    html! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold">{"Vaccination plans"}</h1>
            { plans.render("vaccination plans", |plans, _, error| html! {
                <>
                    if let Some(error) = error {
                        <ErrorBanner message={error.clone()} />
                    }
                    if plans.is_empty() {
                        <p class="text-neutral-600 dark:text-neutral-400">
                            {"No vaccination plans yet"}
                        </p>
                    }
                    <ul class="space-y-2">
                        { for plans.iter().map(|plan| html! {
                            <PlanRow key={plan.id.to_string()} plan={plan.clone()} />
                        })}
                    </ul>
                    if can_record {
                        <DoseRecorder
                            plans={plans.clone()}
                            on_recorded={refetch.clone()}
                        />
                    }
                </>
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct PlanRowProps {
    plan: VaccinationPlan,
}

#[function_component]
fn PlanRow(props: &PlanRowProps) -> Html {
    let plan = &props.plan;
    let given = plan
        .doses
        .iter()
        .filter(|dose| dose.administered_at.is_some())
        .count();

    html! {
        <li class="p-4 rounded-md border border-neutral-200 dark:border-neutral-700">
            <div class="font-medium">
                {format!("Plan {} ({}/{} doses)", plan.id, given, plan.doses.len())}
            </div>
            { match plan.next_dose() {
                Some(dose) => html! {
                    <div class="text-sm text-neutral-600 dark:text-neutral-400">
                        {format!("Dose {} due {}", dose.dose_number, format_date(dose.due_on))}
                    </div>
                },
                None => html! {
                    <div class="text-sm text-green-700 dark:text-green-400">
                        {"Course complete"}
                        if let Some(at) = plan.doses.last().and_then(|d| d.administered_at) {
                            {" since "}<TimestampDisplay timestamp={at} />
                        }
                    </div>
                },
            }}
        </li>
    }
}

#[derive(Properties, PartialEq)]
struct DoseRecorderProps {
    plans: Vec<VaccinationPlan>,
    on_recorded: Callback<()>,
}

/// Form for staff to record the next dose of a plan.
#[function_component]
fn DoseRecorder(props: &DoseRecorderProps) -> Html {
    let lots = use_vaccine_lots();
    let record = use_record_dose();
    let plan_ref = use_node_ref();
    let lot_ref = use_node_ref();

    {
        let on_recorded = props.on_recorded.clone();
        let recorded = record.data().cloned();
        use_effect_with(recorded, move |recorded| {
            if recorded.is_some() {
                on_recorded.emit(());
            }
        });
    }

    let pending: Vec<&VaccinationPlan> = props
        .plans
        .iter()
        .filter(|plan| !plan.is_complete())
        .collect();

    let on_submit = {
        let plans = props.plans.clone();
        let plan_ref = plan_ref.clone();
        let lot_ref = lot_ref.clone();
        let execute = record.execute.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let (Some(plan_select), Some(lot_select)) = (
                plan_ref.cast::<HtmlSelectElement>(),
                lot_ref.cast::<HtmlSelectElement>(),
            ) else {
                return;
            };
            let Ok(plan_id) = plan_select.value().parse().map(VaccinationPlanId)
            else {
                return;
            };
            let Ok(vaccine_lot_id) = lot_select.value().parse().map(VaccineLotId)
            else {
                return;
            };
            let Some(dose) = plans
                .iter()
                .find(|plan| plan.id == plan_id)
                .and_then(VaccinationPlan::next_dose)
            else {
                return;
            };

            execute.emit(requests::RecordDose {
                plan_id,
                dose_number: dose.dose_number,
                vaccine_lot_id,
            });
        })
    };

    if pending.is_empty() {
        return html! {};
    }

    let today = clinic_today();

    html! {
        <form onsubmit={on_submit} class="space-y-4 max-w-md">
            <h2 class="text-lg font-semibold">{"Record a dose"}</h2>
            if let Some(error) = record.error() {
                <ErrorBanner message={error.to_string()} />
            }
            <select ref={plan_ref} class="w-full px-3 py-2 border rounded-md">
                { for pending.iter().map(|plan| html! {
                    <option value={plan.id.to_string()}>{plan.id.to_string()}</option>
                })}
            </select>
            { lots.render("vaccine lots", |lots, _, _| html! {
                <select ref={lot_ref.clone()} class="w-full px-3 py-2 border rounded-md">
                    { for usable_lots(lots, today).into_iter().map(|lot| html! {
                        <option value={lot.id.to_string()}>
                            {format!("{} ({} left, expires {})", lot.lot_number, lot.quantity, format_date(lot.expires_on))}
                        </option>
                    })}
                </select>
            })}
            <button
                type="submit"
                disabled={record.is_loading()}
                class="py-2 px-4 rounded-md text-sm font-medium text-white bg-neutral-900 disabled:opacity-50"
            >
                if record.is_loading() { {"Saving..."} } else { {"Record dose"} }
            </button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payloads::VaccineId;

    fn lot(quantity: u32, expires_on: &str) -> VaccineLot {
        VaccineLot {
            id: VaccineLotId::new(),
            vaccine_id: VaccineId::new(),
            lot_number: format!("LOT-{quantity}"),
            quantity,
            expires_on: expires_on.parse().unwrap(),
        }
    }

    #[test]
    fn empty_and_expired_lots_are_not_usable() {
        let lots = vec![
            lot(10, "2025-06-30"),
            lot(0, "2025-06-30"),
            lot(5, "2025-02-28"),
            lot(3, "2025-03-01"),
        ];
        let today: Date = "2025-03-01".parse().unwrap();
        let usable: Vec<u32> = usable_lots(&lots, today)
            .into_iter()
            .map(|lot| lot.quantity)
            .collect();
        assert_eq!(usable, vec![10, 3]);
    }
}
