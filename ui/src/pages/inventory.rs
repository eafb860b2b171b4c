use payloads::{
    VaccineLotId, requests,
    responses::{InventorySlipKind, VaccineLot},
};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::{ErrorBanner, RequirePermission};
use crate::hooks::{
    PermissionSnapshot, use_create_inventory_slip, use_permissions, use_title,
    use_vaccine_lots,
};
use crate::utils::time::format_date;

#[function_component]
pub fn InventoryPage() -> Html {
    use_title("Inventory");
    let permissions = ["LoVacXin", "PhieuNhap", "PhieuXuat", "PhieuHuy"]
        .map(str::to_string)
        .to_vec();
    html! {
        <RequirePermission
            roles={vec!["MANAGER".to_string(), "DOCTOR".to_string()]}
            {permissions}
        >
            <Inventory />
        </RequirePermission>
    }
}

/// The slip kinds the user may issue.
pub fn allowed_slip_kinds(
    permissions: &PermissionSnapshot,
) -> Vec<InventorySlipKind> {
    InventorySlipKind::ALL
        .into_iter()
        .filter(|kind| permissions.can_manage(kind.resource()))
        .collect()
}

fn parse_kind(value: &str) -> Option<InventorySlipKind> {
    InventorySlipKind::ALL
        .into_iter()
        .find(|kind| kind.label() == value)
}

#[function_component]
fn Inventory() -> Html {
    let lots = use_vaccine_lots();
    let permissions = use_permissions();
    let kinds = allowed_slip_kinds(&permissions);
    let refetch = lots.refetch.clone();

    html! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold">{"Vaccine inventory"}</h1>
            { lots.render("vaccine lots", |lots, is_loading, error| html! {
                <>
                    if let Some(error) = error {
                        <ErrorBanner message={error.clone()} />
                    }
                    <table class={classes!("w-full", "text-sm", is_loading.then_some("opacity-50"))}>
                        <thead>
                            <tr class="text-left border-b border-neutral-200 dark:border-neutral-700">
                                <th class="py-2">{"Lot"}</th>
                                <th class="py-2">{"Quantity"}</th>
                                <th class="py-2">{"Expires"}</th>
                            </tr>
                        </thead>
                        <tbody>
                            { for lots.iter().map(|lot| html! {
                                <tr key={lot.id.to_string()} class="border-b border-neutral-100 dark:border-neutral-800">
                                    <td class="py-2">{&lot.lot_number}</td>
                                    <td class="py-2">{lot.quantity}</td>
                                    <td class="py-2">{format_date(lot.expires_on)}</td>
                                </tr>
                            })}
                        </tbody>
                    </table>
                    if !kinds.is_empty() {
                        <SlipForm
                            lots={lots.clone()}
                            kinds={kinds.clone()}
                            on_created={refetch.clone()}
                        />
                    }
                </>
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct SlipFormProps {
    lots: Vec<VaccineLot>,
    kinds: Vec<InventorySlipKind>,
    on_created: Callback<()>,
}

#[function_component]
fn SlipForm(props: &SlipFormProps) -> Html {
    let create = use_create_inventory_slip();
    let kind_ref = use_node_ref();
    let lot_ref = use_node_ref();
    let quantity_ref = use_node_ref();
    let validation_error = use_state(|| None::<String>);

    {
        let on_created = props.on_created.clone();
        let created = create.data().map(|slip| slip.id);
        use_effect_with(created, move |created| {
            if created.is_some() {
                on_created.emit(());
            }
        });
    }

    let on_submit = {
        let kind_ref = kind_ref.clone();
        let lot_ref = lot_ref.clone();
        let quantity_ref = quantity_ref.clone();
        let validation_error = validation_error.clone();
        let execute = create.execute.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let (Some(kind), Some(lot), Some(quantity)) = (
                kind_ref.cast::<HtmlSelectElement>(),
                lot_ref.cast::<HtmlSelectElement>(),
                quantity_ref.cast::<HtmlInputElement>(),
            ) else {
                return;
            };

            let Some(kind) = parse_kind(&kind.value()) else {
                validation_error.set(Some("Please choose a slip type".into()));
                return;
            };
            let Ok(vaccine_lot_id) = lot.value().parse().map(VaccineLotId) else {
                validation_error.set(Some("Please choose a lot".into()));
                return;
            };
            let quantity = match quantity.value().trim().parse::<u32>() {
                Ok(quantity) if quantity > 0 => quantity,
                _ => {
                    validation_error
                        .set(Some("Quantity must be a positive number".into()));
                    return;
                }
            };

            validation_error.set(None);
            execute.emit(requests::CreateInventorySlip {
                kind,
                vaccine_lot_id,
                quantity,
                note: None,
            });
        })
    };

    let error = (*validation_error)
        .clone()
        .or_else(|| create.error().map(str::to_string));

    html! {
        <form onsubmit={on_submit} class="space-y-4 max-w-md">
            <h2 class="text-lg font-semibold">{"New slip"}</h2>
            if let Some(error) = error {
                <ErrorBanner message={error} />
            }
            <select ref={kind_ref} class="w-full px-3 py-2 border rounded-md">
                { for props.kinds.iter().map(|kind| html! {
                    <option value={kind.label()}>{kind.label()}</option>
                })}
            </select>
            <select ref={lot_ref} class="w-full px-3 py-2 border rounded-md">
                { for props.lots.iter().map(|lot| html! {
                    <option value={lot.id.to_string()}>{&lot.lot_number}</option>
                })}
            </select>
            <input ref={quantity_ref} type="number" min="1" placeholder="Quantity" class="w-full px-3 py-2 border rounded-md" />
            <button
                type="submit"
                disabled={create.is_loading()}
                class="py-2 px-4 rounded-md text-sm font-medium text-white bg-neutral-900 disabled:opacity-50"
            >
                if create.is_loading() { {"Saving..."} } else { {"Create slip"} }
            </button>
        </form>
    }
}
