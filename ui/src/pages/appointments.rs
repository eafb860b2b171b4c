use payloads::{
    AppointmentId, Resource,
    requests::{self, PaymentMethod},
    responses::{Appointment, AppointmentStatus},
};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::components::{ErrorBanner, RequirePermission, TimestampDisplay};
use crate::hooks::{
    PermissionSnapshot, use_appointments, use_approve_appointment,
    use_cancel_appointment, use_create_payment, use_permissions, use_title,
};

#[function_component]
pub fn AppointmentsPage() -> Html {
    use_title("Appointments");
    html! {
        <RequirePermission permissions={vec!["LichHen".to_string()]}>
            <AppointmentList />
        </RequirePermission>
    }
}

/// Which row actions a user may take on an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowActions {
    pub approve: bool,
    pub cancel: bool,
    pub collect_payment: bool,
}

pub fn row_actions(
    permissions: &PermissionSnapshot,
    status: AppointmentStatus,
) -> RowActions {
    let manage = permissions.can_manage(Resource::LichHen);
    RowActions {
        approve: manage && status == AppointmentStatus::Pending,
        cancel: manage
            && matches!(
                status,
                AppointmentStatus::Pending | AppointmentStatus::Approved
            ),
        collect_payment: permissions.can_manage(Resource::ThanhToan)
            && status == AppointmentStatus::Approved,
    }
}

fn parse_status(value: &str) -> Option<AppointmentStatus> {
    AppointmentStatus::ALL
        .into_iter()
        .find(|status| status.label() == value)
}

#[function_component]
fn AppointmentList() -> Html {
    let filter = use_state(requests::AppointmentFilter::default);
    let appointments = use_appointments((*filter).clone());
    let approve = use_approve_appointment();
    let cancel = use_cancel_appointment();
    let payment = use_create_payment();
    let permissions = use_permissions();

    // Reload after any mutation settles successfully.
    {
        let refetch = appointments.refetch.clone();
        let settled = (
            approve.data().map(|a| a.id),
            cancel.data().copied(),
            payment.data().map(|p| p.id),
        );
        use_effect_with(settled, move |settled| {
            if *settled != (None, None, None) {
                refetch.emit(());
            }
        });
    }

    let on_status_change = {
        let filter = filter.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            filter.set(requests::AppointmentFilter {
                status: parse_status(&select.value()),
                ..(*filter).clone()
            });
        })
    };

    let action_error = approve
        .error()
        .or(cancel.error())
        .or(payment.error())
        .map(str::to_string);

    html! {
        <div class="space-y-6">
            <div class="flex justify-between items-center">
                <h1 class="text-2xl font-bold">{"Appointments"}</h1>
                <select onchange={on_status_change} class="px-3 py-2 border rounded-md">
                    <option value="">{"All statuses"}</option>
                    { for AppointmentStatus::ALL.iter().map(|status| html! {
                        <option value={status.label()}>{status.label()}</option>
                    })}
                </select>
            </div>
            if let Some(error) = action_error {
                <ErrorBanner message={error} />
            }
            { appointments.render("appointments", |appointments, _, error| html! {
                <>
                    if let Some(error) = error {
                        <ErrorBanner message={error.clone()} />
                    }
                    <AppointmentTable
                        appointments={appointments.clone()}
                        permissions={permissions.clone()}
                        on_approve={approve.execute.clone()}
                        on_cancel={cancel.execute.clone()}
                        on_collect={payment.execute.reform(|appointment_id| {
                            requests::CreatePayment {
                                appointment_id,
                                method: PaymentMethod::Cash,
                            }
                        })}
                    />
                </>
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct AppointmentTableProps {
    appointments: Vec<Appointment>,
    permissions: PermissionSnapshot,
    on_approve: Callback<AppointmentId>,
    on_cancel: Callback<AppointmentId>,
    on_collect: Callback<AppointmentId>,
}

#[function_component]
fn AppointmentTable(props: &AppointmentTableProps) -> Html {
    if props.appointments.is_empty() {
        return html! {
            <p class="text-neutral-600 dark:text-neutral-400">{"No appointments found"}</p>
        };
    }

    let button = |label: &'static str, callback: &Callback<AppointmentId>, id: AppointmentId| {
        let onclick = callback.reform(move |_: MouseEvent| id);
        html! {
            <button {onclick} class="text-sm font-medium underline mr-3">{label}</button>
        }
    };

    html! {
        <table class="w-full text-sm">
            <thead>
                <tr class="text-left border-b border-neutral-200 dark:border-neutral-700">
                    <th class="py-2">{"When"}</th>
                    <th class="py-2">{"Status"}</th>
                    <th class="py-2">{"Note"}</th>
                    <th class="py-2"></th>
                </tr>
            </thead>
            <tbody>
                { for props.appointments.iter().map(|appointment| {
                    let actions = row_actions(&props.permissions, appointment.status);
                    html! {
                        <tr key={appointment.id.to_string()} class="border-b border-neutral-100 dark:border-neutral-800">
                            <td class="py-2"><TimestampDisplay timestamp={appointment.scheduled_at} /></td>
                            <td class="py-2">{appointment.status.label()}</td>
                            <td class="py-2">{appointment.note.clone().unwrap_or_default()}</td>
                            <td class="py-2">
                                if actions.approve {
                                    {button("Approve", &props.on_approve, appointment.id)}
                                }
                                if actions.cancel {
                                    {button("Cancel", &props.on_cancel, appointment.id)}
                                }
                                if actions.collect_payment {
                                    {button("Collect payment", &props.on_collect, appointment.id)}
                                }
                            </td>
                        </tr>
                    }
                })}
            </tbody>
        </table>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payloads::{Permissions, Role, UserId, UserInfo};

    fn snapshot(codes: &[&str]) -> PermissionSnapshot {
        PermissionSnapshot::new(Some(UserInfo {
            id: UserId::new(),
            name: "Hoang E".into(),
            email: "e@example.com".into(),
            role: Role::Doctor,
            permissions: Permissions::from_codes(codes),
        }))
    }

    #[test]
    fn view_only_users_get_no_actions() {
        let viewer = snapshot(&["LichHen_VIEW", "ThanhToan_VIEW"]);
        for status in AppointmentStatus::ALL {
            assert_eq!(row_actions(&viewer, status), RowActions::default());
        }
    }

    #[test]
    fn managers_act_by_status() {
        let manager = snapshot(&["LichHen_ALL", "ThanhToan_ALL"]);
        assert_eq!(
            row_actions(&manager, AppointmentStatus::Pending),
            RowActions {
                approve: true,
                cancel: true,
                collect_payment: false,
            }
        );
        assert_eq!(
            row_actions(&manager, AppointmentStatus::Approved),
            RowActions {
                approve: false,
                cancel: true,
                collect_payment: true,
            }
        );
        assert_eq!(
            row_actions(&manager, AppointmentStatus::Completed),
            RowActions::default()
        );
    }

    #[test]
    fn status_filter_parses_labels() {
        assert_eq!(parse_status("Approved"), Some(AppointmentStatus::Approved));
        assert_eq!(parse_status(""), None);
    }
}
