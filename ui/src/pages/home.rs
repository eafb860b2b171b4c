use yew::prelude::*;

use crate::components::RequireAuth;
use crate::components::layout::{MENU_ENTRIES, visible_entries};
use crate::hooks::{use_permissions, use_push_route, use_title};

#[function_component]
pub fn HomePage() -> Html {
    use_title("Dashboard");
    html! {
        <RequireAuth render={Callback::from(|user: payloads::UserInfo| html! {
            <Dashboard name={user.name} role={user.role.to_string()} />
        })} />
    }
}

#[derive(Properties, PartialEq)]
struct DashboardProps {
    name: String,
    role: String,
}

#[function_component]
fn Dashboard(props: &DashboardProps) -> Html {
    let permissions = use_permissions();
    let push_route = use_push_route();
    let entries = visible_entries(MENU_ENTRIES, &permissions.evaluator());

    html! {
        <div class="space-y-6">
            <div>
                <h1 class="text-2xl font-bold text-neutral-900 dark:text-white">
                    {format!("Welcome, {}", props.name)}
                </h1>
                <p class="text-neutral-600 dark:text-neutral-400">
                    {format!("Signed in as {}", props.role)}
                </p>
            </div>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                { for entries.into_iter().skip(1).map(|entry| {
                    let onclick = {
                        let push_route = push_route.clone();
                        let route = entry.route.clone();
                        Callback::from(move |_: MouseEvent| push_route.emit(route.clone()))
                    };
                    html! {
                        <button
                            key={entry.title}
                            {onclick}
                            class="p-6 text-left rounded-lg border border-neutral-200 dark:border-neutral-700 \
                                   hover:bg-neutral-50 dark:hover:bg-neutral-800"
                        >
                            <span class="font-medium">{entry.title}</span>
                        </button>
                    }
                })}
            </div>
        </div>
    }
}
