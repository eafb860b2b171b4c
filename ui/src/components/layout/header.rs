use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::hooks::{use_logout, use_session};

#[function_component]
pub fn Header() -> Html {
    let session = use_session();
    let on_logout = use_logout();

    html! {
        <header class="bg-white dark:bg-neutral-800 border-b border-neutral-200 dark:border-neutral-700">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <div class="flex-shrink-0">
                        <Link<Route> to={Route::Home} classes="text-xl font-semibold text-neutral-900 dark:text-white">
                            {"Vaccination Clinic"}
                        </Link<Route>>
                    </div>
                    if let Some(user) = session.state().user() {
                        <div class="flex items-center space-x-4">
                            <span class="text-sm text-neutral-600 dark:text-neutral-400">
                                {format!("{} ({})", user.name, user.role)}
                            </span>
                            <button
                                onclick={on_logout}
                                class="text-sm font-medium text-neutral-900 dark:text-neutral-100 hover:underline"
                            >
                                {"Sign out"}
                            </button>
                        </div>
                    }
                </div>
            </div>
        </header>
    }
}
