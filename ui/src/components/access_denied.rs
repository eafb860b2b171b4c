use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::hooks::use_refresh_profile;

/// Default panel shown when a permission guard fails.
///
/// Permissions granted after sign-in can be picked up from here, which
/// re-runs the guard with the fresh profile.
#[function_component]
pub fn AccessDenied() -> Html {
    let refresh = use_refresh_profile();
    let on_refresh = {
        let execute = refresh.execute.clone();
        Callback::from(move |_: MouseEvent| execute.emit(()))
    };

    html! {
        <div class="text-center py-12">
            <h2 class="text-2xl font-bold text-neutral-900 dark:text-white mb-2">
                {"Access denied"}
            </h2>
            <p class="text-neutral-600 dark:text-neutral-400 mb-4">
                {"You do not have permission to view this page."}
            </p>
            if let Some(error) = refresh.error() {
                <p class="text-sm text-red-700 dark:text-red-400 mb-4">{error}</p>
            }
            <div class="space-x-4">
                <button
                    onclick={on_refresh}
                    disabled={refresh.is_loading()}
                    class="text-neutral-900 dark:text-neutral-100 font-medium underline disabled:opacity-50"
                >
                    {"Reload permissions"}
                </button>
                <Link<Route> to={Route::Home} classes="text-neutral-900 dark:text-neutral-100 font-medium underline">
                    {"Back to dashboard"}
                </Link<Route>>
            </div>
        </div>
    }
}
