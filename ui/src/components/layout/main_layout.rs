use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::components::layout::{Header, Sidebar};
use crate::hooks::use_session;

#[derive(Properties, PartialEq)]
pub struct MainLayoutProps {
    pub children: Children,
}

/// Page chrome. The sidebar is only shown to a signed-in user.
#[function_component]
pub fn MainLayout(props: &MainLayoutProps) -> Html {
    let session = use_session();
    let route = use_route::<Route>().unwrap_or(Route::Home);

    html! {
        <div class="min-h-screen bg-white dark:bg-neutral-900 text-neutral-900 dark:text-neutral-100">
            <Header />
            <div class="flex min-h-0">
                if session.state().is_authenticated() {
                    <aside class="hidden md:block w-64 flex-shrink-0 border-r \
                                  border-neutral-200 dark:border-neutral-700">
                        <Sidebar active_route={route} />
                    </aside>
                }
                <main class="flex-1 min-w-0 max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                    {for props.children.iter()}
                </main>
            </div>
        </div>
    }
}
