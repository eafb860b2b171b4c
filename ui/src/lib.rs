use std::sync::Arc;

use payloads::APIClient;
use yew::prelude::*;
use yew_router::prelude::*;

pub mod components;
pub mod config;
pub mod hooks;
pub mod logs;
pub mod pages;
pub mod request;
pub mod session;
pub mod storage;
pub mod utils;

use components::layout::MainLayout;
use config::ClientConfig;
use pages::{
    AppointmentsPage, HomePage, InventoryPage, NotFoundPage, ServicesPage,
    SignInPage, StatisticsPage, UnauthorizedPage, VaccinationPlansPage,
};
use session::SessionProvider;
use storage::BrowserCredentials;

// API client configured from the build environment, with credentials in
// localStorage. Cheap to build: all state lives in the browser.
pub fn get_api_client() -> APIClient {
    let config = ClientConfig::from_build_env();
    APIClient::new(
        config.backend_address(),
        Arc::new(BrowserCredentials::new(config.credential_policy)),
    )
}

#[function_component]
pub fn App() -> Html {
    html! {
        <BrowserRouter>
            <SessionProvider>
                <MainLayout>
                    <Switch<Route> render={switch} />
                </MainLayout>
            </SessionProvider>
        </BrowserRouter>
    }
}

#[derive(Debug, Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/sign-in")]
    SignIn,
    #[at("/unauthorized")]
    Unauthorized,
    #[at("/services")]
    Services,
    #[at("/appointments")]
    Appointments,
    #[at("/vaccination-plans")]
    VaccinationPlans,
    #[at("/inventory")]
    Inventory,
    #[at("/statistics")]
    Statistics,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! { <HomePage /> },
        Route::SignIn => html! { <SignInPage /> },
        Route::Unauthorized => html! { <UnauthorizedPage /> },
        Route::Services => html! { <ServicesPage /> },
        Route::Appointments => html! { <AppointmentsPage /> },
        Route::VaccinationPlans => html! { <VaccinationPlansPage /> },
        Route::Inventory => html! { <InventoryPage /> },
        Route::Statistics => html! { <StatisticsPage /> },
        Route::NotFound => html! { <NotFoundPage /> },
    }
}
