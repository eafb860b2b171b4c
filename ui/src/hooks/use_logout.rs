use crate::session::SessionAction;
use crate::{Route, get_api_client, hooks::use_session};
use yew::prelude::*;
use yew_router::prelude::*;

/// Sign out. The backend call is best effort; local credentials and the
/// session are cleared regardless.
#[hook]
pub fn use_logout() -> Callback<MouseEvent> {
    let session = use_session();
    let navigator = use_navigator().unwrap();

    Callback::from(move |_| {
        let session = session.clone();
        let navigator = navigator.clone();

        yew::platform::spawn_local(async move {
            if let Err(e) = get_api_client().logout().await {
                tracing::warn!("logout request failed: {e}");
            }

            session.dispatch(SessionAction::LoggedOut);
            navigator.push(&Route::SignIn);
        });
    })
}
