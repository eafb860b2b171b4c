use payloads::UserInfo;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::hooks::use_session;
use crate::session::AuthPhase;
use crate::utils::redirect::sign_in_query;
use crate::Route;

/// Component that only renders its children when the user is authenticated.
///
/// While the session is being resolved a spinner is shown. An anonymous
/// visitor is sent to the sign-in page with the current path attached, so
/// they come back here afterwards.
///
/// Supports two modes:
/// 1. Simple children mode: Just wraps content that doesn't need the user
/// 2. Render prop mode: Provides UserInfo to children that need it
#[derive(Properties, PartialEq)]
pub struct RequireAuthProps {
    #[prop_or_default]
    pub children: Children,
    #[prop_or_default]
    pub render: Option<Callback<UserInfo, Html>>,
}

#[function_component]
pub fn RequireAuth(props: &RequireAuthProps) -> Html {
    let session = use_session();
    let navigator = use_navigator().unwrap();
    let location = use_location();
    let phase = session.state().phase();
    let is_anonymous = phase == AuthPhase::Anonymous;

    {
        let query = location
            .map(|location| {
                sign_in_query(location.path(), location.query_str())
            })
            .unwrap_or_default();
        use_effect_with(is_anonymous, move |is_anonymous| {
            if *is_anonymous {
                if let Err(e) = navigator.push_with_query(&Route::SignIn, &query)
                {
                    tracing::warn!("could not attach redirect: {e}");
                    navigator.push(&Route::SignIn);
                }
            }
        });
    }

    match phase {
        AuthPhase::Unknown | AuthPhase::Loading => spinner(),
        AuthPhase::Anonymous => html! {},
        AuthPhase::Authenticated(user) => match &props.render {
            Some(render) => render.emit(user.clone()),
            None => html! {
                <>
                    {for props.children.iter()}
                </>
            },
        },
    }
}

pub fn spinner() -> Html {
    html! {
        <div class="text-center py-8">
            <div class="inline-block animate-spin rounded-full h-8 w-8 border-2 border-neutral-900 dark:border-neutral-100 border-t-transparent dark:border-t-transparent"></div>
        </div>
    }
}
