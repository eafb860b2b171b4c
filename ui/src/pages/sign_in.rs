use payloads::UserInfo;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::LoginForm;
use crate::hooks::{use_session, use_title};
use crate::utils::is_dev_mode;
use crate::utils::redirect::{SignInQuery, sign_in_redirect_target};

#[function_component]
pub fn SignInPage() -> Html {
    use_title("Sign in");
    let navigator = use_navigator().unwrap();
    let session = use_session();
    let redirect = use_location()
        .and_then(|location| location.query::<SignInQuery>().ok())
        .and_then(|query| query.redirect);
    let target = sign_in_redirect_target(redirect.as_deref());

    // Already signed in (or just signed in): go where the user was headed.
    {
        let navigator = navigator.clone();
        let target = target.clone();
        let is_authenticated = session.state().is_authenticated();

        use_effect_with(is_authenticated, move |is_authenticated| {
            if *is_authenticated {
                target.navigate(&navigator);
            }
        });
    }

    let on_success = {
        Callback::from(move |user: UserInfo| {
            tracing::debug!(
                user = %user.id,
                route = ?target.route,
                "redirecting after sign in"
            );
            target.navigate(&navigator);
        })
    };

    html! {
        <div class="flex items-center justify-center min-h-[60vh]">
            <LoginForm
                title="Sign in to the clinic console"
                description="Enter your credentials to continue"
                on_success={on_success}
                show_dev_credentials={is_dev_mode()}
            />
        </div>
    }
}
