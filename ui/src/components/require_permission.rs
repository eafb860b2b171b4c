use payloads::{AccessRequirement, Combinator};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::components::{AccessDenied, RequireAuth};
use crate::hooks::use_permissions;

/// Role and permission constraints shared by [`RequirePermission`] and
/// [`Can`](crate::components::Can).
#[derive(Properties, PartialEq, Clone)]
pub struct RequirePermissionProps {
    #[prop_or_default]
    pub roles: Vec<String>,
    #[prop_or_default]
    pub permissions: Vec<String>,
    /// Require every listed permission instead of any one of them.
    #[prop_or_default]
    pub require_all: bool,
    /// Shown instead of the children when the check fails.
    #[prop_or_default]
    pub fallback: Option<Html>,
    /// Navigate to the unauthorized page instead of rendering a fallback.
    #[prop_or_default]
    pub redirect: bool,
    #[prop_or_default]
    pub children: Children,
}

impl RequirePermissionProps {
    pub fn requirement(&self) -> AccessRequirement {
        AccessRequirement {
            roles: self.roles.clone(),
            permissions: self.permissions.clone(),
            combinator: Combinator::from(self.require_all),
        }
    }
}

/// Authorization gate. Authentication is checked first, so an anonymous
/// visitor is sent to sign in rather than shown the denial.
#[function_component]
pub fn RequirePermission(props: &RequirePermissionProps) -> Html {
    let props = props.clone();
    html! {
        <RequireAuth>
            <PermissionCheck ..props />
        </RequireAuth>
    }
}

#[function_component]
fn PermissionCheck(props: &RequirePermissionProps) -> Html {
    let permissions = use_permissions();
    let navigator = use_navigator().unwrap();
    let allowed = permissions.satisfies(&props.requirement());

    {
        let redirect = props.redirect && !allowed;
        use_effect_with(redirect, move |redirect| {
            if *redirect {
                navigator.replace(&Route::Unauthorized);
            }
        });
    }

    if allowed {
        return html! {
            <>
                {for props.children.iter()}
            </>
        };
    }
    if props.redirect {
        return html! {};
    }
    match &props.fallback {
        Some(fallback) => fallback.clone(),
        None => html! { <AccessDenied /> },
    }
}
