use yew::prelude::*;

use crate::components::require_permission::RequirePermissionProps;
use crate::hooks::use_permissions;

/// Inline permission check for buttons and sections. Renders the children
/// when the check passes, otherwise the fallback or nothing. Never
/// redirects.
#[function_component]
pub fn Can(props: &RequirePermissionProps) -> Html {
    let permissions = use_permissions();

    if permissions.satisfies(&props.requirement()) {
        html! {
            <>
                {for props.children.iter()}
            </>
        }
    } else {
        props.fallback.clone().unwrap_or_default()
    }
}
