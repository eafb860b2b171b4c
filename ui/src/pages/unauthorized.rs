use yew::prelude::*;

use crate::components::AccessDenied;
use crate::hooks::use_title;

#[function_component]
pub fn UnauthorizedPage() -> Html {
    use_title("Access denied");
    html! { <AccessDenied /> }
}
