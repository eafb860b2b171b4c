use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ErrorBannerProps {
    pub message: AttrValue,
}

#[function_component]
pub fn ErrorBanner(props: &ErrorBannerProps) -> Html {
    html! {
        <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800">
            <p class="text-sm text-red-700 dark:text-red-400">{&props.message}</p>
        </div>
    }
}
