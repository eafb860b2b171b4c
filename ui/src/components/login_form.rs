use payloads::{UserInfo, requests};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::use_login;

#[derive(Properties, PartialEq)]
pub struct LoginFormProps {
    pub title: AttrValue,
    pub description: AttrValue,
    pub on_success: Callback<UserInfo>,
    #[prop_or_default]
    pub show_dev_credentials: bool,
}

const INPUT_CLASSES: &str = "w-full px-3 py-2 border border-neutral-300 dark:border-neutral-600 \
    rounded-md shadow-sm bg-white dark:bg-neutral-700 \
    text-neutral-900 dark:text-neutral-100 \
    focus:outline-none focus:ring-2 focus:ring-neutral-500 focus:border-neutral-500 \
    dark:focus:ring-neutral-400 dark:focus:border-neutral-400";

#[function_component]
pub fn LoginForm(props: &LoginFormProps) -> Html {
    let login = use_login();

    let email_ref = use_node_ref();
    let password_ref = use_node_ref();
    let validation_error = use_state(|| None::<String>);

    // Tell the parent once the newest attempt succeeds.
    {
        let on_success = props.on_success.clone();
        let user = login.data().cloned();
        use_effect_with(user, move |user| {
            if let Some(user) = user {
                on_success.emit(user.clone());
            }
        });
    }

    let on_submit = {
        let email_ref = email_ref.clone();
        let password_ref = password_ref.clone();
        let validation_error = validation_error.clone();
        let execute = login.execute.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let (Some(email_input), Some(password_input)) = (
                email_ref.cast::<HtmlInputElement>(),
                password_ref.cast::<HtmlInputElement>(),
            ) else {
                return;
            };

            let credentials = requests::LoginCredentials {
                email: email_input.value().trim().to_string(),
                password: password_input.value(),
            };
            if let Err(message) = credentials.validate() {
                validation_error.set(Some(message));
                return;
            }

            validation_error.set(None);
            execute.emit(credentials);
        })
    };

    let error = (*validation_error)
        .clone()
        .or_else(|| login.error().map(str::to_string));

    html! {
        <div class="max-w-md w-full bg-white dark:bg-neutral-800 p-8 rounded-lg shadow-md">
            <div class="mb-8 text-center">
                <h1 class="text-2xl font-bold text-neutral-900 dark:text-neutral-100 mb-2">
                    {&props.title}
                </h1>
                <p class="text-neutral-600 dark:text-neutral-400">
                    {&props.description}
                </p>
            </div>

            <form onsubmit={on_submit} class="space-y-6">
                if let Some(error) = error {
                    <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800">
                        <p class="text-sm text-red-700 dark:text-red-400">{error}</p>
                    </div>
                }

                <div>
                    <label for="email" class="block text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-2">
                        {"Email"}
                    </label>
                    <input
                        ref={email_ref}
                        type="email"
                        id="email"
                        name="email"
                        autocomplete="email"
                        required={true}
                        class={INPUT_CLASSES}
                        placeholder="Enter your email"
                    />
                </div>

                <div>
                    <label for="password" class="block text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-2">
                        {"Password"}
                    </label>
                    <input
                        ref={password_ref}
                        type="password"
                        id="password"
                        name="password"
                        autocomplete="current-password"
                        required={true}
                        class={INPUT_CLASSES}
                        placeholder="Enter your password"
                    />
                </div>

                <button
                    type="submit"
                    disabled={login.is_loading()}
                    class="w-full flex justify-center py-2 px-4 border border-transparent
                           rounded-md shadow-sm text-sm font-medium text-white
                           bg-neutral-900 hover:bg-neutral-800
                           dark:bg-neutral-100 dark:text-neutral-900 dark:hover:bg-neutral-200
                           disabled:opacity-50 disabled:cursor-not-allowed
                           transition-colors duration-200"
                >
                    if login.is_loading() {
                        {"Signing in..."}
                    } else {
                        {"Sign in"}
                    }
                </button>
            </form>

            if props.show_dev_credentials {
                <div class="mt-6 text-center">
                    <p class="text-sm text-neutral-600 dark:text-neutral-400">
                        {"Development credentials: manager@clinic.test / supersecret"}
                    </p>
                </div>
            }
        </div>
    }
}
