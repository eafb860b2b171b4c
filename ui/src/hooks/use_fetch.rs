use std::fmt::Display;
use std::future::Future;
use yew::prelude::*;

use super::use_api;

/// Generic fetch hook return type
pub struct FetchHookReturn<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub refetch: Callback<()>,
}

impl<T: Clone> FetchHookReturn<T> {
    /// Returns true if this is the initial load (data not yet fetched,
    /// currently loading, and no error).
    pub fn is_initial_loading(&self) -> bool {
        self.is_loading && self.data.is_none() && self.error.is_none()
    }

    /// Render based on fetch state with contextual loading/error messages.
    ///
    /// - No data + loading: "Loading {context}..."
    /// - No data + error: "Error loading {context}: ..."
    /// - Has data: `render_fn(data, is_loading, error)`, where `error` comes
    ///   from a failed refetch and the previous data is still shown.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// services.render("services", |services, is_loading, error| html! {
    ///     <ServiceTable services={services.clone()} />
    /// })
    /// ```
    pub fn render<F>(&self, context: &str, render_fn: F) -> Html
    where
        F: Fn(&T, bool, Option<&String>) -> Html,
    {
        match self.data.as_ref() {
            None => {
                if let Some(error) = &self.error {
                    html! {
                        <div class="p-4 rounded-md bg-red-50 \
                                   dark:bg-red-900/20 border \
                                   border-red-200 dark:border-red-800">
                            <p class="text-sm text-red-700 \
                                      dark:text-red-400">
                                {format!("Error loading {}: {}", context, error)}
                            </p>
                        </div>
                    }
                } else {
                    // Not fetched yet counts as loading; the fetch starts in
                    // an effect after the first render.
                    html! {
                        <div class="text-center py-12">
                            <p class="text-neutral-600 dark:text-neutral-400">
                                {format!("Loading {}...", context)}
                            </p>
                        </div>
                    }
                }
            }
            Some(data) => render_fn(data, self.is_loading, self.error.as_ref()),
        }
    }
}

/// Generic fetch hook composer.
///
/// Fetches on mount and whenever `deps` change, and provides refetch
/// capability. The fetch function captures dependencies from the closure;
/// `deps` is only used for change tracking. Overlapping fetches resolve in
/// favour of the most recent one.
///
/// # Example
///
/// ```rust,ignore
/// #[hook]
/// pub fn use_vaccination_plans(
///     customer_id: Option<CustomerId>,
/// ) -> FetchHookReturn<Vec<responses::VaccinationPlan>> {
///     use_fetch(customer_id, move || async move {
///         get_api_client()
///             .list_vaccination_plans(&requests::PlanFilter { customer_id })
///             .await
///     })
/// }
/// ```
#[hook]
pub fn use_fetch<T, D, F, Fut, E>(deps: D, fetch_fn: F) -> FetchHookReturn<T>
where
    T: Clone + 'static,
    D: PartialEq + Clone + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
    E: Display + 'static,
{
    let api = use_api(None, fetch_fn);

    // Auto-fetch on mount and when deps change
    {
        let execute = api.execute.clone();
        use_effect_with(deps, move |_| {
            execute.emit(());
        });
    }

    let state = api.state;
    FetchHookReturn {
        data: state.data,
        is_loading: state.loading,
        error: state.error,
        refetch: api.execute,
    }
}
