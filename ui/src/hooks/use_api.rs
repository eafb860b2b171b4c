use std::fmt::Display;
use std::future::Future;
use std::rc::Rc;

use yew::prelude::*;

use crate::request::{RequestState, SharedRequest};

/// What a component gets back from [`use_api`] / [`use_api_with_params`].
pub struct ApiHandle<T, P = ()> {
    pub state: RequestState<T>,
    /// Start an invocation. Only the most recent invocation can settle.
    pub execute: Callback<P>,
    /// Return to the initial state and discard in-flight results.
    pub reset: Callback<()>,
}

impl<T, P> ApiHandle<T, P> {
    pub fn data(&self) -> Option<&T> {
        self.state.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }
}

/// Drive an async API call that takes parameters.
///
/// The call is not made until `execute` is emitted. The closure passed in on
/// the latest render is the one used, so it may capture props freely.
///
/// # Example
///
/// ```rust,ignore
/// let approve = use_api_with_params(None, |id: AppointmentId| async move {
///     get_api_client().approve_appointment(&id).await
/// });
/// let onclick = {
///     let execute = approve.execute.clone();
///     Callback::from(move |_| execute.emit(appointment_id))
/// };
/// ```
#[hook]
pub fn use_api_with_params<T, P, F, Fut, E>(
    initial: Option<T>,
    api_fn: F,
) -> ApiHandle<T, P>
where
    T: Clone + 'static,
    P: 'static,
    F: Fn(P) -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
    E: Display + 'static,
{
    let update = use_force_update();
    let request = use_memo((), move |_| {
        SharedRequest::new(initial, move || update.force_update())
    });

    let latest = use_mut_ref(|| None::<Rc<F>>);
    *latest.borrow_mut() = Some(Rc::new(api_fn));

    let execute = {
        let request = (*request).clone();
        let latest = latest.clone();
        Callback::from(move |params: P| {
            let Some(api_fn) = latest.borrow().clone() else {
                return;
            };
            let call = api_fn(params);
            let request = request.clone();
            yew::platform::spawn_local(async move {
                request.execute(call).await;
            });
        })
    };

    let reset = {
        let request = (*request).clone();
        Callback::from(move |_| request.reset())
    };

    ApiHandle {
        state: request.snapshot(),
        execute,
        reset,
    }
}

/// [`use_api_with_params`] for calls without parameters.
#[hook]
pub fn use_api<T, F, Fut, E>(initial: Option<T>, api_fn: F) -> ApiHandle<T>
where
    T: Clone + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
    E: Display + 'static,
{
    use_api_with_params(initial, move |()| api_fn())
}
