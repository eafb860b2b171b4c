//! The request lifecycle behind every data hook.
//!
//! A [`RequestMachine`] tracks one call site's `{data, loading, error,
//! status}` tuple. Each invocation takes a [`Ticket`]; only the newest ticket
//! may settle, so a slow response from an older invocation (or one that was
//! in flight when [`RequestMachine::reset`] ran) is dropped instead of
//! overwriting newer state.

use std::cell::RefCell;
use std::fmt::{self, Display};
use std::future::Future;
use std::rc::Rc;

use payloads::envelope::DEFAULT_ERROR_MESSAGE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Success,
    Error,
}

/// Snapshot of one request's lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    /// Last successful payload, or the initial data.
    pub data: Option<T>,
    /// True from invocation until the newest invocation settles.
    pub loading: bool,
    /// Message of the last failure. Cleared when a new invocation starts.
    pub error: Option<String>,
    /// Outcome of the last settled invocation; `None` before any.
    pub status: Option<RequestStatus>,
}

impl<T> RequestState<T> {
    pub fn initial(data: Option<T>) -> Self {
        Self {
            data,
            loading: false,
            error: None,
            status: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(RequestStatus::Success)
    }

    pub fn is_error(&self) -> bool {
        self.status == Some(RequestStatus::Error)
    }

    /// Loading for the first time: nothing to show yet and nothing failed.
    pub fn is_initial_loading(&self) -> bool {
        self.loading && self.data.is_none() && self.error.is_none()
    }
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::initial(None)
    }
}

/// Identifies one invocation of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct RequestMachine<T> {
    initial: Option<T>,
    state: RequestState<T>,
    latest: u64,
}

impl<T: Clone> RequestMachine<T> {
    pub fn new(initial: Option<T>) -> Self {
        Self {
            state: RequestState::initial(initial.clone()),
            initial,
            latest: 0,
        }
    }

    pub fn state(&self) -> &RequestState<T> {
        &self.state
    }

    /// Start an invocation. `status` keeps describing the previous settled
    /// invocation until this one settles.
    pub fn begin(&mut self) -> Ticket {
        self.latest += 1;
        self.state.loading = true;
        self.state.error = None;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Apply the outcome of an invocation. Returns false, leaving the state
    /// untouched, if a newer invocation or a reset superseded it.
    pub fn settle<E: Display>(
        &mut self,
        ticket: Ticket,
        result: Result<T, E>,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(%ticket, latest = self.latest, "dropping stale response");
            return false;
        }
        match result {
            Ok(data) => {
                self.state.data = Some(data);
                self.state.error = None;
                self.state.status = Some(RequestStatus::Success);
            }
            Err(e) => {
                let message = e.to_string();
                self.state.error = Some(if message.trim().is_empty() {
                    DEFAULT_ERROR_MESSAGE.to_string()
                } else {
                    message
                });
                self.state.status = Some(RequestStatus::Error);
            }
        }
        self.state.loading = false;
        true
    }

    /// Return to the initial tuple. In-flight invocations keep running but
    /// their results are discarded.
    pub fn reset(&mut self) {
        self.latest += 1;
        self.state = RequestState::initial(self.initial.clone());
    }
}

/// A [`RequestMachine`] shared between a component and the futures it
/// spawns, with a hook to re-render when the state changes.
pub struct SharedRequest<T> {
    machine: Rc<RefCell<RequestMachine<T>>>,
    on_change: Rc<dyn Fn()>,
}

impl<T> Clone for SharedRequest<T> {
    fn clone(&self) -> Self {
        Self {
            machine: self.machine.clone(),
            on_change: self.on_change.clone(),
        }
    }
}

impl<T: Clone> SharedRequest<T> {
    pub fn new(initial: Option<T>, on_change: impl Fn() + 'static) -> Self {
        Self {
            machine: Rc::new(RefCell::new(RequestMachine::new(initial))),
            on_change: Rc::new(on_change),
        }
    }

    pub fn snapshot(&self) -> RequestState<T> {
        self.machine.borrow().state().clone()
    }

    /// Run one invocation to settlement. Failures never escape; they end up
    /// in the state's `error` and `status`.
    pub async fn execute<Fut, E>(&self, call: Fut)
    where
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let ticket = self.machine.borrow_mut().begin();
        (self.on_change)();

        let result = call.await;

        let applied = self.machine.borrow_mut().settle(ticket, result);
        if applied {
            (self.on_change)();
        }
    }

    pub fn reset(&self) {
        self.machine.borrow_mut().reset();
        (self.on_change)();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::{LocalPool, block_on};
    use futures::task::LocalSpawnExt;
    use payloads::{ClientError, classify};
    use serde_json::{Value, json};
    use std::cell::Cell;

    fn fresh(initial: Option<i32>) -> RequestState<i32> {
        RequestState::initial(initial)
    }

    #[test]
    fn starts_in_initial_state() {
        let machine = RequestMachine::new(Some(7));
        assert_eq!(machine.state(), &fresh(Some(7)));
        assert_eq!(machine.state().status, None);
    }

    #[test]
    fn success_stores_data() {
        let request = SharedRequest::new(None, || {});
        block_on(request.execute(async { Ok::<_, String>(42) }));
        assert_eq!(
            request.snapshot(),
            RequestState {
                data: Some(42),
                loading: false,
                error: None,
                status: Some(RequestStatus::Success),
            }
        );
    }

    #[test]
    fn error_shaped_payload_keeps_previous_data() {
        let request = SharedRequest::new(Some(json!("before")), || {});
        block_on(request.execute(async {
            classify(json!({ "status": "error", "message": "boom" }))
                .map_err(ClientError::from)
        }));
        let state = request.snapshot();
        assert_eq!(state.data, Some(json!("before")));
        assert_eq!(state.error.as_deref(), Some("boom"));
        assert_eq!(state.status, Some(RequestStatus::Error));
        assert!(!state.loading);
    }

    #[test]
    fn failure_keeps_previous_data() {
        let request = SharedRequest::new(None, || {});
        block_on(request.execute(async { Ok::<_, String>(1) }));
        block_on(request.execute(async { Err::<i32, _>("x") }));
        let state = request.snapshot();
        assert_eq!(state.data, Some(1));
        assert_eq!(state.error.as_deref(), Some("x"));
        assert_eq!(state.status, Some(RequestStatus::Error));
        assert!(!state.loading);
    }

    #[test]
    fn empty_error_message_gets_default() {
        let request = SharedRequest::new(None, || {});
        block_on(request.execute(async { Err::<i32, _>("") }));
        assert_eq!(
            request.snapshot().error.as_deref(),
            Some(DEFAULT_ERROR_MESSAGE)
        );
    }

    #[test]
    fn loading_keeps_previous_status() {
        let mut machine = RequestMachine::new(None);
        let ticket = machine.begin();
        machine.settle(ticket, Err::<i32, _>("first"));

        machine.begin();
        let state = machine.state();
        assert!(state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.status, Some(RequestStatus::Error));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut machine = RequestMachine::new(Some(3));
        let ticket = machine.begin();
        machine.settle(ticket, Ok::<_, String>(9));

        machine.reset();
        let once = machine.state().clone();
        machine.reset();
        assert_eq!(machine.state(), &once);
        assert_eq!(once, fresh(Some(3)));
    }

    #[test]
    fn newest_invocation_wins_regardless_of_settle_order() {
        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        let request = SharedRequest::new(None, || {});

        let (first_tx, first_rx) = oneshot::channel::<Result<i32, String>>();
        let (second_tx, second_rx) = oneshot::channel::<Result<i32, String>>();
        // Start them one at a time so the invocation order is fixed.
        for rx in [first_rx, second_rx] {
            let request = request.clone();
            spawner
                .spawn_local(async move {
                    request
                        .execute(async move {
                            rx.await.unwrap_or_else(|_| Err("dropped".into()))
                        })
                        .await
                })
                .unwrap();
            pool.run_until_stalled();
        }
        assert!(request.snapshot().loading);

        second_tx.send(Ok(2)).unwrap();
        pool.run_until_stalled();
        assert_eq!(request.snapshot().data, Some(2));
        assert!(!request.snapshot().loading);

        first_tx.send(Ok(1)).unwrap();
        pool.run_until_stalled();
        assert_eq!(request.snapshot().data, Some(2));
    }

    #[test]
    fn stale_settlement_does_not_end_loading() {
        let mut machine = RequestMachine::new(None);
        let older = machine.begin();
        let newer = machine.begin();

        assert!(!machine.settle(older, Ok::<_, String>(1)));
        assert!(machine.state().loading);
        assert_eq!(machine.state().data, None);

        assert!(machine.settle(newer, Ok::<_, String>(2)));
        assert_eq!(machine.state().data, Some(2));
    }

    #[test]
    fn late_result_after_reset_is_dropped() {
        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        let renders = Rc::new(Cell::new(0));
        let request = {
            let renders = renders.clone();
            SharedRequest::new(Some(json!(null)), move || {
                renders.set(renders.get() + 1)
            })
        };

        let (tx, rx) = oneshot::channel::<Result<Value, String>>();
        {
            let request = request.clone();
            spawner
                .spawn_local(async move {
                    request
                        .execute(async move {
                            rx.await.unwrap_or_else(|_| Err("dropped".into()))
                        })
                        .await
                })
                .unwrap();
        }
        pool.run_until_stalled();
        request.reset();
        let renders_after_reset = renders.get();

        tx.send(Ok(json!("late"))).unwrap();
        pool.run_until_stalled();

        assert_eq!(request.snapshot(), RequestState::initial(Some(json!(null))));
        assert_eq!(renders.get(), renders_after_reset);
    }
}
