//! Authenticated session state.
//!
//! The session is an explicitly provided context ([`SessionProvider`]) rather
//! than a global store. Only `{user, is_authenticated}` survive a reload, and
//! they are written through [`PersistedSession`] by the provider; `is_loading`
//! and `error` always start from their defaults.

use std::rc::Rc;

use payloads::{APIClient, ClientError, PermissionEvaluator, UserInfo};
use serde::{Deserialize, Serialize};
use yew::prelude::*;

use crate::{get_api_client, storage};

/// Where auth resolution stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthPhase<'a> {
    /// Nothing has been checked yet.
    Unknown,
    Loading,
    Authenticated(&'a UserInfo),
    Anonymous,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    user: Option<UserInfo>,
    pub is_loading: bool,
    pub error: Option<String>,
    resolved: bool,
}

#[derive(Debug, Clone)]
pub enum SessionAction {
    BeginResolution,
    Authenticated(UserInfo),
    Anonymous,
    Failed(String),
    SetUser(UserInfo),
    LoggedOut,
}

impl SessionState {
    pub fn restore(persisted: Option<PersistedSession>) -> Self {
        match persisted {
            Some(PersistedSession {
                user: Some(user),
                is_authenticated: true,
            }) => Self {
                user: Some(user),
                resolved: true,
                ..Default::default()
            },
            _ => Self::default(),
        }
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn phase(&self) -> AuthPhase<'_> {
        match &self.user {
            Some(user) => AuthPhase::Authenticated(user),
            None if self.is_loading => AuthPhase::Loading,
            None if !self.resolved => AuthPhase::Unknown,
            None => AuthPhase::Anonymous,
        }
    }

    pub fn evaluator(&self) -> PermissionEvaluator<'_> {
        PermissionEvaluator::new(self.user())
    }

    pub fn persisted(&self) -> PersistedSession {
        PersistedSession {
            user: self.user.clone(),
            is_authenticated: self.is_authenticated(),
        }
    }

    pub fn apply(&mut self, action: SessionAction) {
        match action {
            SessionAction::BeginResolution => {
                self.is_loading = true;
                self.error = None;
            }
            SessionAction::Authenticated(user) => {
                self.user = Some(user);
                self.is_loading = false;
                self.error = None;
                self.resolved = true;
            }
            SessionAction::Anonymous | SessionAction::LoggedOut => {
                self.user = None;
                self.is_loading = false;
                self.error = None;
                self.resolved = true;
            }
            SessionAction::Failed(message) => {
                self.user = None;
                self.is_loading = false;
                self.error = Some(message);
                self.resolved = true;
            }
            SessionAction::SetUser(user) => {
                self.user = Some(user);
            }
        }
    }
}

impl Reducible for SessionState {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

/// The subset of the session that survives a reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub user: Option<UserInfo>,
    pub is_authenticated: bool,
}

/// Handle given to every component under [`SessionProvider`].
#[derive(Clone, PartialEq)]
pub struct SessionContext {
    state: UseReducerHandle<SessionState>,
}

impl SessionContext {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn dispatch(&self, action: SessionAction) {
        self.state.dispatch(action);
    }

    /// Drop the session if a call failed because it expired.
    pub fn observe<T>(
        &self,
        result: Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        if let Err(e) = &result {
            if e.is_session_expired() {
                tracing::info!("session expired, signing out");
                self.dispatch(SessionAction::LoggedOut);
            }
        }
        result
    }
}

/// Work out who is signed in from stored credentials.
pub async fn resolve_session(client: &APIClient) -> SessionAction {
    match client.resume_session().await {
        Ok(Some(user)) => SessionAction::Authenticated(user),
        Ok(None) => SessionAction::Anonymous,
        Err(e) => {
            tracing::warn!("could not resume session: {e}");
            SessionAction::Anonymous
        }
    }
}

/// Fetch the current profile for a session that is already signed in.
pub async fn refresh_profile(
    client: &APIClient,
) -> Result<(UserInfo, SessionAction), ClientError> {
    let user = client.current_user().await?;
    Ok((user.clone(), SessionAction::SetUser(user)))
}

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub children: Children,
}

/// Owns the session for the whole app and resolves it once at startup.
#[function_component]
pub fn SessionProvider(props: &SessionProviderProps) -> Html {
    let state =
        use_reducer(|| SessionState::restore(storage::load_session()));

    // Write the persisted subset whenever it changes.
    {
        let persisted = state.persisted();
        use_effect_with(persisted, |persisted| {
            storage::save_session(persisted);
        });
    }

    // Resolve once per session; later changes come from explicit actions.
    {
        let state = state.clone();
        use_effect_with((), move |_| {
            let client = get_api_client();
            if client.credentials.has_session() {
                state.dispatch(SessionAction::BeginResolution);
                yew::platform::spawn_local(async move {
                    let action = resolve_session(&client).await;
                    state.dispatch(action);
                });
            } else {
                state.dispatch(SessionAction::Anonymous);
            }
        });
    }

    let context = SessionContext { state };

    html! {
        <ContextProvider<SessionContext> {context}>
            {for props.children.iter()}
        </ContextProvider<SessionContext>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payloads::{Permissions, Role, UserId};

    fn doctor() -> UserInfo {
        UserInfo {
            id: UserId::new(),
            name: "Le Van C".into(),
            email: "c@example.com".into(),
            role: Role::Doctor,
            permissions: Permissions::from_codes(&["LichHen_ALL"]),
        }
    }

    #[test]
    fn fresh_session_is_unknown() {
        let state = SessionState::default();
        assert_eq!(state.phase(), AuthPhase::Unknown);
        assert!(!state.is_authenticated());
    }

    #[test]
    fn resolution_flow() {
        let mut state = SessionState::default();
        state.apply(SessionAction::BeginResolution);
        assert_eq!(state.phase(), AuthPhase::Loading);
        assert!(state.is_loading);

        let user = doctor();
        state.apply(SessionAction::Authenticated(user.clone()));
        assert_eq!(state.phase(), AuthPhase::Authenticated(&user));
        assert!(state.is_authenticated());
        assert!(!state.is_loading);
    }

    #[test]
    fn failure_leaves_anonymous_with_error() {
        let mut state = SessionState::default();
        state.apply(SessionAction::BeginResolution);
        state.apply(SessionAction::Failed("Invalid credentials".into()));
        assert_eq!(state.phase(), AuthPhase::Anonymous);
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
        assert_eq!(state.user(), None);
    }

    #[test]
    fn authenticated_iff_user_after_every_action() {
        let actions = [
            SessionAction::BeginResolution,
            SessionAction::Authenticated(doctor()),
            SessionAction::BeginResolution,
            SessionAction::SetUser(doctor()),
            SessionAction::Failed("boom".into()),
            SessionAction::Authenticated(doctor()),
            SessionAction::LoggedOut,
            SessionAction::Anonymous,
        ];
        let mut state = SessionState::default();
        for action in actions {
            state.apply(action);
            assert_eq!(state.is_authenticated(), state.user().is_some());
            assert_eq!(
                state.persisted().is_authenticated,
                state.persisted().user.is_some()
            );
        }
    }

    #[test]
    fn profile_refresh_replaces_permissions_in_place() {
        let mut state = SessionState::default();
        state.apply(SessionAction::Authenticated(doctor()));
        state.apply(SessionAction::BeginResolution);

        let mut promoted = doctor();
        promoted.permissions = Permissions::from_codes(&["ThongKe_VIEW"]);
        state.apply(SessionAction::SetUser(promoted.clone()));

        assert_eq!(state.phase(), AuthPhase::Authenticated(&promoted));
        assert!(state.evaluator().has_permission("ThongKe"));
        assert!(!state.evaluator().has_permission("LichHen"));
        // only the user changes
        assert!(state.is_loading);
        assert_eq!(state.persisted().user, Some(promoted));
    }

    #[test]
    fn revalidating_a_restored_user_keeps_them_signed_in() {
        let user = doctor();
        let mut state = SessionState::restore(Some(PersistedSession {
            user: Some(user.clone()),
            is_authenticated: true,
        }));
        state.apply(SessionAction::BeginResolution);
        assert_eq!(state.phase(), AuthPhase::Authenticated(&user));
    }

    #[test]
    fn restore_only_trusts_consistent_snapshots() {
        let state = SessionState::restore(Some(PersistedSession {
            user: Some(doctor()),
            is_authenticated: false,
        }));
        assert_eq!(state, SessionState::default());

        let state = SessionState::restore(Some(PersistedSession {
            user: None,
            is_authenticated: true,
        }));
        assert_eq!(state, SessionState::default());
    }

    #[test]
    fn volatile_fields_are_not_persisted() -> Result<(), serde_json::Error> {
        let mut state = SessionState::default();
        state.apply(SessionAction::Authenticated(doctor()));
        state.apply(SessionAction::BeginResolution);
        state.error = Some("stale".into());

        let json = serde_json::to_value(state.persisted())?;
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);

        let restored = SessionState::restore(serde_json::from_value(json)?);
        assert!(!restored.is_loading);
        assert_eq!(restored.error, None);
        assert_eq!(restored.user(), state.user());
        Ok(())
    }

    #[test]
    fn evaluator_follows_the_user() {
        let mut state = SessionState::default();
        assert!(!state.evaluator().has_permission("LichHen"));
        state.apply(SessionAction::Authenticated(doctor()));
        assert!(state.evaluator().has_permission("LichHen"));
        assert!(state.evaluator().has_role("DOCTOR"));
        state.apply(SessionAction::LoggedOut);
        assert!(!state.evaluator().has_permission("LichHen"));
    }
}
