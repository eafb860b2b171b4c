use payloads::{UserInfo, requests};
use yew::prelude::*;

use crate::hooks::{ApiHandle, use_api_with_params, use_session};
use crate::session::SessionAction;
use crate::get_api_client;

/// Sign in with email and password.
///
/// The session moves to loading while the request runs, then to
/// authenticated or to anonymous with the failure message.
#[hook]
pub fn use_login() -> ApiHandle<UserInfo, requests::LoginCredentials> {
    let session = use_session();

    use_api_with_params(None, move |credentials: requests::LoginCredentials| {
        let session = session.clone();
        async move {
            session.dispatch(SessionAction::BeginResolution);
            let result = get_api_client().login(&credentials).await;
            match &result {
                Ok(user) => {
                    tracing::info!(user = %user.id, "signed in");
                    session.dispatch(SessionAction::Authenticated(user.clone()));
                }
                Err(e) => {
                    session.dispatch(SessionAction::Failed(e.to_string()));
                }
            }
            result
        }
    })
}
