use payloads::UserInfo;
use yew::prelude::*;

use crate::get_api_client;
use crate::hooks::{ApiHandle, use_api, use_session};
use crate::session::refresh_profile;

/// Reload the signed-in user's profile, picking up role or permission
/// changes made since sign-in without resolving the session again.
#[hook]
pub fn use_refresh_profile() -> ApiHandle<UserInfo> {
    let session = use_session();

    use_api(None, move || {
        let session = session.clone();
        async move {
            let (user, action) =
                session.observe(refresh_profile(&get_api_client()).await)?;
            session.dispatch(action);
            Ok::<_, payloads::ClientError>(user)
        }
    })
}
