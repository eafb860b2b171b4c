use payloads::UserInfo;
use yew::prelude::*;

use crate::hooks::use_session;

/// Returns the signed-in user, or None if signed out or still checking.
#[hook]
pub fn use_require_auth() -> Option<UserInfo> {
    let session = use_session();
    session.state().user().cloned()
}
