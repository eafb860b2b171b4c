use yew::prelude::*;

use crate::session::SessionContext;

/// The session provided by [`SessionProvider`](crate::session::SessionProvider).
#[hook]
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
        .expect("use_session called outside of SessionProvider")
}
