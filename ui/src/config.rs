//! Build-time client configuration.

use payloads::CredentialPolicy;

/// Settings baked in when the bundle is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend origin. `None` means same origin as the page.
    pub backend_url: Option<&'static str>,
    pub credential_policy: CredentialPolicy,
}

impl ClientConfig {
    pub fn from_build_env() -> Self {
        Self {
            backend_url: option_env!("BACKEND_URL")
                .map(|url| url.trim_end_matches('/'))
                .filter(|url| !url.is_empty()),
            credential_policy: CredentialPolicy::default(),
        }
    }

    /// The backend address, falling back to the page's origin.
    pub fn backend_address(&self) -> String {
        match self.backend_url {
            Some(url) => url.to_string(),
            None => web_sys::window()
                .and_then(|window| window.location().origin().ok())
                .unwrap_or_default(),
        }
    }
}
