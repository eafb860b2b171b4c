//! `localStorage` persistence for credentials and the session snapshot.

use payloads::{
    CredentialPolicy, CredentialStore, StoredCredential,
    credentials::CredentialKind,
};
use serde::{Serialize, de::DeserializeOwned};
use web_sys::Storage;

use crate::session::PersistedSession;

const SESSION_KEY: &str = "clinic.session";

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok()?
}

fn read_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let raw = local_storage()?.get_item(key).ok()??;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, "discarding unreadable stored value: {e}");
            remove(key);
            None
        }
    }
}

fn write_json(key: &str, value: &impl Serialize) {
    let Some(storage) = local_storage() else {
        return;
    };
    match serde_json::to_string(value) {
        Ok(raw) => {
            if storage.set_item(key, &raw).is_err() {
                tracing::warn!(key, "localStorage rejected write");
            }
        }
        Err(e) => tracing::error!(key, "could not encode value: {e}"),
    }
}

fn remove(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

/// Credentials kept in the browser's `localStorage`, one JSON entry per
/// credential with its expiry.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserCredentials {
    policy: CredentialPolicy,
}

impl BrowserCredentials {
    pub fn new(policy: CredentialPolicy) -> Self {
        Self { policy }
    }
}

impl CredentialStore for BrowserCredentials {
    fn read(&self, kind: CredentialKind) -> Option<StoredCredential> {
        read_json(kind.key())
    }

    fn write(&self, kind: CredentialKind, credential: Option<StoredCredential>) {
        match credential {
            Some(credential) => write_json(kind.key(), &credential),
            None => remove(kind.key()),
        }
    }

    fn policy(&self) -> CredentialPolicy {
        self.policy
    }
}

pub fn load_session() -> Option<PersistedSession> {
    read_json(SESSION_KEY)
}

/// Persist the durable part of the session. An anonymous session removes
/// the entry.
pub fn save_session(session: &PersistedSession) {
    if session.is_authenticated {
        write_json(SESSION_KEY, session);
    } else {
        remove(SESSION_KEY);
    }
}
