//! Durable client-side credentials.
//!
//! Three credentials make up a session: the access token, the refresh token
//! and the user id. Each is stored with its own expiry, derived from a
//! [`CredentialPolicy`], and reads as absent once expired. They are always
//! cleared together.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    AccessToken,
    RefreshToken,
    UserId,
}

impl CredentialKind {
    pub const ALL: [CredentialKind; 3] =
        [Self::AccessToken, Self::RefreshToken, Self::UserId];

    /// Storage key used by persistent backends.
    pub fn key(self) -> &'static str {
        match self {
            Self::AccessToken => "clinic.access_token",
            Self::RefreshToken => "clinic.refresh_token",
            Self::UserId => "clinic.user_id",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredential {
    pub value: String,
    pub expires_at: Timestamp,
}

impl StoredCredential {
    pub fn is_live(&self, now: Timestamp) -> bool {
        now < self.expires_at
    }
}

/// How long each credential survives. The access token is short-lived; the
/// refresh token and user id outlive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialPolicy {
    pub access_ttl: SignedDuration,
    pub refresh_ttl: SignedDuration,
    pub user_id_ttl: SignedDuration,
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self {
            access_ttl: SignedDuration::from_hours(1),
            refresh_ttl: SignedDuration::from_hours(24 * 7),
            user_id_ttl: SignedDuration::from_hours(24 * 7),
        }
    }
}

impl CredentialPolicy {
    pub fn ttl(&self, kind: CredentialKind) -> SignedDuration {
        match kind {
            CredentialKind::AccessToken => self.access_ttl,
            CredentialKind::RefreshToken => self.refresh_ttl,
            CredentialKind::UserId => self.user_id_ttl,
        }
    }

    pub fn stamp(
        &self,
        kind: CredentialKind,
        value: impl Into<String>,
        now: Timestamp,
    ) -> StoredCredential {
        StoredCredential {
            value: value.into(),
            expires_at: now.checked_add(self.ttl(kind)).unwrap_or(Timestamp::MAX),
        }
    }
}

/// Storage for the session credentials.
///
/// Implementors provide raw slot access; expiry and the save/clear contract
/// are shared.
pub trait CredentialStore: Send + Sync {
    fn read(&self, kind: CredentialKind) -> Option<StoredCredential>;

    fn write(&self, kind: CredentialKind, credential: Option<StoredCredential>);

    fn policy(&self) -> CredentialPolicy;

    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    /// The live value of a credential. Expired values are dropped on read.
    fn get(&self, kind: CredentialKind) -> Option<String> {
        let credential = self.read(kind)?;
        if credential.is_live(self.now()) {
            Some(credential.value)
        } else {
            self.write(kind, None);
            None
        }
    }

    fn access_token(&self) -> Option<String> {
        self.get(CredentialKind::AccessToken)
    }

    fn refresh_token(&self) -> Option<String> {
        self.get(CredentialKind::RefreshToken)
    }

    fn user_id(&self) -> Option<UserId> {
        self.get(CredentialKind::UserId)?.parse().ok().map(UserId)
    }

    /// True if there is anything worth trying to resume a session with.
    fn has_session(&self) -> bool {
        self.access_token().is_some() || self.refresh_token().is_some()
    }

    fn save(&self, tokens: &TokenPair, user_id: UserId) {
        let now = self.now();
        let policy = self.policy();
        self.write(
            CredentialKind::AccessToken,
            Some(policy.stamp(
                CredentialKind::AccessToken,
                &tokens.access_token,
                now,
            )),
        );
        self.write(
            CredentialKind::RefreshToken,
            Some(policy.stamp(
                CredentialKind::RefreshToken,
                &tokens.refresh_token,
                now,
            )),
        );
        self.write(
            CredentialKind::UserId,
            Some(policy.stamp(CredentialKind::UserId, user_id.to_string(), now)),
        );
    }

    /// Store a refreshed access token, and the refresh token if it rotated.
    fn update_tokens(&self, access_token: &str, refresh_token: Option<&str>) {
        let now = self.now();
        let policy = self.policy();
        self.write(
            CredentialKind::AccessToken,
            Some(policy.stamp(CredentialKind::AccessToken, access_token, now)),
        );
        if let Some(refresh_token) = refresh_token {
            self.write(
                CredentialKind::RefreshToken,
                Some(policy.stamp(
                    CredentialKind::RefreshToken,
                    refresh_token,
                    now,
                )),
            );
        }
    }

    fn clear(&self) {
        for kind in CredentialKind::ALL {
            self.write(kind, None);
        }
    }
}

/// In-process credential storage, used natively and in tests.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    slots: Mutex<HashMap<CredentialKind, StoredCredential>>,
    policy: CredentialPolicy,
    /// Fixed clock for tests; real time when unset.
    clock: Mutex<Option<Timestamp>>,
}

impl MemoryCredentials {
    pub fn new(policy: CredentialPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn set_now(&self, now: Timestamp) {
        *self.clock.lock().unwrap_or_else(PoisonError::into_inner) = Some(now);
    }
}

impl CredentialStore for MemoryCredentials {
    fn read(&self, kind: CredentialKind) -> Option<StoredCredential> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
    }

    fn write(&self, kind: CredentialKind, credential: Option<StoredCredential>) {
        let mut slots =
            self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        match credential {
            Some(credential) => {
                slots.insert(kind, credential);
            }
            None => {
                slots.remove(&kind);
            }
        }
    }

    fn policy(&self) -> CredentialPolicy {
        self.policy
    }

    fn now(&self) -> Timestamp {
        let clock = *self.clock.lock().unwrap_or_else(PoisonError::into_inner);
        clock.unwrap_or_else(Timestamp::now)
    }
}
