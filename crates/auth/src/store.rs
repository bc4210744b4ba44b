//! Session storage abstraction.
//!
//! The durable layout is a flat key-value record (`token`, `refreshToken`,
//! `email`, `role`, `rememberedEmail`). Callers never touch the keys directly:
//! they go through [`SessionStore`], whose writes keep credential and role
//! consistent with each other.

use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::{Credential, RefreshIdentity, Role, Session, TokenPair};

/// Typed get/set/clear contract over the client's durable session state.
pub trait SessionStore: Send + Sync {
    /// Full credential, present only when token, refresh token and email are all stored.
    fn credential(&self) -> Result<Option<Credential>, StoreError>;

    /// Email and refresh token, if both are stored.
    fn refresh_identity(&self) -> Result<Option<RefreshIdentity>, StoreError>;

    /// Decoded role indicator. Unknown stored values decode to `None`.
    fn role(&self) -> Result<Option<Role>, StoreError>;

    /// Persist a login: credential and role in a single write.
    fn save_session(&self, session: &Session) -> Result<(), StoreError>;

    /// Swap in a refreshed pair, but only while the stored email and refresh
    /// token are still the ones `sent` carried. Returns `false` (and writes
    /// nothing) when the session changed meanwhile.
    fn replace_tokens(
        &self,
        sent: &RefreshIdentity,
        tokens: &TokenPair,
    ) -> Result<bool, StoreError>;

    fn remembered_email(&self) -> Result<Option<String>, StoreError>;

    fn set_remembered_email(&self, email: Option<&str>) -> Result<(), StoreError>;

    /// Remove everything (logout).
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session storage IO failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode session storage: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The raw key-value record as persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "rememberedEmail", default, skip_serializing_if = "Option::is_none")]
    pub remembered_email: Option<String>,
}

impl StorageEntries {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn credential(&self) -> Option<Credential> {
        match (&self.token, &self.refresh_token, &self.email) {
            (Some(token), Some(refresh), Some(email))
                if !token.is_empty() && !refresh.is_empty() && !email.is_empty() =>
            {
                Some(Credential::new(token, refresh, email))
            }
            _ => None,
        }
    }

    pub fn refresh_identity(&self) -> Option<RefreshIdentity> {
        match (&self.email, &self.refresh_token) {
            (Some(email), Some(refresh)) if !email.is_empty() && !refresh.is_empty() => {
                Some(RefreshIdentity {
                    email: email.clone(),
                    refresh_token: refresh.clone(),
                })
            }
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::from_stored)
    }

    pub fn apply_session(&mut self, session: &Session) {
        let credential = &session.credential;
        self.token = Some(credential.access_token.clone());
        self.refresh_token = Some(credential.refresh_token.clone());
        self.email = Some(credential.owner_email.clone());
        self.role = Some(session.role.to_stored());
    }

    /// Returns whether the pair was applied.
    pub fn apply_tokens(&mut self, sent: &RefreshIdentity, tokens: &TokenPair) -> bool {
        if self.email.as_deref() != Some(sent.email.as_str())
            || self.refresh_token.as_deref() != Some(sent.refresh_token.as_str())
        {
            return false;
        }
        self.token = Some(tokens.token.clone());
        self.refresh_token = Some(tokens.refresh_token.clone());
        true
    }
}

/// In-memory session store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: RwLock<StorageEntries>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an arbitrary raw record (e.g. a half-written or foreign one).
    pub fn from_entries(entries: StorageEntries) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn with_session(session: &Session) -> Self {
        let mut entries = StorageEntries::default();
        entries.apply_session(session);
        Self::from_entries(entries)
    }

    pub fn entries(&self) -> StorageEntries {
        self.read(|e| e.clone())
    }

    fn read<R>(&self, f: impl FnOnce(&StorageEntries) -> R) -> R {
        let guard = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut StorageEntries) -> R) -> R {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl SessionStore for InMemorySessionStore {
    fn credential(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self.read(StorageEntries::credential))
    }

    fn refresh_identity(&self) -> Result<Option<RefreshIdentity>, StoreError> {
        Ok(self.read(StorageEntries::refresh_identity))
    }

    fn role(&self) -> Result<Option<Role>, StoreError> {
        Ok(self.read(StorageEntries::role))
    }

    fn save_session(&self, session: &Session) -> Result<(), StoreError> {
        self.write(|e| e.apply_session(session));
        Ok(())
    }

    fn replace_tokens(
        &self,
        sent: &RefreshIdentity,
        tokens: &TokenPair,
    ) -> Result<bool, StoreError> {
        Ok(self.write(|e| e.apply_tokens(sent, tokens)))
    }

    fn remembered_email(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read(|e| e.remembered_email.clone()))
    }

    fn set_remembered_email(&self, email: Option<&str>) -> Result<(), StoreError> {
        self.write(|e| e.remembered_email = email.map(str::to_string));
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.write(|e| *e = StorageEntries::default());
        Ok(())
    }
}
