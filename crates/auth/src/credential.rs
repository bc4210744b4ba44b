use serde::{Deserialize, Serialize};

use crate::Role;

/// Access/refresh token pair as returned by the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Stored credential of the logged-in user.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    pub owner_email: String,
}

/// What the refresher needs to obtain a new pair: the identity and its
/// refresh token. The access token may already be gone.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshIdentity {
    pub email: String,
    pub refresh_token: String,
}

/// A full login: credential plus role indicator, always written together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub credential: Credential,
    pub role: Role,
}

impl Credential {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        owner_email: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            owner_email: owner_email.into(),
        }
    }

    pub fn tokens(&self) -> TokenPair {
        TokenPair {
            token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

// Tokens are bearer secrets; keep them out of logs.
impl core::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenPair")
            .field("token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("owner_email", &self.owner_email)
            .finish()
    }
}

impl core::fmt::Debug for RefreshIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RefreshIdentity")
            .field("email", &self.email)
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}
