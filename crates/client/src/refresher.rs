//! Token pair refresh.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tradenest_auth::{SessionStore, StoreError};

use crate::backend::{AuthApi, RefreshRequest};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New pair stored.
    Refreshed,
    /// No email/refresh token stored; nothing was sent.
    NotLoggedIn,
    /// Another refresh is still running; nothing was sent.
    AlreadyInFlight,
    /// The backend answered, but the session changed meanwhile (logout or
    /// another login); the response was discarded.
    Superseded,
}

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("refresh request failed: {0}")]
    Api(#[from] ApiError),
    #[error("failed to access session storage: {0}")]
    Store(#[from] StoreError),
}

/// Exchanges the stored refresh token for a new pair.
///
/// At most one refresh is in flight at a time. Failures are returned, never
/// acted upon: stored credentials stay exactly as they were.
pub struct TokenRefresher {
    store: Arc<dyn SessionStore>,
    api: Arc<dyn AuthApi>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when dropped, including on cancellation.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl TokenRefresher {
    pub fn new(store: Arc<dyn SessionStore>, api: Arc<dyn AuthApi>) -> Self {
        Self {
            store,
            api,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn try_refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        let Some(identity) = self.store.refresh_identity()? else {
            return Ok(RefreshOutcome::NotLoggedIn);
        };

        let Some(_flight) = InFlight::acquire(&self.in_flight) else {
            return Ok(RefreshOutcome::AlreadyInFlight);
        };

        let request = RefreshRequest {
            email: identity.email.clone(),
            refresh_token: identity.refresh_token.clone(),
        };
        let pair = self.api.refresh(&request).await?;

        // Compare-and-swap against what was sent: a logout or re-login in the
        // meantime wins over this response.
        if self.store.replace_tokens(&identity, &pair)? {
            Ok(RefreshOutcome::Refreshed)
        } else {
            Ok(RefreshOutcome::Superseded)
        }
    }
}
