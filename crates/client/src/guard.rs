//! Activity-driven token refresh.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use crate::debounce::Debouncer;
use crate::refresher::{RefreshOutcome, TokenRefresher};

/// A user input signal used as a proxy for "user is present".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEvent {
    PointerMove,
    KeyPress,
    /// Synthetic first event issued when the guard mounts.
    Mount,
}

/// Background watcher that keeps the token pair fresh while the user is active.
///
/// Every activity event re-arms a single countdown. When the countdown runs
/// out, one refresh is attempted; its failure is logged and otherwise ignored,
/// and the countdown stays disarmed until the next activity.
pub struct SessionGuard {
    inner: Arc<GuardInner>,
}

/// Listener handed to whatever produces input events.
///
/// Holds only a weak reference: once the guard is unmounted, notifying is a
/// no-op.
#[derive(Clone)]
pub struct ActivityHandle {
    inner: Weak<GuardInner>,
}

struct GuardInner {
    debouncer: Debouncer,
    refresher: Arc<TokenRefresher>,
    refresh_after: Duration,
    mounted: AtomicBool,
}

impl SessionGuard {
    /// Start watching. Arms the first countdown right away.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(refresher: Arc<TokenRefresher>, refresh_after: Duration) -> Self {
        let inner = Arc::new(GuardInner {
            debouncer: Debouncer::new(),
            refresher,
            refresh_after,
            mounted: AtomicBool::new(true),
        });

        tracing::info!(refresh_after_secs = refresh_after.as_secs(), "session guard mounted");
        inner.on_activity(ActivityEvent::Mount);

        Self { inner }
    }

    pub fn listener(&self) -> ActivityHandle {
        ActivityHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn record_activity(&self, event: ActivityEvent) {
        self.inner.on_activity(event);
    }

    /// Whether a countdown is currently armed.
    pub fn is_armed(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    /// Stop watching; any armed countdown is cancelled. An already running
    /// refresh request is left to complete.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.inner.mounted.store(false, Ordering::Release);
        let cancelled = self.inner.debouncer.cancel();
        tracing::info!(cancelled, "session guard unmounted");
    }
}

impl ActivityHandle {
    pub fn notify(&self, event: ActivityEvent) {
        if let Some(inner) = self.inner.upgrade() {
            inner.on_activity(event);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.mounted.load(Ordering::Acquire))
    }
}

impl GuardInner {
    fn on_activity(&self, event: ActivityEvent) {
        if !self.mounted.load(Ordering::Acquire) {
            return;
        }

        tracing::trace!(?event, "activity; re-arming refresh countdown");
        let refresher = self.refresher.clone();
        self.debouncer
            .schedule(self.refresh_after, move || refresh_quietly(refresher));
    }
}

/// Soft-fail policy: a failed refresh is only logged. The stored pair stays
/// as it was and the next activity event re-arms the countdown.
async fn refresh_quietly(refresher: Arc<TokenRefresher>) {
    match refresher.try_refresh().await {
        Ok(RefreshOutcome::Refreshed) => tracing::info!("token refreshed"),
        Ok(RefreshOutcome::NotLoggedIn) => tracing::debug!("refresh skipped; not logged in"),
        Ok(RefreshOutcome::AlreadyInFlight) => {
            tracing::debug!("refresh skipped; another refresh is in flight")
        }
        Ok(RefreshOutcome::Superseded) => {
            tracing::debug!("refresh response discarded; session changed meanwhile")
        }
        Err(err) => tracing::warn!(error = %err, "token refresh failed"),
    }
}
