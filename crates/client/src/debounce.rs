//! Cancel-and-rearm scheduling.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// At most one pending delayed call.
///
/// [`Debouncer::schedule`] cancels whatever is pending and arms a new call.
/// Once a delay elapses the call is handed off to its own task, so cancelling
/// afterwards (or dropping the debouncer) never interrupts a call already in
/// progress.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any pending call and run `task` after `delay`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&self, delay: Duration, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task());
        }));
    }

    /// Cancel the pending call, if any. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        match pending.take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    fn counting(counter: Arc<AtomicUsize>) -> impl FnOnce() -> std::future::Ready<()> + Send + 'static {
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_delay() {
        let calls = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new();

        debouncer.schedule(Duration::from_secs(10), counting(calls.clone()));
        settle().await;
        assert!(debouncer.is_pending());

        tokio::time::advance(Duration::from_secs(9)).await;
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_replaces_pending_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new();

        for _ in 0..5 {
            debouncer.schedule(Duration::from_secs(10), counting(calls.clone()));
            settle().await;
            tokio::time::advance(Duration::from_secs(6)).await;
            settle().await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_secs(4)).await;
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_prevent_the_call() {
        let calls = Arc::new(AtomicUsize::new(0));

        let debouncer = Debouncer::new();
        debouncer.schedule(Duration::from_secs(1), counting(calls.clone()));
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        let dropped = Debouncer::new();
        dropped.schedule(Duration::from_secs(1), counting(calls.clone()));
        drop(dropped);

        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_firing_does_not_interrupt_the_call() {
        let started = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new();

        let (s, f) = (started.clone(), finished.clone());
        debouncer.schedule(Duration::from_secs(1), move || async move {
            s.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(30)).await;
            f.fetch_add(1, Ordering::SeqCst);
        });
        settle().await;

        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(started.load(Ordering::SeqCst), 1);

        debouncer.cancel();
        tokio::time::advance(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }
}
