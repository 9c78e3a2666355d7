//! Cancellable delayed signals.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A one-shot signal raised after a delay unless cancelled first.
///
/// The timer runs on a spawned tokio task.
/// Dropping the action cancels it, so a signal never outlives its owner.
#[derive(Debug)]
pub struct DeferredAction {
    handle: JoinHandle<()>,
    fired: watch::Receiver<bool>,
}

impl DeferredAction {
    /// Start the timer. Must be called from within a tokio runtime.
    pub fn schedule(delay: Duration) -> Self {
        let (tx, fired) = watch::channel(false);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(true);
        });
        Self { handle, fired }
    }

    pub fn has_fired(&self) -> bool {
        *self.fired.borrow()
    }

    /// Cancel the signal. No-op if it already fired.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Wait for the signal.
    ///
    /// Returns `false` if the action was cancelled before it fired.
    pub async fn fired(&mut self) -> bool {
        self.fired.wait_for(|fired| *fired).await.is_ok()
    }
}

impl Drop for DeferredAction {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let start = Instant::now();
        let mut action = DeferredAction::schedule(Duration::from_millis(2000));
        assert!(!action.has_fired());

        assert!(action.fired().await);
        assert!(action.has_fired());
        assert!(start.elapsed() >= Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_fire_early() {
        let action = DeferredAction::schedule(Duration::from_millis(2000));
        tokio::time::advance(Duration::from_millis(1999)).await;
        tokio::task::yield_now().await;
        assert!(!action.has_fired());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_action_never_fires() {
        let mut action = DeferredAction::schedule(Duration::from_millis(2000));
        action.cancel();
        assert!(!action.fired().await);
        assert!(!action.has_fired());
    }
}
