use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    stopped: AtomicBool,
    notify: Notify,
}

/// Cloneable request to stop a run early.
///
/// Workers check it between attempts; an in-flight request always completes and is counted.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    inner: Arc<Inner>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.inner.stopped.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::Acquire)
    }

    /// Resolves once [`StopSignal::stop`] has been called.
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking the flag so a concurrent `stop` is not missed.
            notified.as_mut().enable();
            if self.is_stopped() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn wait_returns_after_stop_from_another_task() {
        let stop = StopSignal::new();
        let waiter = {
            let stop = stop.clone();
            tokio::spawn(async move { stop.wait().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!stop.is_stopped());
        stop.stop();

        match tokio::time::timeout(Duration::from_secs(2), waiter).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => panic!("waiter panicked: {err}"),
            Err(_) => panic!("waiter did not observe stop"),
        }
    }

    #[tokio::test]
    async fn wait_returns_immediately_when_already_stopped() {
        let stop = StopSignal::new();
        stop.stop();
        let res = tokio::time::timeout(Duration::from_millis(200), stop.wait()).await;
        assert!(res.is_ok());
        assert!(stop.clone().is_stopped());
    }
}
