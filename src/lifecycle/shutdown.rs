//! Shutdown coordination for the server.
//!
//! A [`Shutdown`] fires once; every [`ShutdownSignal`] handed out by
//! [`Shutdown::subscribe`] resolves after that, including signals created
//! after the trigger.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

/// Receiving half held by a server task.
pub struct ShutdownSignal {
    rx: broadcast::Receiver<()>,
    triggered: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
            triggered: self.triggered.clone(),
        }
    }

    /// Fire the signal. Only the first call has any effect.
    pub fn trigger(&self) {
        if self.triggered.swap(true, Ordering::AcqRel) {
            return;
        }
        tracing::info!(receivers = self.tx.receiver_count(), "Shutdown triggered");
        let _ = self.tx.send(());
    }

    /// Wait for `event`, then fire the signal.
    ///
    /// `main` passes [`super::signals::wait_for_signal`]; tests pass any future.
    pub async fn trigger_on<F>(&self, event: F)
    where
        F: Future<Output = ()>,
    {
        event.await;
        self.trigger();
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::Acquire)
    }

    /// Number of signals still waiting.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Resolve once shutdown has been triggered or the coordinator is gone.
    pub async fn recv(mut self) {
        if self.triggered.load(Ordering::Acquire) {
            return;
        }
        let _ = self.rx.recv().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn test_trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let first = shutdown.subscribe();
        let second = shutdown.subscribe();
        assert_eq!(shutdown.receiver_count(), 2);

        shutdown.trigger();
        assert!(timeout(WAIT, first.recv()).await.is_ok());
        assert!(timeout(WAIT, second.recv()).await.is_ok());
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_earlier_trigger() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        shutdown.trigger();
        assert!(shutdown.is_triggered());

        assert!(timeout(WAIT, shutdown.subscribe().recv()).await.is_ok());
    }

    #[tokio::test]
    async fn test_trigger_on_waits_for_event() {
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        let (tx, rx) = oneshot::channel::<()>();

        let waiter = shutdown.trigger_on(async {
            let _ = rx.await;
        });
        tokio::pin!(waiter);

        assert!(timeout(Duration::from_millis(50), &mut waiter).await.is_err());
        assert!(!shutdown.is_triggered());

        tx.send(()).unwrap();
        timeout(WAIT, &mut waiter).await.unwrap();
        assert!(shutdown.is_triggered());
        assert!(timeout(WAIT, signal.recv()).await.is_ok());
    }

    #[tokio::test]
    async fn test_dropped_coordinator_releases_signal() {
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        drop(shutdown);
        assert!(timeout(WAIT, signal.recv()).await.is_ok());
    }
}
