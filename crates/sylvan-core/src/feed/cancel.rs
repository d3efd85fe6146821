//! Explicit cancellation of in-flight page requests.
//!
//! The owner of a feed keeps the [`CancelHandle`] and cancels when the view
//! goes away or its filter changes. A cancelled request never mutates the
//! feed it was issued for.

use tokio::sync::watch;

/// Create a connected handle and signal.
pub fn cancellation() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle(tx), CancelSignal(rx))
}

/// Owner side: requests cancellation.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    /// Cancel every request observing this handle's signals.
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }

    /// Another signal connected to this handle.
    pub fn signal(&self) -> CancelSignal {
        CancelSignal(self.0.subscribe())
    }

    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }
}

/// Request side: observed while a request is in flight.
#[derive(Debug, Clone)]
pub struct CancelSignal(watch::Receiver<bool>);

impl CancelSignal {
    /// A signal that is never cancelled.
    pub fn never() -> Self {
        let (_, rx) = watch::channel(false);
        Self(rx)
    }

    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once cancellation is requested. Never resolves if the handle
    /// is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        if self.0.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
