//! Cart synchronizer.
//!
//! Two channels feed the same subscribers:
//!
//! - [`CartSignal::Updated`] is raised by [`CartSynchronizer::publish`] right
//!   after a local save (the document-scoped `cartUpdated` event).
//! - [`CartSignal::Storage`] is raised by a [`StorageWatcher`] when another
//!   context rewrites the cart record. Writes made by this context never
//!   produce it.
//!
//! Subscribers react to either signal the same way: re-load the cart and
//! replace their state. Concurrent writers in different contexts are not
//! merged; the last completed save wins and every subscriber converges on it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::storage::KeyValueStorage;
use crate::store::RecordCartStore;

/// Name of the same-context change event.
pub const CART_UPDATED_EVENT: &str = "cartUpdated";

const SIGNAL_CAPACITY: usize = 64;

/// A cart change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartSignal {
    /// This context saved the cart.
    Updated,
    /// Another context saved the cart.
    Storage,
}

/// Publish/subscribe hub for one context.
///
/// Clones share the same channel.
#[derive(Debug, Clone)]
pub struct CartSynchronizer {
    tx: broadcast::Sender<CartSignal>,
}

impl Default for CartSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CartSynchronizer {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self { tx }
    }

    /// Register a listener. It receives every signal sent after this call.
    #[must_use]
    pub fn subscribe(&self) -> CartSubscription {
        CartSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Announce a local save to every listener in this context.
    pub fn publish(&self) {
        self.notify(CartSignal::Updated);
    }

    pub(crate) fn notify(&self, signal: CartSignal) {
        // No listeners is fine; the record is already saved.
        let receivers = self.tx.send(signal).unwrap_or(0);
        tracing::debug!(?signal, receivers, "Cart signal sent");
    }

    /// Start watching `store`'s record for writes from other contexts.
    ///
    /// The current record becomes the baseline. Must be called from within a
    /// Tokio runtime; the watcher stops when the returned guard is dropped.
    #[must_use]
    pub fn watch_storage<S>(
        &self,
        store: Arc<RecordCartStore<S>>,
        poll_interval: Duration,
    ) -> StorageWatcher
    where
        S: KeyValueStorage + 'static,
    {
        if let Err(e) = store.poll_external_change() {
            tracing::warn!(error = %e, "Failed to read cart record baseline");
        }

        let sync = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                match store.poll_external_change() {
                    Ok(true) => sync.notify(CartSignal::Storage),
                    Ok(false) => {}
                    Err(e) => tracing::warn!(error = %e, "Failed to poll cart record"),
                }
            }
        });

        StorageWatcher { handle }
    }
}

/// Receiving end of a [`CartSynchronizer`].
#[derive(Debug)]
pub struct CartSubscription {
    rx: broadcast::Receiver<CartSignal>,
}

impl CartSubscription {
    /// Wait for the next signal. `None` once every sender is gone.
    ///
    /// A listener that fell behind skips to the oldest retained signal;
    /// since listeners re-load on any signal, nothing is lost.
    pub async fn recv(&mut self) -> Option<CartSignal> {
        loop {
            match self.rx.recv().await {
                Ok(signal) => return Some(signal),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Cart listener lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take a pending signal without waiting.
    pub fn try_recv(&mut self) -> Option<CartSignal> {
        loop {
            match self.rx.try_recv() {
                Ok(signal) => return Some(signal),
                Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}

/// Guard for a background storage poller. Dropping it stops the poller.
#[derive(Debug)]
pub struct StorageWatcher {
    handle: JoinHandle<()>,
}

impl Drop for StorageWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ecocycle_core::Cart;

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::{CartStore, parse_record};

    const POLL: Duration = Duration::from_millis(10);
    const WAIT: Duration = Duration::from_secs(2);

    #[test]
    fn test_publish_reaches_every_subscriber() {
        let sync = CartSynchronizer::new();
        let mut header = sync.subscribe();
        let mut cart_page = sync.subscribe();

        sync.publish();

        assert_eq!(header.try_recv(), Some(CartSignal::Updated));
        assert_eq!(cart_page.try_recv(), Some(CartSignal::Updated));
        assert_eq!(header.try_recv(), None);
    }

    #[test]
    fn test_publish_without_subscribers() {
        CartSynchronizer::new().publish();
    }

    #[tokio::test]
    async fn test_recv_ends_when_senders_dropped() {
        let sync = CartSynchronizer::new();
        let mut sub = sync.subscribe();
        drop(sync);
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn test_watcher_signals_other_context_writes() {
        let storage = MemoryStorage::new();
        let here = Arc::new(RecordCartStore::new(storage.clone(), "cart"));
        let elsewhere = RecordCartStore::new(storage, "cart");

        let sync = CartSynchronizer::new();
        let mut sub = sync.subscribe();
        let _watcher = sync.watch_storage(Arc::clone(&here), POLL);

        let cart = parse_record(r#"[{"id":1,"name":"A","points":1}]"#).unwrap();
        elsewhere.save(&cart).unwrap();

        let signal = tokio::time::timeout(WAIT, sub.recv()).await.unwrap();
        assert_eq!(signal, Some(CartSignal::Storage));
        assert_eq!(here.load(), cart);
    }

    #[tokio::test]
    async fn test_watcher_ignores_own_writes() {
        let store = Arc::new(RecordCartStore::new(MemoryStorage::new(), "cart"));
        let sync = CartSynchronizer::new();
        let mut sub = sync.subscribe();
        let _watcher = sync.watch_storage(Arc::clone(&store), POLL);

        store.save(&Cart::new()).unwrap();
        tokio::time::sleep(POLL * 5).await;

        assert_eq!(sub.try_recv(), None);
    }
}
