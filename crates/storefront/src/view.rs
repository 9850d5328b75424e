//! A rendered view's copy of the cart.
//!
//! Each view (cart page, header badge, `watch` loop) keeps its own snapshot
//! and replaces it from the store whenever either sync channel fires.

use std::sync::Arc;

use ecocycle_core::Cart;

use crate::store::CartStore;
use crate::sync::{CartSignal, CartSubscription, CartSynchronizer};

/// Cart snapshot kept current by a [`CartSubscription`].
#[derive(Debug)]
pub struct CartView<S> {
    store: Arc<S>,
    subscription: CartSubscription,
    cart: Cart,
}

impl<S: CartStore> CartView<S> {
    /// Subscribe to `sync` and take the initial snapshot.
    pub fn new(store: Arc<S>, sync: &CartSynchronizer) -> Self {
        // Subscribe first so a save between the two steps is not missed.
        let subscription = sync.subscribe();
        let cart = store.load();
        Self {
            store,
            subscription,
            cart,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Header badge count.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Re-load from the store.
    pub fn refresh(&mut self) {
        self.cart = self.store.load();
    }

    /// Wait for the next signal, then re-load. `None` once the synchronizer
    /// is gone.
    pub async fn changed(&mut self) -> Option<CartSignal> {
        let signal = self.subscription.recv().await?;
        self.refresh();
        Some(signal)
    }

    /// Apply any signals already delivered, without waiting. Returns whether
    /// the snapshot was re-loaded.
    pub fn apply_pending(&mut self) -> bool {
        let mut pending = false;
        while self.subscription.try_recv().is_some() {
            pending = true;
        }
        if pending {
            self.refresh();
        }
        pending
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ecocycle_core::{Points, Product, ProductId};

    use super::*;
    use crate::services::cart::CartService;
    use crate::store::InMemoryCartStore;

    fn bottle() -> Product {
        Product {
            id: ProductId::new(4),
            name: "Eco-Friendly Water Bottle".to_string(),
            description: "Reusable stainless steel bottle".to_string(),
            image: None,
            points: Points::new(500),
            category: "Kitchen".to_string(),
            featured: true,
            in_stock: true,
            stock_quantity: Some(10),
        }
    }

    #[test]
    fn test_views_in_same_context_converge() {
        let store = Arc::new(InMemoryCartStore::default());
        let sync = CartSynchronizer::new();
        let service = CartService::new(Arc::clone(&store), sync.clone());
        let mut header = CartView::new(Arc::clone(&store), &sync);
        let mut page = CartView::new(Arc::clone(&store), &sync);

        service.add(&bottle(), 3).unwrap();

        assert!(header.apply_pending());
        assert!(page.apply_pending());
        assert_eq!(header.item_count(), 3);
        assert_eq!(page.cart(), &service.cart());
        assert!(!header.apply_pending());
    }

    #[tokio::test]
    async fn test_changed_reloads() {
        let store = Arc::new(InMemoryCartStore::default());
        let sync = CartSynchronizer::new();
        let service = CartService::new(Arc::clone(&store), sync.clone());
        let mut view = CartView::new(Arc::clone(&store), &sync);

        service.add(&bottle(), 2).unwrap();

        assert_eq!(view.changed().await, Some(CartSignal::Updated));
        assert_eq!(view.item_count(), 2);
    }
}
