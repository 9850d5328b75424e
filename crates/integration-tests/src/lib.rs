//! Integration tests for Ecocycle.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ecocycle-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_scenarios` - Totals, gate, and stock scenarios end to end
//! - `cart_sync` - Several contexts sharing one storage
//!
//! This library holds shared fixtures.

use std::sync::Arc;
use std::time::Duration;

use ecocycle_core::{Points, Product, ProductId};
use ecocycle_storefront::services::cart::CartService;
use ecocycle_storefront::storage::KeyValueStorage;
use ecocycle_storefront::store::RecordCartStore;
use ecocycle_storefront::sync::{CartSynchronizer, StorageWatcher};

/// Poll period used by test watchers.
pub const POLL: Duration = Duration::from_millis(10);

/// Upper bound on waiting for a signal.
pub const WAIT: Duration = Duration::from_secs(2);

/// A catalog product with the given price and stock.
#[must_use]
pub fn product(id: i64, points: u64, stock: Option<u32>) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        description: String::new(),
        image: None,
        points: Points::new(points),
        category: "Home".to_string(),
        featured: false,
        in_stock: true,
        stock_quantity: stock,
    }
}

/// One context ("tab") over shared storage.
pub struct Tab<S: KeyValueStorage> {
    pub store: Arc<RecordCartStore<S>>,
    pub service: CartService<RecordCartStore<S>>,
}

impl<S: KeyValueStorage + 'static> Tab<S> {
    /// Open a context on `storage`'s `cart` record.
    pub fn open(storage: S) -> Self {
        let store = Arc::new(RecordCartStore::new(storage, "cart"));
        let service = CartService::new(Arc::clone(&store), CartSynchronizer::new());
        Self { store, service }
    }

    /// Relay other contexts' writes into this context.
    #[must_use]
    pub fn watch(&self) -> StorageWatcher {
        self.service
            .synchronizer()
            .watch_storage(Arc::clone(&self.store), POLL)
    }
}
