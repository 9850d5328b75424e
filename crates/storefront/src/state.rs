//! Per-context application state.
//!
//! One `AppState` is one context: the analogue of a browser tab. Contexts
//! built from the same data directory share the cart record and see each
//! other's writes through [`AppState::watch_storage`].

use std::sync::Arc;

use ecocycle_core::Points;

use crate::catalog::{Catalog, CatalogError};
use crate::config::StorefrontConfig;
use crate::services::assistant::{AssistantClient, AssistantError};
use crate::services::cart::CartService;
use crate::storage::FileStorage;
use crate::store::RecordCartStore;
use crate::sync::{CartSynchronizer, StorageWatcher};
use crate::view::CartView;

/// Cart store backed by the configured data directory.
pub type FileCartStore = RecordCartStore<FileStorage>;

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("assistant error: {0}")]
    Assistant(#[from] AssistantError),
}

/// Application state for one context.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<FileCartStore>,
    cart: CartService<FileCartStore>,
    catalog: Catalog,
    assistant: AssistantClient,
}

impl AppState {
    /// Create a new context.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or the assistant
    /// client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let storage = FileStorage::new(&config.data_dir);
        let store = Arc::new(RecordCartStore::new(storage, config.cart_key.clone()));
        let cart = CartService::new(Arc::clone(&store), CartSynchronizer::new());
        let catalog = Catalog::from_config(&config)?;
        let assistant = AssistantClient::new(&config.assistant)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                cart,
                catalog,
                assistant,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn cart(&self) -> &CartService<FileCartStore> {
        &self.inner.cart
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn assistant(&self) -> &AssistantClient {
        &self.inner.assistant
    }

    /// Balance supplied by the account collaborator.
    #[must_use]
    pub fn points_balance(&self) -> Points {
        self.inner.config.points_balance
    }

    /// A new view subscribed to this context.
    #[must_use]
    pub fn view(&self) -> CartView<FileCartStore> {
        CartView::new(Arc::clone(&self.inner.store), self.inner.cart.synchronizer())
    }

    /// Start relaying other contexts' writes into this context's signals.
    #[must_use]
    pub fn watch_storage(&self) -> StorageWatcher {
        self.inner.cart.synchronizer().watch_storage(
            Arc::clone(&self.inner.store),
            self.inner.config.sync_poll_interval,
        )
    }
}
