//! Persistent cart store.
//!
//! The cart lives in a single JSON record (an array of cart lines) and is
//! always read and written whole. A missing, unreadable, or malformed record
//! reads as an empty cart; it is logged, never surfaced as an error.

use std::sync::Mutex;

use ecocycle_core::{Cart, CartItem, Points, ProductId};
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use crate::policy::clamp_quantity;
use crate::storage::{KeyValueStorage, StorageError};

/// Errors raised when writing the cart record.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Load/save contract for the cart.
pub trait CartStore: Send + Sync {
    /// Current cart; empty when nothing valid is stored.
    fn load(&self) -> Cart;

    /// Replace the stored cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the record cannot be encoded or written.
    fn save(&self, cart: &Cart) -> Result<(), StoreError>;
}

impl<T: CartStore + ?Sized> CartStore for std::sync::Arc<T> {
    fn load(&self) -> Cart {
        (**self).load()
    }

    fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        (**self).save(cart)
    }
}

/// What this context last knew of the raw record.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Snapshot {
    Unknown,
    Known(Option<String>),
}

/// Cart store over one named record of a [`KeyValueStorage`].
#[derive(Debug)]
pub struct RecordCartStore<S> {
    storage: S,
    key: String,
    seen: Mutex<Snapshot>,
}

impl<S: KeyValueStorage> RecordCartStore<S> {
    /// Create a store for record `key` in `storage`.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            seen: Mutex::new(Snapshot::Unknown),
        }
    }

    /// Name of the cart record.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Check whether the raw record differs from what this context last
    /// wrote or observed, and remember the current value.
    ///
    /// The first call only records a baseline and reports no change. Writes
    /// made through this store never count as changes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be read.
    pub fn poll_external_change(&self) -> Result<bool, StorageError> {
        // Held across the read so a concurrent local save cannot interleave.
        let mut seen = self.seen.lock().map_err(|_| StorageError::Poisoned)?;
        let current = self.storage.get_item(&self.key)?;
        let changed = match &*seen {
            Snapshot::Unknown => false,
            Snapshot::Known(previous) => *previous != current,
        };
        *seen = Snapshot::Known(current);
        Ok(changed)
    }

}

impl<S: KeyValueStorage> CartStore for RecordCartStore<S> {
    #[instrument(skip(self), fields(key = %self.key))]
    fn load(&self) -> Cart {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Cart record unreadable, treating as empty");
                return Cart::new();
            }
        };

        match parse_record(&raw) {
            Ok(cart) => cart,
            Err(e) => {
                tracing::warn!(error = %e, "Cart record corrupt, treating as empty");
                Cart::new()
            }
        }
    }

    #[instrument(skip(self, cart), fields(key = %self.key, lines = cart.len()))]
    fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        let raw = serde_json::to_string(cart)?;
        let mut seen = self.seen.lock().map_err(|_| StorageError::Poisoned)?;
        self.storage.set_item(&self.key, &raw)?;
        *seen = Snapshot::Known(Some(raw));
        Ok(())
    }
}

/// Cart store holding the cart in memory, for tests and previews.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    cart: Mutex<Cart>,
}

impl InMemoryCartStore {
    #[must_use]
    pub fn new(cart: Cart) -> Self {
        Self {
            cart: Mutex::new(cart),
        }
    }
}

impl CartStore for InMemoryCartStore {
    fn load(&self) -> Cart {
        self.cart
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        let mut stored = self.cart.lock().map_err(|_| StorageError::Poisoned)?;
        stored.clone_from(cart);
        Ok(())
    }
}

// =============================================================================
// Record Narrowing
// =============================================================================

/// Why a stored record could not be read as a cart at all.
#[derive(Debug, Error)]
pub enum CorruptRecord {
    #[error("not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected an array of cart lines")]
    NotAnArray,
}

/// Parse a raw record into a cart.
///
/// Entries that cannot be narrowed into a cart line are dropped; quantities
/// are clamped into range and duplicate ids merged.
///
/// # Errors
///
/// Returns `CorruptRecord` if the record is not a JSON array.
pub fn parse_record(raw: &str) -> Result<Cart, CorruptRecord> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Array(entries) = value else {
        return Err(CorruptRecord::NotAnArray);
    };

    let total = entries.len();
    let items: Vec<CartItem> = entries.iter().filter_map(narrow_entry).collect();
    if items.len() < total {
        tracing::warn!(
            dropped = total - items.len(),
            "Dropped malformed cart entries"
        );
    }

    let mut cart = Cart::from_items(items);
    for item in cart.iter_mut() {
        item.quantity = clamp_quantity(i64::from(item.quantity), item.stock_quantity);
    }
    Ok(cart)
}

fn narrow_entry(value: &Value) -> Option<CartItem> {
    let entry = value.as_object()?;

    let id = entry.get("id")?.as_i64()?;
    let name = entry.get("name")?.as_str()?.to_string();
    let points = entry.get("points")?.as_u64()?;
    let stock_quantity = match entry.get("stockQuantity") {
        None | Some(Value::Null) => None,
        Some(stock) => Some(u32::try_from(stock.as_u64()?).ok()?),
    };
    let quantity = entry.get("quantity").and_then(Value::as_i64).unwrap_or(1);

    let text = |field: &str| {
        entry
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Some(CartItem {
        id: ProductId::new(id),
        name,
        description: text("description"),
        image: text("image"),
        points: Points::new(points),
        quantity: clamp_quantity(quantity, stock_quantity),
        stock_quantity,
    })
}
