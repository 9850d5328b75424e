//! Cart service: the mutation entry point for one context.
//!
//! Every mutation runs `load -> transform -> save -> publish` while holding
//! the context's write lock, so callers never observe a half-applied change.
//! Another context may still save in between; the last save wins.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ecocycle_core::{Cart, CartItem, DeliveryMethod, Points, Product, ProductId};
use tracing::instrument;

use crate::checkout::{CheckoutGate, CheckoutTotals, Redemption, compute_totals};
use crate::error::{CartError, Result};
use crate::policy::QuantityAction;
use crate::product::add_to_cart;
use crate::store::CartStore;
use crate::sync::{CartSubscription, CartSynchronizer};

/// Result of a quantity edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line now has this quantity.
    Changed(u32),
    /// The control was disabled or the value already matched; nothing saved.
    Unchanged(u32),
}

impl QuantityChange {
    #[must_use]
    pub const fn quantity(self) -> u32 {
        match self {
            Self::Changed(q) | Self::Unchanged(q) => q,
        }
    }
}

/// Result of a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The cart was redeemed and cleared.
    Redeemed(Redemption),
    /// The gate refused; the cart is untouched.
    Blocked {
        gate: CheckoutGate,
        totals: CheckoutTotals,
    },
}

/// Cart operations for one context.
#[derive(Debug)]
pub struct CartService<S> {
    store: Arc<S>,
    sync: CartSynchronizer,
    write_lock: Mutex<()>,
}

impl<S: CartStore> CartService<S> {
    /// Create a service publishing to `sync`.
    pub fn new(store: Arc<S>, sync: CartSynchronizer) -> Self {
        Self {
            store,
            sync,
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    #[must_use]
    pub const fn synchronizer(&self) -> &CartSynchronizer {
        &self.sync
    }

    /// Listen for changes made through this context or seen in storage.
    #[must_use]
    pub fn subscribe(&self) -> CartSubscription {
        self.sync.subscribe()
    }

    /// Current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.store.load()
    }

    /// Total units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.store.load().item_count()
    }

    #[must_use]
    pub fn totals(&self, delivery: DeliveryMethod) -> CheckoutTotals {
        compute_totals(&self.store.load(), delivery)
    }

    /// Add `quantity` units of `product`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Stock` if the product is unavailable or the stock
    /// ceiling would be exceeded (the stored cart is left untouched), or
    /// `CartError::Store` if saving fails.
    #[instrument(skip(self, product), fields(product = %product.id))]
    pub fn add(&self, product: &Product, quantity: u32) -> Result<Cart> {
        self.mutate(|cart| {
            *cart = add_to_cart(cart, product, quantity)?;
            Ok(cart.clone())
        })
    }

    /// Set a line's quantity, clamped to `1..=stock`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` for an unknown id, or
    /// `CartError::Store` if saving fails.
    #[instrument(skip(self))]
    pub fn update_quantity(&self, id: ProductId, requested: i64) -> Result<QuantityChange> {
        self.adjust(id, QuantityAction::Set(requested))
    }

    /// Add one unit to a line. Unchanged at the stock ceiling.
    ///
    /// # Errors
    ///
    /// See [`CartService::update_quantity`].
    #[instrument(skip(self))]
    pub fn increment(&self, id: ProductId) -> Result<QuantityChange> {
        self.adjust(id, QuantityAction::Increment)
    }

    /// Take one unit from a line. Unchanged at one.
    ///
    /// # Errors
    ///
    /// See [`CartService::update_quantity`].
    #[instrument(skip(self))]
    pub fn decrement(&self, id: ProductId) -> Result<QuantityChange> {
        self.adjust(id, QuantityAction::Decrement)
    }

    /// Remove a line, returning it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` for an unknown id, or
    /// `CartError::Store` if saving fails.
    #[instrument(skip(self))]
    pub fn remove(&self, id: ProductId) -> Result<CartItem> {
        self.mutate(|cart| cart.remove(id).ok_or(CartError::ItemNotFound(id)))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if saving fails.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<()> {
        self.mutate(|cart| {
            cart.clear();
            Ok(())
        })
    }

    /// Redeem the whole cart if the gate allows it, then clear it.
    ///
    /// The gate is evaluated against the cart as stored at this moment.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if clearing the cart fails.
    #[instrument(skip(self))]
    pub fn checkout(&self, delivery: DeliveryMethod, balance: Points) -> Result<CheckoutOutcome> {
        let _guard = self.lock();
        let mut cart = self.store.load();
        let totals = compute_totals(&cart, delivery);
        let gate = CheckoutGate::evaluate(&cart, &totals, balance);
        if !gate.is_ready() {
            tracing::info!(?gate, total = %totals.total, %balance, "Checkout blocked");
            return Ok(CheckoutOutcome::Blocked { gate, totals });
        }

        let redemption = Redemption::new(&cart, delivery, totals, balance);
        cart.clear();
        self.commit(&cart)?;
        tracing::info!(redemption = %redemption.id, total = %totals.total, "Cart redeemed");
        Ok(CheckoutOutcome::Redeemed(redemption))
    }

    fn adjust(&self, id: ProductId, action: QuantityAction) -> Result<QuantityChange> {
        let _guard = self.lock();
        let mut cart = self.store.load();
        let item = cart.get_mut(id).ok_or(CartError::ItemNotFound(id))?;

        let current = item.quantity;
        let quantity = match action.apply(item) {
            Some(quantity) if quantity != current => quantity,
            _ => return Ok(QuantityChange::Unchanged(current)),
        };
        item.quantity = quantity;

        self.commit(&cart)?;
        Ok(QuantityChange::Changed(quantity))
    }

    fn mutate<T>(&self, transform: impl FnOnce(&mut Cart) -> Result<T>) -> Result<T> {
        let _guard = self.lock();
        let mut cart = self.store.load();
        let output = transform(&mut cart)?;
        self.commit(&cart)?;
        Ok(output)
    }

    fn commit(&self, cart: &Cart) -> Result<()> {
        self.store.save(cart)?;
        self.sync.publish();
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
