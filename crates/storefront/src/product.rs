//! Product detail adapter.
//!
//! Merges a catalog product, with its authoritative points and stock, into a
//! cart. The functions here are pure; [`crate::services::cart::CartService`]
//! persists and signals the result.

use ecocycle_core::{Cart, CartItem, Product, ProductId};
use thiserror::Error;

use crate::policy::clamp_quantity;

/// Stock failures surfaced to the user as notices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    /// The product is flagged unavailable.
    #[error("This product is currently out of stock.")]
    OutOfStock { product: ProductId },

    /// Adding would push the cart line past the stock ceiling.
    #[error("You can only add {remaining} more of this item.")]
    StockLimitExceeded { product: ProductId, remaining: u32 },

    /// The detail page selector is already at the ceiling.
    #[error("You've reached the maximum available stock for this product.")]
    StockLimitReached { product: ProductId },
}

impl StockError {
    /// Notice title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::OutOfStock { .. } => "Out of Stock",
            Self::StockLimitExceeded { .. } => "Stock Limit Exceeded",
            Self::StockLimitReached { .. } => "Stock Limit Reached",
        }
    }
}

/// Add `requested` units of `product` to `cart`, returning the new cart.
///
/// An existing line for the product is merged: its quantity grows by
/// `requested` and its name, points, and stock are refreshed from
/// `product`. A new line's quantity is clamped to the product's stock.
///
/// # Errors
///
/// - `StockError::OutOfStock` if the product is unavailable.
/// - `StockError::StockLimitExceeded` if merging would exceed the stock
///   ceiling; `remaining` is how many more units could still be added.
pub fn add_to_cart(cart: &Cart, product: &Product, requested: u32) -> Result<Cart, StockError> {
    if !product.is_available() {
        return Err(StockError::OutOfStock {
            product: product.id,
        });
    }

    let requested = requested.max(1);
    let mut updated = cart.clone();

    match cart.get(product.id) {
        Some(existing) => {
            let merged = u64::from(existing.quantity) + u64::from(requested);
            if let Some(stock) = product.stock_quantity
                && merged > u64::from(stock)
            {
                return Err(StockError::StockLimitExceeded {
                    product: product.id,
                    remaining: stock.saturating_sub(existing.quantity),
                });
            }
            updated.insert(CartItem::from_product(product, requested));
        }
        None => {
            let quantity = clamp_quantity(i64::from(requested), product.stock_quantity);
            updated.insert(CartItem::from_product(product, quantity));
        }
    }

    Ok(updated)
}

/// Quantity picker on the product detail page, used before adding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantitySelector {
    product: ProductId,
    quantity: u32,
    stock: Option<u32>,
}

impl QuantitySelector {
    /// Start at one unit of `product`.
    #[must_use]
    pub const fn new(product: &Product) -> Self {
        Self {
            product: product.id,
            quantity: 1,
            stock: product.stock_quantity,
        }
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub const fn can_increase(&self) -> bool {
        match self.stock {
            Some(stock) => self.quantity < stock,
            None => true,
        }
    }

    #[must_use]
    pub const fn can_decrease(&self) -> bool {
        self.quantity > 1
    }

    /// Select one more unit.
    ///
    /// # Errors
    ///
    /// Returns `StockError::StockLimitReached` at the stock ceiling.
    pub fn increase(&mut self) -> Result<u32, StockError> {
        if !self.can_increase() {
            return Err(StockError::StockLimitReached {
                product: self.product,
            });
        }
        self.quantity = self.quantity.saturating_add(1);
        Ok(self.quantity)
    }

    /// Select one fewer unit, never below one.
    pub fn decrease(&mut self) -> u32 {
        if self.can_decrease() {
            self.quantity -= 1;
        }
        self.quantity
    }
}
