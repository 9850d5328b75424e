//! Unified error handling for cart operations.
//!
//! Every failure maps to a [`Notice`]. Stock problems are shown as-is;
//! storage details are logged and replaced by a generic message.

use ecocycle_core::ProductId;
use thiserror::Error;

use crate::notice::Notice;
use crate::product::StockError;
use crate::store::StoreError;

/// Error type for cart service operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Adding the product violated its stock.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Saving the cart failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// No cart line has this id.
    #[error("Item {0} is not in the cart")]
    ItemNotFound(ProductId),

    /// The catalog has no product with this id.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),
}

impl CartError {
    /// Notice to show for this error.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::Stock(err) => Notice::new(err.title(), err.to_string()),
            Self::Store(err) => {
                tracing::error!(error = %err, "Cart could not be saved");
                Notice::new("Cart not saved", "Your cart could not be saved. Try again.")
            }
            Self::ItemNotFound(_) => Notice::new("Not in cart", self.to_string()),
            Self::ProductNotFound(_) => Notice::new("Product not found", self.to_string()),
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
