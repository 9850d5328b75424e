//! User-facing notices (toasts).

use std::fmt;

/// A short title plus one sentence of detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn added(name: &str) -> Self {
        Self::new("Added to Cart", format!("{name} has been added to your cart."))
    }

    #[must_use]
    pub fn quantity_updated() -> Self {
        Self::new("Cart updated", "Item quantity has been updated.")
    }

    #[must_use]
    pub fn removed() -> Self {
        Self::new("Item removed", "Item has been removed from your cart.")
    }

    #[must_use]
    pub fn cleared() -> Self {
        Self::new("Cart cleared", "All items have been removed from your cart.")
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}
