//! Catalog product as supplied by the catalog collaborator.

use serde::{Deserialize, Serialize};

use super::{Points, ProductId};

const fn default_in_stock() -> bool {
    true
}

/// A redeemable catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Cost per unit.
    pub points: Points,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    /// Authoritative stock ceiling. `None` means unconstrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<u32>,
}

impl Product {
    /// Whether the product can be added to a cart at all.
    ///
    /// A product flagged in stock but with a zero ceiling is unavailable.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.in_stock && self.stock_quantity != Some(0)
    }
}
