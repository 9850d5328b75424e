//! The cart record: an ordered list of lines keyed by product id.

use serde::{Deserialize, Serialize};

use super::{Points, Product, ProductId};

/// One cart line.
///
/// Serialized with camelCase keys; absent optionals are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Cost per unit.
    pub points: Points,
    pub quantity: u32,
    /// Stock ceiling for `quantity`. `None` means unconstrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<u32>,
}

impl CartItem {
    /// Build a line for `product` with the given quantity.
    ///
    /// The caller is responsible for clamping `quantity`.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: Some(product.description.clone()).filter(|d| !d.is_empty()),
            image: product.image.clone(),
            points: product.points,
            quantity,
            stock_quantity: product.stock_quantity,
        }
    }

    /// `points * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Points {
        self.points * self.quantity
    }
}

/// Ordered cart lines with unique ids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from lines, merging duplicate ids via [`Cart::insert`].
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            cart.insert(item);
        }
        cart
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, CartItem> {
        self.items.iter_mut()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn get_mut(&mut self, id: ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Append a line, or merge it into the existing line with the same id.
    ///
    /// Merging sums the quantities and takes the incoming line's name,
    /// points, and stock ceiling. Position in the cart is preserved.
    pub fn insert(&mut self, item: CartItem) {
        match self.get_mut(item.id) {
            Some(existing) => {
                let quantity = existing.quantity.saturating_add(item.quantity);
                *existing = CartItem { quantity, ..item };
            }
            None => self.items.push(item),
        }
    }

    /// Remove the line with `id`, returning it if present.
    pub fn remove(&mut self, id: ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total units across all lines (the header badge count).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of every line total.
    #[must_use]
    pub fn subtotal(&self) -> Points {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: i64, points: u64, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("Item {id}"),
            description: None,
            image: None,
            points: Points::new(points),
            quantity,
            stock_quantity: None,
        }
    }

    #[test]
    fn test_insert_merges_same_id() {
        let mut cart = Cart::new();
        cart.insert(item(1, 200, 2));
        cart.insert(item(2, 350, 1));
        cart.insert(item(1, 200, 3));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 5);
        assert_eq!(cart.items().first().unwrap().id, ProductId::new(1));
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::from_items([item(1, 200, 2), item(2, 350, 1)]);
        let removed = cart.remove(ProductId::new(1)).unwrap();
        assert_eq!(removed.quantity, 2);
        assert!(cart.remove(ProductId::new(1)).is_none());
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_item_count_and_subtotal() {
        let cart = Cart::from_items([item(1, 200, 2), item(2, 350, 1)]);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), Points::new(750));
    }

    #[test]
    fn test_serializes_as_array_with_camel_case() {
        let mut line = item(1, 200, 2);
        line.stock_quantity = Some(15);
        let cart = Cart::from_items([line]);
        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(
            json,
            r#"[{"id":1,"name":"Item 1","points":200,"quantity":2,"stockQuantity":15}]"#
        );
    }
}
