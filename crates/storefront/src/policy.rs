//! Quantity policy: every cart quantity stays within `1..=stock`.
//!
//! Everything here is pure. Callers persist the result.

use ecocycle_core::CartItem;

/// Clamp a requested quantity to `1..=stock`, or to `1..` when there is no
/// stock ceiling.
///
/// A zero ceiling still yields 1; zero-stock products are rejected before
/// they reach the cart.
#[must_use]
pub fn clamp_quantity(requested: i64, stock: Option<u32>) -> u32 {
    let ceiling = stock.map_or(i64::from(u32::MAX), i64::from);
    let clamped = requested.min(ceiling).max(1);
    u32::try_from(clamped).unwrap_or(u32::MAX)
}

/// Whether the decrement control is enabled for this line.
#[must_use]
pub const fn can_decrement(item: &CartItem) -> bool {
    item.quantity > 1
}

/// Whether the increment control is enabled for this line.
#[must_use]
pub const fn can_increment(item: &CartItem) -> bool {
    match item.stock_quantity {
        Some(stock) => item.quantity < stock,
        None => true,
    }
}

/// A quantity edit requested from a cart view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityAction {
    Increment,
    Decrement,
    /// Manual entry; may be out of range and is clamped.
    Set(i64),
}

impl QuantityAction {
    /// Resulting quantity for `item`, or `None` when the control is disabled.
    #[must_use]
    pub fn apply(self, item: &CartItem) -> Option<u32> {
        let current = i64::from(item.quantity);
        match self {
            Self::Increment if !can_increment(item) => None,
            Self::Decrement if !can_decrement(item) => None,
            Self::Increment => Some(clamp_quantity(current + 1, item.stock_quantity)),
            Self::Decrement => Some(clamp_quantity(current - 1, item.stock_quantity)),
            Self::Set(requested) => Some(clamp_quantity(requested, item.stock_quantity)),
        }
    }
}

#[cfg(test)]
mod tests {
    use ecocycle_core::{Points, ProductId};

    use super::*;

    fn line(quantity: u32, stock: Option<u32>) -> CartItem {
        CartItem {
            id: ProductId::new(1),
            name: "Recycled Notebook".to_string(),
            description: None,
            image: None,
            points: Points::new(200),
            quantity,
            stock_quantity: stock,
        }
    }

    #[test]
    fn test_clamp_within_bounds() {
        assert_eq!(clamp_quantity(5, Some(15)), 5);
        assert_eq!(clamp_quantity(20, Some(15)), 15);
        assert_eq!(clamp_quantity(0, Some(15)), 1);
        assert_eq!(clamp_quantity(-4, None), 1);
        assert_eq!(clamp_quantity(10_000, None), 10_000);
    }

    #[test]
    fn test_clamp_always_in_range_for_defined_stock() {
        for stock in 1..=20_u32 {
            for requested in -5..=30_i64 {
                let q = clamp_quantity(requested, Some(stock));
                assert!((1..=stock).contains(&q), "requested {requested} stock {stock}");
            }
        }
    }

    #[test]
    fn test_clamp_saturates_above_u32() {
        assert_eq!(clamp_quantity(i64::MAX, None), u32::MAX);
    }

    #[test]
    fn test_decrement_disabled_at_one() {
        let item = line(1, Some(15));
        assert!(!can_decrement(&item));
        assert_eq!(QuantityAction::Decrement.apply(&item), None);
    }

    #[test]
    fn test_increment_disabled_at_ceiling() {
        let item = line(15, Some(15));
        assert!(!can_increment(&item));
        assert_eq!(QuantityAction::Increment.apply(&item), None);
    }

    #[test]
    fn test_increment_unbounded_without_stock() {
        let item = line(99, None);
        assert_eq!(QuantityAction::Increment.apply(&item), Some(100));
    }

    #[test]
    fn test_set_is_clamped() {
        let item = line(3, Some(15));
        assert_eq!(QuantityAction::Set(40).apply(&item), Some(15));
        assert_eq!(QuantityAction::Set(0).apply(&item), Some(1));
        assert_eq!(QuantityAction::Set(7).apply(&item), Some(7));
    }
}
