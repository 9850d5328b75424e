//! Checkout aggregator: totals and the affordability gate.

use chrono::{DateTime, Utc};
use ecocycle_core::{Cart, CartItem, DeliveryMethod, Points};
use serde::Serialize;
use uuid::Uuid;

/// Derived order totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CheckoutTotals {
    /// Sum of `points * quantity` over every line.
    pub subtotal: Points,
    pub delivery_fee: Points,
    /// `subtotal + delivery_fee`.
    pub total: Points,
}

/// Compute the totals for `cart` with the chosen delivery method.
#[must_use]
pub fn compute_totals(cart: &Cart, delivery: DeliveryMethod) -> CheckoutTotals {
    let subtotal = cart.subtotal();
    let delivery_fee = delivery.fee();
    CheckoutTotals {
        subtotal,
        delivery_fee,
        total: subtotal + delivery_fee,
    }
}

/// `total <= balance`.
#[must_use]
pub fn can_checkout(total: Points, balance: Points) -> bool {
    total <= balance
}

/// Outcome of the checkout gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutGate {
    Ready,
    /// Nothing to redeem.
    EmptyCart,
    /// The total exceeds the balance by `shortfall`.
    InsufficientBalance { shortfall: Points },
}

impl CheckoutGate {
    /// Evaluate the gate against the full cart.
    #[must_use]
    pub fn evaluate(cart: &Cart, totals: &CheckoutTotals, balance: Points) -> Self {
        if cart.is_empty() {
            Self::EmptyCart
        } else if !can_checkout(totals.total, balance) {
            Self::InsufficientBalance {
                shortfall: totals.total.saturating_sub(balance),
            }
        } else {
            Self::Ready
        }
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Inline explanation shown next to the disabled checkout action.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Ready => None,
            Self::EmptyCart => Some("Your cart is empty"),
            Self::InsufficientBalance { .. } => {
                Some("You don't have enough points for this order.")
            }
        }
    }
}

/// Receipt for a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redemption {
    pub id: Uuid,
    pub redeemed_at: DateTime<Utc>,
    pub delivery: DeliveryMethod,
    pub items: Vec<CartItem>,
    pub totals: CheckoutTotals,
    /// Balance left once the total is spent.
    pub remaining_balance: Points,
}

impl Redemption {
    pub(crate) fn new(
        cart: &Cart,
        delivery: DeliveryMethod,
        totals: CheckoutTotals,
        balance: Points,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            redeemed_at: Utc::now(),
            delivery,
            items: cart.items().to_vec(),
            totals,
            remaining_balance: balance.saturating_sub(totals.total),
        }
    }
}

#[cfg(test)]
mod tests {
    use ecocycle_core::ProductId;

    use super::*;

    fn line(id: i64, points: u64, quantity: u32) -> CartItem {
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

    fn sample_cart() -> Cart {
        Cart::from_items([line(1, 200, 2), line(2, 350, 1)])
    }

    #[test]
    fn test_empty_cart_totals_and_gate() {
        let cart = Cart::new();
        let totals = compute_totals(&cart, DeliveryMethod::Pickup);
        assert_eq!(totals, CheckoutTotals::default());
        assert_eq!(
            CheckoutGate::evaluate(&cart, &totals, Points::new(1250)),
            CheckoutGate::EmptyCart
        );
    }

    #[test]
    fn test_pickup_totals() {
        let totals = compute_totals(&sample_cart(), DeliveryMethod::Pickup);
        assert_eq!(totals.subtotal, Points::new(750));
        assert_eq!(totals.delivery_fee, Points::ZERO);
        assert_eq!(totals.total, Points::new(750));
    }

    #[test]
    fn test_delivery_totals() {
        let totals = compute_totals(&sample_cart(), DeliveryMethod::Delivery);
        assert_eq!(totals.subtotal, Points::new(750));
        assert_eq!(totals.delivery_fee, Points::new(50));
        assert_eq!(totals.total, Points::new(800));
    }

    #[test]
    fn test_subtotal_is_linear_in_quantity() {
        let cart = sample_cart();
        let mut doubled = cart.clone();
        for item in doubled.iter_mut() {
            item.quantity *= 2;
        }

        let single = compute_totals(&cart, DeliveryMethod::Delivery);
        let double = compute_totals(&doubled, DeliveryMethod::Delivery);
        assert_eq!(double.subtotal.get(), single.subtotal.get() * 2);
        assert_eq!(double.delivery_fee, single.delivery_fee);
    }

    #[test]
    fn test_insufficient_balance() {
        let cart = sample_cart();
        let totals = compute_totals(&cart, DeliveryMethod::Pickup);
        assert!(!can_checkout(totals.total, Points::new(700)));

        let gate = CheckoutGate::evaluate(&cart, &totals, Points::new(700));
        assert_eq!(
            gate,
            CheckoutGate::InsufficientBalance {
                shortfall: Points::new(50)
            }
        );
        assert_eq!(
            gate.message(),
            Some("You don't have enough points for this order.")
        );
    }

    #[test]
    fn test_exact_balance_is_enough() {
        let cart = sample_cart();
        let totals = compute_totals(&cart, DeliveryMethod::Pickup);
        assert!(CheckoutGate::evaluate(&cart, &totals, Points::new(750)).is_ready());
    }

    #[test]
    fn test_redemption_remaining_balance() {
        let cart = sample_cart();
        let totals = compute_totals(&cart, DeliveryMethod::Delivery);
        let receipt = Redemption::new(&cart, DeliveryMethod::Delivery, totals, Points::new(1250));
        assert_eq!(receipt.remaining_balance, Points::new(450));
        assert_eq!(receipt.items.len(), 2);
    }
}
