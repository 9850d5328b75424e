//! Cart and checkout commands.
//!
//! # Usage
//!
//! ```bash
//! eco-cli add 1 -q 2
//! eco-cli inc 1
//! eco-cli set 1 5
//! eco-cli cart --delivery delivery
//! eco-cli checkout
//! eco-cli watch
//! ```

use ecocycle_core::{Cart, DeliveryMethod, Points, ProductId};
use ecocycle_storefront::checkout::{CheckoutGate, compute_totals};
use ecocycle_storefront::error::CartError;
use ecocycle_storefront::notice::Notice;
use ecocycle_storefront::policy::{can_decrement, can_increment};
use ecocycle_storefront::product::QuantitySelector;
use ecocycle_storefront::services::cart::{CheckoutOutcome, QuantityChange};
use ecocycle_storefront::state::AppState;

use super::CommandError;

/// Add a catalog product to the cart.
///
/// The quantity is picked the way the product page does: one unit at a
/// time up to the stock ceiling.
pub fn add(state: &AppState, id: ProductId, quantity: u32) -> Result<(), CommandError> {
    let product = state
        .catalog()
        .get(id)
        .ok_or(CartError::ProductNotFound(id))?;

    let mut selector = QuantitySelector::new(product);
    while selector.quantity() < quantity {
        if let Err(e) = selector.increase() {
            println!("{}", Notice::new(e.title(), e.to_string()));
            break;
        }
    }

    let cart = state.cart().add(product, selector.quantity())?;
    println!("{}", Notice::added(&product.name));
    println!("Cart items: {}", cart.item_count());
    Ok(())
}

/// Set a line's quantity.
pub fn set(state: &AppState, id: ProductId, quantity: i64) -> Result<(), CommandError> {
    let change = state.cart().update_quantity(id, quantity)?;
    report_change(change);
    Ok(())
}

/// Add one unit to a line.
pub fn increment(state: &AppState, id: ProductId) -> Result<(), CommandError> {
    let change = state.cart().increment(id)?;
    if let QuantityChange::Unchanged(q) = change {
        println!("Already at the available stock ({q}).");
        return Ok(());
    }
    report_change(change);
    Ok(())
}

/// Remove one unit from a line.
pub fn decrement(state: &AppState, id: ProductId) -> Result<(), CommandError> {
    let change = state.cart().decrement(id)?;
    if let QuantityChange::Unchanged(_) = change {
        println!("Quantity is already 1; use `remove` to drop the item.");
        return Ok(());
    }
    report_change(change);
    Ok(())
}

/// Remove a line.
pub fn remove(state: &AppState, id: ProductId) -> Result<(), CommandError> {
    let item = state.cart().remove(id)?;
    println!("{}", Notice::removed());
    println!("Removed {} x {}", item.quantity, item.name);
    Ok(())
}

/// Empty the cart.
pub fn clear(state: &AppState) -> Result<(), CommandError> {
    state.cart().clear()?;
    println!("{}", Notice::cleared());
    Ok(())
}

/// Print the cart, totals, and gate.
pub fn show(state: &AppState, delivery: DeliveryMethod) {
    print_cart(&state.cart().cart(), delivery, state.points_balance());
}

/// Redeem the cart.
pub fn checkout(state: &AppState, delivery: DeliveryMethod, json: bool) -> Result<(), CommandError> {
    match state.cart().checkout(delivery, state.points_balance())? {
        CheckoutOutcome::Redeemed(receipt) => {
            if json {
                match serde_json::to_string_pretty(&receipt) {
                    Ok(out) => println!("{out}"),
                    Err(e) => tracing::error!(error = %e, "Failed to encode receipt"),
                }
            } else {
                println!("Order placed: {}", receipt.id);
                for item in &receipt.items {
                    println!("  {} x {}  {}", item.quantity, item.name, item.line_total());
                }
                println!("Total: {} ({delivery})", receipt.totals.total);
                println!("Remaining balance: {}", receipt.remaining_balance);
            }
            Ok(())
        }
        CheckoutOutcome::Blocked { gate, totals } => {
            let description = match gate {
                CheckoutGate::InsufficientBalance { shortfall } => format!(
                    "Total {} exceeds your balance of {} by {shortfall}.",
                    totals.total,
                    state.points_balance()
                ),
                _ => gate.message().unwrap_or_default().to_string(),
            };
            Err(CommandError::Notice(Notice::new(
                "Checkout unavailable",
                description,
            )))
        }
    }
}

/// Follow cart changes from this and every other context until Ctrl-C.
pub async fn watch(state: &AppState, delivery: DeliveryMethod) {
    let _watcher = state.watch_storage();
    let mut view = state.view();
    print_cart(view.cart(), delivery, state.points_balance());

    loop {
        tokio::select! {
            signal = view.changed() => {
                let Some(signal) = signal else { break };
                tracing::debug!(?signal, "Cart changed");
                println!();
                print_cart(view.cart(), delivery, state.points_balance());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
}

fn report_change(change: QuantityChange) {
    match change {
        QuantityChange::Changed(q) => {
            println!("{}", Notice::quantity_updated());
            println!("Quantity: {q}");
        }
        QuantityChange::Unchanged(q) => println!("Quantity unchanged: {q}"),
    }
}

fn print_cart(cart: &Cart, delivery: DeliveryMethod, balance: Points) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }

    println!("Cart Items ({})", cart.item_count());
    for item in cart {
        let stock = match item.stock_quantity {
            Some(0) => "  Out of stock".to_string(),
            Some(stock) => format!("  In stock: {stock}"),
            None => String::new(),
        };
        println!(
            "{:>4}  {:<28} {} x {:<4} [{}{}]  {}{stock}",
            item.id,
            item.name,
            item.points,
            item.quantity,
            if can_decrement(item) { "-" } else { " " },
            if can_increment(item) { "+" } else { " " },
            item.line_total(),
        );
    }

    let totals = compute_totals(cart, delivery);
    println!("Subtotal: {}", totals.subtotal);
    if totals.delivery_fee > Points::ZERO {
        println!("Delivery Fee: {}", totals.delivery_fee);
    }
    println!("Total: {}", totals.total);
    println!("Balance: {balance}");

    let gate = CheckoutGate::evaluate(cart, &totals, balance);
    match gate.message() {
        Some(message) => println!("Checkout disabled: {message}"),
        None => println!("Ready to checkout"),
    }
}
