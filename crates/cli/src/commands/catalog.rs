//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! eco-cli catalog --search bamboo --category Kitchen --sort high
//! eco-cli product 3
//! ```

use ecocycle_core::{PriceBand, Product, ProductId, SortOrder};
use ecocycle_storefront::catalog::CatalogQuery;
use ecocycle_storefront::error::CartError;
use ecocycle_storefront::state::AppState;

use super::CommandError;

/// Print products matching the filters.
pub fn list(
    state: &AppState,
    search: String,
    categories: Vec<String>,
    price_bands: Vec<PriceBand>,
    sort: SortOrder,
) {
    let query = CatalogQuery {
        search,
        categories,
        price_bands,
        sort,
    };
    let products = state.catalog().query(&query);

    if products.is_empty() {
        println!("No products match your filters.");
        println!("Categories: {}", state.catalog().categories().join(", "));
        return;
    }

    for product in products {
        println!(
            "{:>4}  {:<28} {:>11}  {:<14} {}",
            product.id,
            product.name,
            product.points.to_string(),
            product.category,
            stock_label(product)
        );
    }
}

/// Print one product's details.
pub fn show(state: &AppState, id: ProductId) -> Result<(), CommandError> {
    let product = state
        .catalog()
        .get(id)
        .ok_or(CartError::ProductNotFound(id))?;

    println!("{} ({})", product.name, product.category);
    if !product.description.is_empty() {
        println!("{}", product.description);
    }
    println!("{}", product.points);
    println!("{}", stock_label(product));

    if let Some(line) = state.cart().cart().get(id) {
        println!("In your cart: {}", line.quantity);
    }
    Ok(())
}

fn stock_label(product: &Product) -> String {
    match (product.is_available(), product.stock_quantity) {
        (false, _) => "Out of Stock".to_string(),
        (true, Some(stock)) => format!("In Stock ({stock} left)"),
        (true, None) => "In Stock".to_string(),
    }
}
