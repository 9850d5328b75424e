//! Catalog collaborator: the products a user can redeem.
//!
//! The catalog is read-only here. It is either the built-in product list or
//! a JSON array of products loaded from `ECOCYCLE_CATALOG_PATH`.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ecocycle_core::{Points, PriceBand, Product, ProductId, SortOrder};
use thiserror::Error;

use crate::config::StorefrontConfig;

/// Errors loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate product id {0}")]
    DuplicateId(ProductId),
}

// (id, name, description, points, category, featured, image, stock)
type BuiltinRow = (i64, &'static str, &'static str, u64, &'static str, bool, &'static str, u32);

const BUILTIN: [BuiltinRow; 8] = [
    (1, "Recycled Notebook", "Made from 100% recycled paper", 200, "Stationery", true, "/images/download-1.jpeg", 15),
    (2, "Bamboo Cutlery Set", "Sustainable alternative to plastic utensils", 350, "Kitchen", true, "/images/download-2.jpeg", 10),
    (3, "Solar Power Bank", "Charge your devices with solar energy", 1200, "Electronics", false, "/images/download-3.jpeg", 5),
    (4, "Eco-Friendly Water Bottle", "Reusable stainless steel bottle", 500, "Kitchen", true, "/images/download-3.jpeg", 20),
    (5, "Recycled Tote Bag", "Made from recycled plastic bottles", 300, "Accessories", false, "/images/download-4.jpeg", 12),
    (6, "LED Desk Lamp", "Energy-efficient lighting solution", 800, "Home", false, "/images/download.jpeg", 8),
    (7, "Bamboo Toothbrush", "Biodegradable alternative to plastic", 150, "Personal Care", false, "/images/download-6.jpeg", 30),
    (8, "Recycled Plastic Plant Pot", "Made from recycled ocean plastic", 400, "Home", false, "/images/download-5.jpeg", 0),
];

/// Listing filters and order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Case-insensitive substring of the name or description.
    pub search: String,
    /// Empty means every category.
    pub categories: Vec<String>,
    /// Empty means every price; otherwise any band may match.
    pub price_bands: Vec<PriceBand>,
    pub sort: SortOrder,
}

impl CatalogQuery {
    fn matches(&self, product: &Product, needle: &str) -> bool {
        let matches_search = needle.is_empty()
            || product.name.to_lowercase().contains(needle)
            || product.description.to_lowercase().contains(needle);
        let matches_category =
            self.categories.is_empty() || self.categories.contains(&product.category);
        let matches_price = self.price_bands.is_empty()
            || self
                .price_bands
                .iter()
                .any(|band| band.contains(product.points));

        matches_search && matches_category && matches_price
    }
}

/// An immutable product list with unique ids.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// The storefront's built-in products.
    #[must_use]
    pub fn builtin() -> Self {
        let products = BUILTIN
            .iter()
            .map(
                |&(id, name, description, points, category, featured, image, stock)| Product {
                    id: ProductId::new(id),
                    name: name.to_string(),
                    description: description.to_string(),
                    image: Some(image.to_string()),
                    points: Points::new(points),
                    category: category.to_string(),
                    featured,
                    in_stock: stock > 0,
                    stock_quantity: Some(stock),
                },
            )
            .collect();
        Self { products }
    }

    /// Build a catalog from products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two products share an id.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        if let Some(dup) = products.iter().find(|p| !seen.insert(p.id)) {
            return Err(CatalogError::DuplicateId(dup.id));
        }
        Ok(Self { products })
    }

    /// Load a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed, or has
    /// duplicate ids.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let products = serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_products(products)
    }

    /// The configured catalog file, or the built-in catalog.
    ///
    /// # Errors
    ///
    /// See [`Catalog::load`].
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, CatalogError> {
        match &config.catalog_path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Distinct categories in catalog order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Products matching `query`, in the requested order.
    #[must_use]
    pub fn query(&self, query: &CatalogQuery) -> Vec<&Product> {
        let needle = query.search.trim().to_lowercase();
        let mut results: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| query.matches(p, &needle))
            .collect();

        match query.sort {
            SortOrder::Featured => results.sort_by_key(|p| !p.featured),
            SortOrder::Low => results.sort_by_key(|p| p.points),
            SortOrder::High => results.sort_by_key(|p| Reverse(p.points)),
        }
        results
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(products: &[&Product]) -> Vec<i64> {
        products.iter().map(|p| p.id.as_i64()).collect()
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.products().len(), 8);
        assert!(!catalog.get(ProductId::new(8)).unwrap().is_available());
        assert_eq!(
            catalog.categories(),
            vec!["Stationery", "Kitchen", "Electronics", "Accessories", "Home", "Personal Care"]
        );
    }

    #[test]
    fn test_search_is_case_insensitive_over_description() {
        let catalog = Catalog::builtin();
        let query = CatalogQuery {
            search: "  PLASTIC ".to_string(),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&catalog.query(&query)), vec![2, 5, 7, 8]);
    }

    #[test]
    fn test_featured_first_is_stable() {
        let catalog = Catalog::builtin();
        let results = catalog.query(&CatalogQuery::default());
        assert_eq!(ids(&results), vec![1, 2, 4, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn test_price_bands_combine() {
        let catalog = Catalog::builtin();
        let query = CatalogQuery {
            price_bands: vec![PriceBand::Under300, PriceBand::Over1000],
            sort: SortOrder::Low,
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&catalog.query(&query)), vec![7, 1, 3]);
    }

    #[test]
    fn test_category_and_sort_high() {
        let catalog = Catalog::builtin();
        let query = CatalogQuery {
            categories: vec!["Home".to_string(), "Kitchen".to_string()],
            sort: SortOrder::High,
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&catalog.query(&query)), vec![6, 4, 8, 2]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut products = Catalog::builtin().products().to_vec();
        products.push(products.first().unwrap().clone());
        assert!(matches!(
            Catalog::from_products(products),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"id": 11, "name": "Seed Paper", "points": 90, "stockQuantity": 3}]"#,
        )
        .unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.get(ProductId::new(11)).unwrap().stock_quantity, Some(3));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(Catalog::load(&path), Err(CatalogError::Parse { .. })));
        assert!(matches!(
            Catalog::load(&dir.path().join("missing.json")),
            Err(CatalogError::Io { .. })
        ));
    }
}
