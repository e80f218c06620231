//! Product catalog collaborator
//!
//! The engine does not own the catalog; it only needs price/unit/category
//! lookups at admission time and candidate pools for stock substitution. The
//! trait is the seam; the in-memory implementation backs the server bootstrap
//! and the tests.

use dashmap::DashMap;
use shared::order::Quantity;

/// Product metadata the engine cares about
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInfo {
    pub product_id: i64,
    pub name: String,
    pub category_id: i64,
    /// Per-kg for weight-based products, per-unit otherwise
    pub unit_price_cents: i64,
    /// True when sold by weight (quantity in grams)
    pub weight_based: bool,
    pub in_stock: bool,
}

impl ProductInfo {
    /// Whether a submitted quantity matches this product's sale unit
    pub fn accepts(&self, quantity: &Quantity) -> bool {
        self.weight_based == quantity.is_weight()
    }
}

/// Catalog lookup seam
pub trait ProductCatalog: Send + Sync {
    /// Look up a single product
    fn get_product(&self, product_id: i64) -> Option<ProductInfo>;

    /// All products of a category (substitution candidate pool)
    fn products_in_category(&self, category_id: i64) -> Vec<ProductInfo>;
}

/// In-memory catalog backed by a concurrent map
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: DashMap<i64, ProductInfo>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product
    pub fn insert(&self, product: ProductInfo) {
        self.products.insert(product.product_id, product);
    }

    /// Flip a product's stock flag
    pub fn set_stock(&self, product_id: i64, in_stock: bool) {
        if let Some(mut p) = self.products.get_mut(&product_id) {
            p.in_stock = in_stock;
        }
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn get_product(&self, product_id: i64) -> Option<ProductInfo> {
        self.products.get(&product_id).map(|p| p.clone())
    }

    fn products_in_category(&self, category_id: i64) -> Vec<ProductInfo> {
        self.products
            .iter()
            .filter(|p| p.category_id == category_id)
            .map(|p| p.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, category: i64, price: i64) -> ProductInfo {
        ProductInfo {
            product_id: id,
            name: format!("product-{id}"),
            category_id: category,
            unit_price_cents: price,
            weight_based: true,
            in_stock: true,
        }
    }

    #[test]
    fn test_lookup_and_category_pool() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(product(1, 10, 2000));
        catalog.insert(product(2, 10, 1800));
        catalog.insert(product(3, 11, 900));

        assert_eq!(catalog.get_product(1).unwrap().unit_price_cents, 2000);
        assert!(catalog.get_product(99).is_none());

        let pool = catalog.products_in_category(10);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_unit_match() {
        let p = product(1, 10, 2000);
        assert!(p.accepts(&Quantity::Weight { grams: 500 }));
        assert!(!p.accepts(&Quantity::Count { units: 1 }));
    }
}
