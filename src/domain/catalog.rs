use std::collections::BTreeSet;

use super::{Product, ProductId, ProductView, SearchFilter};

/// A point-in-time copy of every product, in catalog insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn find(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.find(product_id).is_some()
    }

    pub fn price_of(&self, product_id: ProductId) -> Option<u64> {
        self.find(product_id).map(|product| product.price)
    }

    /// Matching products in insertion order. No ranking.
    pub fn search(&self, filter: &SearchFilter) -> Vec<ProductView> {
        self.products
            .iter()
            .filter(|product| product.matches(filter))
            .map(Product::view)
            .collect()
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.products
            .iter()
            .map(|product| product.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
