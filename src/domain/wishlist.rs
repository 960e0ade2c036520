use serde::{Deserialize, Serialize};

use super::{Catalog, Product, ProductId};

/// Saved-for-later product ids. Insertion ordered, never holds duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ProductId>", into = "Vec<ProductId>")]
pub struct Wishlist {
    ids: Vec<ProductId>,
}

impl From<Vec<ProductId>> for Wishlist {
    fn from(ids: Vec<ProductId>) -> Self {
        let mut wishlist = Self::default();
        for id in ids {
            wishlist.add(id);
        }
        wishlist
    }
}

impl From<Wishlist> for Vec<ProductId> {
    fn from(wishlist: Wishlist) -> Self {
        wishlist.ids
    }
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the id was already present.
    pub fn add(&mut self, product_id: ProductId) -> bool {
        if self.contains(product_id) {
            return false;
        }
        self.ids.push(product_id);
        true
    }

    /// Returns `false` if the id was not present.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&id| id != product_id);
        self.ids.len() != before
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.ids.contains(&product_id)
    }

    /// Appends every id from `other` not already present, keeping order.
    pub fn merge(&mut self, other: &Wishlist) {
        for &id in &other.ids {
            self.add(id);
        }
    }

    /// Keeps only ids the catalog still knows about.
    pub fn retain_known(&mut self, catalog: &Catalog) {
        self.ids.retain(|&id| catalog.contains(id));
    }

    /// Products for the stored ids. Ids that no longer resolve are skipped.
    pub fn resolve(&self, catalog: &Catalog) -> Vec<Product> {
        self.ids.iter().filter_map(|&id| catalog.find(id).cloned()).collect()
    }

    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
