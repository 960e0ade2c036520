use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Catalog, Product, ProductId};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("cart total does not fit in an amount")]
    TotalOverflow,
}

fn subtotal(price: u64, quantity: u32) -> Result<u64, CartError> {
    price.checked_mul(u64::from(quantity)).ok_or(CartError::TotalOverflow)
}

/// Pending purchase quantities keyed by product. Quantities are always
/// positive; an entry that would drop to zero is removed instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: BTreeMap<ProductId, u32>,
}

/// One resolved cart entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    pub subtotal: u64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` to the entry, creating it at `delta` if absent. Returns the
    /// new quantity. Callers are responsible for checking the product exists.
    pub fn add(&mut self, product_id: ProductId, delta: u32) -> u32 {
        let quantity = self.items.entry(product_id).or_insert(0);
        *quantity = quantity.saturating_add(delta);
        *quantity
    }

    /// Takes one unit off. Returns the remaining quantity, or `None` when the
    /// entry is gone (or never existed).
    pub fn decrement(&mut self, product_id: ProductId) -> Option<u32> {
        let quantity = self.items.get_mut(&product_id)?;
        *quantity = quantity.saturating_sub(1);
        if *quantity == 0 {
            self.items.remove(&product_id);
            return None;
        }
        Some(*quantity)
    }

    /// Drops the entry. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        self.items.remove(&product_id).is_some()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn quantity(&self, product_id: ProductId) -> Option<u32> {
        self.items.get(&product_id).copied()
    }

    pub fn items(&self) -> &BTreeMap<ProductId, u32> {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Folds another cart in, adding quantities line by line.
    pub fn merge(&mut self, other: &Cart) {
        for (&product_id, &quantity) in &other.items {
            self.add(product_id, quantity);
        }
    }

    /// Sum of quantity times current price. Products missing from the
    /// catalog contribute nothing.
    ///
    /// # Errors
    /// `TotalOverflow` when a subtotal or the sum does not fit in a `u64`.
    pub fn total(&self, catalog: &Catalog) -> Result<u64, CartError> {
        self.items.iter().try_fold(0u64, |total, (&id, &quantity)| match catalog.price_of(id) {
            Some(price) => total.checked_add(subtotal(price, quantity)?).ok_or(CartError::TotalOverflow),
            None => Ok(total),
        })
    }

    /// Entries that still resolve, in product id order.
    pub fn lines(&self, catalog: &Catalog) -> Result<Vec<CartLine>, CartError> {
        self.items
            .iter()
            .filter_map(|(&id, &quantity)| catalog.find(id).map(|product| (product, quantity)))
            .map(|(product, quantity)| {
                Ok(CartLine {
                    product: product.clone(),
                    quantity,
                    subtotal: subtotal(product.price, quantity)?,
                })
            })
            .collect()
    }
}
