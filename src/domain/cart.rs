use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::product::{Product, ProductId};

/// One product line in the cart.
///
/// Display fields are copied from the catalog when the product is first added and
/// are not refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl CartEntry {
    /// A fresh entry for a product being added for the first time.
    ///
    /// A catalog-side `amount` field is discarded; the entry's own amount replaces it.
    pub fn first(mut product: Product) -> Self {
        product.extra.remove("amount");
        Self { product, amount: 1 }
    }

    pub fn id(&self) -> ProductId {
        self.product.id
    }
}

/// Immutable snapshot of the cart, in first-add order.
///
/// Snapshots are cheap to clone and never change once built; every mutation
/// produces a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Arc<Vec<CartEntry>>,
}

impl Cart {
    pub fn new(entries: Vec<CartEntry>) -> Self {
        Self { entries: Arc::new(entries) }
    }

    /// Builds a cart from untrusted entries, dropping zero amounts and repeated ids.
    ///
    /// Returns the cart and the number of entries that were dropped.
    pub fn sanitized(entries: Vec<CartEntry>) -> (Self, usize) {
        let total = entries.len();
        let mut seen = HashSet::new();
        let kept: Vec<CartEntry> = entries
            .into_iter()
            .filter(|entry| entry.amount >= 1 && seen.insert(entry.id()))
            .collect();
        let dropped = total - kept.len();
        (Self::new(kept), dropped)
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn get(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn amount_of(&self, id: ProductId) -> u32 {
        self.get(id).map(|entry| entry.amount).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all amounts.
    pub fn item_count(&self) -> u64 {
        self.entries.iter().map(|entry| u64::from(entry.amount)).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.entries
            .iter()
            .map(|entry| entry.product.price * f64::from(entry.amount))
            .sum()
    }

    /// New snapshot with `id` set to `amount`, or `None` if `id` is not in the cart.
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Option<Cart> {
        debug_assert!(amount >= 1);
        self.get(id)?;
        let entries = self
            .entries
            .iter()
            .map(|entry| {
                if entry.id() == id {
                    CartEntry { amount, ..entry.clone() }
                } else {
                    entry.clone()
                }
            })
            .collect();
        Some(Cart::new(entries))
    }

    /// New snapshot with `entry` appended, or `None` if its id is already present.
    pub fn with_entry(&self, entry: CartEntry) -> Option<Cart> {
        if self.get(entry.id()).is_some() {
            return None;
        }
        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.extend(self.entries.iter().cloned());
        entries.push(entry);
        Some(Cart::new(entries))
    }

    /// New snapshot without `id`, or `None` if `id` is not in the cart.
    pub fn without(&self, id: ProductId) -> Option<Cart> {
        self.get(id)?;
        let entries = self
            .entries
            .iter()
            .filter(|entry| entry.id() != id)
            .cloned()
            .collect();
        Some(Cart::new(entries))
    }
}
