//! Wishlist Aggregate

use crate::domain::aggregates::Product;
use crate::domain::value_objects::ProductId;

/// Starred products, unique by id, in the order they were starred.
#[derive(Clone, Debug, Default)]
pub struct Wishlist {
    items: Vec<Product>,
}

impl Wishlist {
    pub fn new() -> Self { Self::default() }

    pub fn items(&self) -> &[Product] { &self.items }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn contains(&self, id: &ProductId) -> bool { self.items.iter().any(|p| &p.id == id) }

    /// Returns whether the product is starred after the toggle.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.contains(&product.id) {
            self.items.retain(|p| p.id != product.id);
            false
        } else {
            self.items.push(product.clone());
            true
        }
    }
}
