//! Cart Aggregate

use crate::domain::aggregates::Product;
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::value_objects::{Price, PriceMultiplier, ProductId, Quantity};

#[derive(Clone, Debug, Default)]
pub struct Cart {
    items: Vec<CartItem>,
    events: Vec<DomainEvent>,
}

/// A product snapshot plus its quantity.
#[derive(Clone, Debug, PartialEq)]
pub struct CartItem {
    pub product: Product,
    pub quantity: Quantity,
}

impl CartItem {
    pub fn id(&self) -> &ProductId { &self.product.id }
    pub fn unit_price(&self, multiplier: PriceMultiplier) -> Price { multiplier.apply(self.product.price) }
    pub fn line_total(&self, multiplier: PriceMultiplier) -> Price { self.unit_price(multiplier).multiply(self.quantity.value()) }
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn line_count(&self) -> usize { self.items.len() }
    pub fn item_count(&self) -> u32 { self.items.iter().map(|i| i.quantity.value()).sum() }
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> { self.items.iter().find(|i| i.id() == id) }

    /// Catalog products merge by id; every custom build is its own line.
    pub fn add(&mut self, product: Product) {
        let mergeable = !product.is_custom();
        if let Some(existing) = self.items.iter_mut().find(|i| mergeable && i.product.id == product.id) {
            existing.quantity = existing.quantity.increment();
            let quantity = existing.quantity.value();
            self.raise_event(DomainEvent::Cart(CartEvent::ItemAdded { product_id: product.id, quantity }));
            return;
        }
        let product_id = product.id.clone();
        self.items.push(CartItem { product, quantity: Quantity::ONE });
        self.raise_event(DomainEvent::Cart(CartEvent::ItemAdded { product_id, quantity: 1 }));
    }

    pub fn remove(&mut self, id: &ProductId) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|i| i.id() != id);
        if self.items.len() == before { return Err(CartError::ItemNotFound(id.clone())); }
        self.raise_event(DomainEvent::Cart(CartEvent::ItemRemoved { product_id: id.clone() }));
        Ok(())
    }

    /// Applies `delta` with a floor of one. Never removes the line.
    pub fn set_quantity_delta(&mut self, id: &ProductId, delta: i32) -> Result<Quantity, CartError> {
        let item = self.items.iter_mut().find(|i| i.id() == id).ok_or_else(|| CartError::ItemNotFound(id.clone()))?;
        item.quantity = item.quantity.shift(delta);
        let quantity = item.quantity;
        self.raise_event(DomainEvent::Cart(CartEvent::QuantityChanged { product_id: id.clone(), quantity: quantity.value() }));
        Ok(quantity)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.raise_event(DomainEvent::Cart(CartEvent::Cleared));
    }

    /// Sum of per-unit rounded prices times quantity. The grand total is never rounded.
    pub fn total(&self, multiplier: PriceMultiplier) -> Price {
        self.items.iter().fold(Price::default(), |acc, i| acc.add(i.line_total(multiplier)))
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum CartError { ItemNotFound(ProductId), EmptyCart }
impl std::error::Error for CartError {}
impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemNotFound(id) => write!(f, "Item not found: {id}"),
            Self::EmptyCart => write!(f, "Cart is empty"),
        }
    }
}
