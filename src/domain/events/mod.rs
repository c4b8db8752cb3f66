//! Domain events
use crate::domain::value_objects::{ProductId, Rating};

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Cart(CartEvent),
    Review(ReviewEvent),
    Checkout(CheckoutEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CartEvent {
    ItemAdded { product_id: ProductId, quantity: u32 },
    ItemRemoved { product_id: ProductId },
    QuantityChanged { product_id: ProductId, quantity: u32 },
    Cleared,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReviewEvent {
    Submitted { product_id: ProductId, review_id: String, rating: Rating },
}

#[derive(Clone, Debug, PartialEq)]
pub enum CheckoutEvent {
    AdvancedToReview,
    ReturnedToShipping,
    OrderPlaced { session: u64 },
    Settled { session: u64 },
    Abandoned { session: u64 },
    Reset,
}
