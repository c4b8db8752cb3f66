//! Lumière Atelier storefront engine
//!
//! Everything behind a single-page candle shop, without the page.
//!
//! ## Features
//! - Catalog browsing with category, note and price filters and four sort orders
//! - Location-aware pricing with whole-rupee display
//! - Cart, wishlist and a simulated three-step checkout
//! - Custom candle builder
//! - Per-product review journals persisted across sessions
//! - AI scent recommendations with graceful fallbacks

use thiserror::Error;

pub mod builder;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod location;
pub mod persistence;
pub mod pricing;
pub mod query;
pub mod recommend;
pub mod storefront;

pub use domain::aggregates::{
    Cart, CartError, CartItem, Category, Checkout, CheckoutError, CheckoutStep, OrderDetails, OrderStatus,
    PaymentMethod, Product, Review, ReviewDraft, ReviewError, ReviewLedger, Wishlist,
};
pub use domain::value_objects::{Price, PriceMultiplier, ProductId, Quantity, Rating};
pub use storefront::{StoreEvent, Storefront};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Recommendation(#[from] recommend::RecommendError),

    #[error(transparent)]
    Persistence(#[from] persistence::PersistenceError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
