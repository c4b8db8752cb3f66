//! Aggregates module
pub mod product;
pub mod cart;
pub mod wishlist;
pub mod review;
pub mod order;
pub mod checkout;

pub use product::{Category, CustomDetails, Product, ProductError};
pub use cart::{Cart, CartError, CartItem};
pub use wishlist::Wishlist;
pub use review::{Review, ReviewDraft, ReviewError, ReviewLedger};
pub use order::{OrderDetails, PaymentMethod};
pub use checkout::{Checkout, CheckoutError, CheckoutStep, OrderStatus, SettlementTicket};
