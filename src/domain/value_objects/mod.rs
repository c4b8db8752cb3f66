//! Value Objects for the atelier storefront

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Product identifier value object
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self { Self::new(value) }
}

/// Whole-rupee price. No fractional units are ever carried or shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    pub const fn new(amount: u64) -> Self { Self(amount) }
    pub const fn amount(&self) -> u64 { self.0 }
    pub fn multiply(&self, qty: u32) -> Price { Price(self.0.saturating_mul(u64::from(qty))) }
    pub fn add(&self, other: Price) -> Price { Price(self.0.saturating_add(other.0)) }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "₹{}", group_indian(self.0)) }
}

/// Groups digits the en-IN way: last three, then pairs (`12,34,567`).
pub fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 { return digits; }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Regional price multiplier
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceMultiplier(Decimal);

impl PriceMultiplier {
    pub const NEUTRAL: PriceMultiplier = PriceMultiplier(Decimal::ONE);

    pub fn new(factor: Decimal) -> Self { Self(factor) }
    pub fn factor(&self) -> Decimal { self.0 }

    /// Exact `base * factor`, used for filtering and sorting.
    pub fn scale(&self, base: Price) -> Decimal { Decimal::from(base.amount()) * self.0 }

    /// `base * factor` rounded half away from zero to a whole rupee.
    pub fn apply(&self, base: Price) -> Price {
        let rounded = self.scale(base).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Price(rounded.to_u64().unwrap_or(0))
    }
}

impl Default for PriceMultiplier { fn default() -> Self { Self::NEUTRAL } }

impl fmt::Display for PriceMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "x{}", self.0) }
}

/// Star rating, always within 1..=5
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, RatingError> {
        if !(Self::MIN..=Self::MAX).contains(&value) { return Err(RatingError::OutOfRange(value)); }
        Ok(Self(value))
    }

    /// What the star input control does with any raw value.
    pub fn clamped(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        Self(u8::try_from(clamped).unwrap_or(Self::MAX))
    }

    pub fn value(&self) -> u8 { self.0 }
}

impl Default for Rating { fn default() -> Self { Self(Self::MAX) } }

impl TryFrom<u8> for Rating {
    type Error = RatingError;
    fn try_from(value: u8) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self { rating.0 }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum RatingError { OutOfRange(u8) }
impl std::error::Error for RatingError {}
impl fmt::Display for RatingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::OutOfRange(v) => write!(f, "Rating {v} outside 1..=5") }
    }
}

/// Line item quantity, never below one
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    pub fn value(&self) -> u32 { self.0 }
    pub fn increment(&self) -> Self { Self(self.0.saturating_add(1)) }

    /// `max(1, current + delta)`
    pub fn shift(&self, delta: i32) -> Self {
        let next = i64::from(self.0) + i64::from(delta);
        Self(u32::try_from(next.max(1)).unwrap_or(u32::MAX))
    }
}

impl Default for Quantity { fn default() -> Self { Self::ONE } }
