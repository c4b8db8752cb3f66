//! Product Aggregate

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::domain::value_objects::{Price, PriceMultiplier, ProductId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub scent_profile: String,
    pub description: String,
    pub image: String,
    pub notes: Vec<String>,
    pub category: Category,
    pub custom_details: Option<CustomDetails>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDetails { pub scent: String, pub wax_color: String, pub label: String }

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category { Floral, Woody, Fresh, Gourmand, Custom }

impl Category {
    pub const ALL: [Category; 5] = [Self::Floral, Self::Woody, Self::Fresh, Self::Gourmand, Self::Custom];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Floral => "Floral",
            Self::Woody => "Woody",
            Self::Fresh => "Fresh",
            Self::Gourmand => "Gourmand",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl std::str::FromStr for Category {
    type Err = ProductError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProductError::UnknownCategory(s.to_string()))
    }
}

impl Product {
    pub fn is_custom(&self) -> bool { self.category == Category::Custom }
    pub fn has_note(&self, note: &str) -> bool { self.notes.iter().any(|n| n == note) }
    pub fn adjusted_price(&self, multiplier: PriceMultiplier) -> Price { multiplier.apply(self.price) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum ProductError { UnknownCategory(String) }
impl std::error::Error for ProductError {}
impl fmt::Display for ProductError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::UnknownCategory(c) => write!(f, "Unknown category: {c}") }
    }
}
