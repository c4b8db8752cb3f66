//! Order details captured during checkout

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Mutable draft for the current order. Never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[validate(length(min = 1))]
    pub full_name: String,
    pub email: String,
    #[validate(length(min = 1))]
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub payment_method: PaymentMethod,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod { #[default] Card, Paypal }

impl std::str::FromStr for PaymentMethod {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "paypal" => Ok(Self::Paypal),
            other => Err(format!("Unknown payment method: {other}")),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self { Self::Card => write!(f, "Card"), Self::Paypal => write!(f, "PayPal") }
    }
}

impl OrderDetails {
    /// Fields that block the move to review, sorted by name.
    pub fn missing_fields(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(errors) => {
                let mut fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
                fields.sort();
                fields
            }
        }
    }
}
