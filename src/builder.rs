//! Custom Product Builder

use uuid::Uuid;

use crate::catalog::{WaxColor, CUSTOM_SCENTS, WAX_COLORS};
use crate::domain::aggregates::{Category, CustomDetails, Product};
use crate::domain::value_objects::{Price, ProductId};

pub const CUSTOM_PRICE: Price = Price::new(3499);
pub const DEFAULT_LABEL: &str = "The Original";
const CUSTOM_NAME: &str = "Custom Atelier Candle";
const CUSTOM_IMAGE: &str = "https://images.unsplash.com/photo-1595914041113-ef93103233c0?auto=format&fit=crop&q=80&w=800";

/// Current builder selections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandleBuilder {
    pub scent: String,
    pub wax_color: WaxColor,
    pub label: String,
}

impl Default for CandleBuilder {
    fn default() -> Self {
        Self { scent: CUSTOM_SCENTS[0].to_string(), wax_color: WAX_COLORS[0], label: String::new() }
    }
}

impl CandleBuilder {
    /// Synthesizes a fresh custom product. Ids are time-ordered UUIDs, unique per call.
    pub fn build(&self) -> Product {
        let label = if self.label.is_empty() { DEFAULT_LABEL } else { self.label.as_str() };
        Product {
            id: ProductId::new(format!("custom-{}", Uuid::now_v7())),
            name: CUSTOM_NAME.to_string(),
            price: CUSTOM_PRICE,
            scent_profile: format!("Custom {}", self.scent),
            description: format!("A unique creation featuring {} scent and a {} wax finish.", self.scent, self.wax_color.name),
            image: CUSTOM_IMAGE.to_string(),
            notes: vec![self.scent.clone(), format!("Custom Label: {label}")],
            category: Category::Custom,
            custom_details: Some(CustomDetails {
                scent: self.scent.clone(),
                wax_color: self.wax_color.hex.to_string(),
                label: self.label.clone(),
            }),
        }
    }

    /// Ready for the next design: only the label is cleared.
    pub fn clear_label(&mut self) { self.label.clear(); }
}
