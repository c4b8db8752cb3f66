//! Catalog Store: the fixed candle range and the builder's option lists.

use std::collections::BTreeSet;

use crate::domain::aggregates::{Category, Product};
use crate::domain::value_objects::{Price, ProductId};

pub const CUSTOM_SCENTS: [&str; 5] = ["Wild Lavender", "Madagascar Vanilla", "Zesty Citrus", "Forest Pine", "Deep Sandalwood"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaxColor { pub name: &'static str, pub hex: &'static str }

pub const WAX_COLORS: [WaxColor; 5] = [
    WaxColor { name: "Natural Cream", hex: "#FAF9F6" },
    WaxColor { name: "Sage Leaf", hex: "#E3E8E1" },
    WaxColor { name: "Dusty Rose", hex: "#FCE7F3" },
    WaxColor { name: "Morning Mist", hex: "#E0F2FE" },
    WaxColor { name: "Honey Glow", hex: "#FEF3C7" },
];

pub fn wax_color(name: &str) -> Option<WaxColor> {
    WAX_COLORS.into_iter().find(|c| c.name.eq_ignore_ascii_case(name.trim()) || c.hex.eq_ignore_ascii_case(name.trim()))
}

fn product(id: &str, name: &str, price: u64, profile: &str, description: &str, image: &str, notes: [&str; 3], category: Category) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Price::new(price),
        scent_profile: profile.to_string(),
        description: description.to_string(),
        image: image.to_string(),
        notes: notes.iter().map(|n| n.to_string()).collect(),
        category,
        custom_details: None,
    }
}

pub fn products() -> Vec<Product> {
    vec![
        product(
            "1", "Midnight Lavender", 2499, "Calming & Dreamy",
            "A soothing blend of French lavender, chamomile, and a hint of vanilla bean to guide you into a restful sleep.",
            "https://images.unsplash.com/photo-1602874801007-bd458bb1b8b6?auto=format&fit=crop&q=80&w=800",
            ["Lavender", "Chamomile", "Vanilla"], Category::Floral,
        ),
        product(
            "2", "Eucalyptus Rain", 1999, "Crisp & Refreshing",
            "The smell of a forest after a spring downpour. Invigorating eucalyptus mixed with wet earth and silver fir.",
            "https://images.unsplash.com/photo-1595433707802-6806f3f0440a?auto=format&fit=crop&q=80&w=800",
            ["Eucalyptus", "Spearmint", "Silver Fir"], Category::Fresh,
        ),
        product(
            "3", "Spiced Sandalwood", 2899, "Warm & Grounding",
            "A sophisticated, deep aroma featuring creamy sandalwood, crushed cardamom, and aged cedarwood.",
            "https://images.unsplash.com/photo-1572726710706-7ee75fa9f992?auto=format&fit=crop&q=80&w=800",
            ["Sandalwood", "Cardamom", "Cedar"], Category::Woody,
        ),
        product(
            "4", "Velvet Vanilla", 2299, "Sweet & Intimate",
            "Not your average vanilla. Deep bourbon vanilla pods infused with white musk and a touch of amber.",
            "https://images.unsplash.com/photo-1536924430914-91f9e2041b83?auto=format&fit=crop&q=80&w=800",
            ["Bourbon Vanilla", "White Musk", "Amber"], Category::Gourmand,
        ),
    ]
}

/// Every note in the catalog, sorted and de-duplicated.
pub fn all_unique_notes(catalog: &[Product]) -> Vec<String> {
    catalog.iter().flat_map(|p| p.notes.iter().cloned()).collect::<BTreeSet<_>>().into_iter().collect()
}

pub fn find<'a>(catalog: &'a [Product], id: &ProductId) -> Option<&'a Product> {
    catalog.iter().find(|p| &p.id == id)
}
