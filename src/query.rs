//! Query Pipeline
//!
//! The displayed product list is always recomputed from its inputs by
//! [`run`]; nothing stores the filtered list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::domain::aggregates::{Category, Product, ReviewLedger};
use crate::domain::value_objects::{Price, PriceMultiplier};

pub const PRICE_CEILING_MIN: u64 = 1000;
pub const PRICE_CEILING_MAX: u64 = 5000;
pub const PRICE_CEILING_STEP: u64 = 100;
pub const PRICE_PRESETS: [u64; 3] = [1500, 2500, 3500];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter { #[default] All, Only(Category) }

impl FromStr for CategoryFilter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") { return Ok(Self::All); }
        s.parse::<Category>().map(Self::Only).map_err(|e| e.to_string())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortMode { #[default] Popularity, PriceLow, PriceHigh, Name }

impl FromStr for SortMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "popularity" => Ok(Self::Popularity),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "name" => Ok(Self::Name),
            other => Err(format!("Unknown sort mode: {other}")),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Popularity => "popularity",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Name => "name",
        })
    }
}

/// Current filter and sort selections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogQuery {
    pub category: CategoryFilter,
    notes: Vec<String>,
    max_price: Price,
    pub sort: SortMode,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self { category: CategoryFilter::All, notes: vec![], max_price: Price::new(PRICE_CEILING_MAX), sort: SortMode::Popularity }
    }
}

impl CatalogQuery {
    pub fn notes(&self) -> &[String] { &self.notes }
    pub fn max_price(&self) -> Price { self.max_price }

    /// Adds the note if absent, removes it if present.
    pub fn toggle_note(&mut self, note: &str) {
        if let Some(pos) = self.notes.iter().position(|n| n == note) {
            self.notes.remove(pos);
        } else {
            self.notes.push(note.to_string());
        }
    }

    /// Selects the note; already selected notes stay selected.
    pub fn add_note(&mut self, note: &str) {
        if !self.notes.iter().any(|n| n == note) {
            self.notes.push(note.to_string());
        }
    }

    /// Clamped into the slider range.
    pub fn set_max_price(&mut self, ceiling: u64) {
        self.max_price = Price::new(ceiling.clamp(PRICE_CEILING_MIN, PRICE_CEILING_MAX));
    }

    pub fn clear_filters(&mut self) {
        self.notes.clear();
        self.max_price = Price::new(PRICE_CEILING_MAX);
        self.category = CategoryFilter::All;
    }

    pub fn has_active_filters(&self) -> bool {
        !self.notes.is_empty() || self.max_price.amount() < PRICE_CEILING_MAX
    }

    fn matches(&self, product: &Product, multiplier: PriceMultiplier) -> bool {
        let category_ok = match self.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => product.category == c,
        };
        category_ok
            && self.notes.iter().all(|n| product.has_note(n))
            && multiplier.scale(product.price) <= Decimal::from(self.max_price.amount())
    }
}

/// Filters then sorts the catalog. Sorting is stable, so popularity ties keep catalog order.
pub fn run<'a>(catalog: &'a [Product], ledger: &ReviewLedger, query: &CatalogQuery, multiplier: PriceMultiplier) -> Vec<&'a Product> {
    let mut result: Vec<&Product> = catalog.iter().filter(|p| query.matches(p, multiplier)).collect();
    match query.sort {
        SortMode::PriceLow => result.sort_by(|a, b| multiplier.scale(a.price).cmp(&multiplier.scale(b.price))),
        SortMode::PriceHigh => result.sort_by(|a, b| multiplier.scale(b.price).cmp(&multiplier.scale(a.price))),
        SortMode::Name => result.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortMode::Popularity => result.sort_by_key(|p| std::cmp::Reverse(ledger.popularity(&p.id))),
    }
    result
}

/// Base letters first, then accents, then case.
fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

fn collation_key(name: &str) -> String {
    name.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::domain::aggregates::ReviewDraft;
    use crate::domain::value_objects::{ProductId, Rating};

    fn names(list: &[&Product]) -> Vec<String> { list.iter().map(|p| p.name.clone()).collect() }

    fn review(ledger: &mut ReviewLedger, id: &str, rating: u8) {
        ledger.submit(&ProductId::new(id), &ReviewDraft::new("Asha", Rating::new(rating).unwrap(), "Fine")).unwrap();
    }

    #[test]
    fn test_notes_are_conjunctive() {
        let catalog = catalog::products();
        let ledger = ReviewLedger::new();
        let mut query = CatalogQuery::default();
        query.toggle_note("Lavender");
        query.toggle_note("Vanilla");
        assert_eq!(names(&run(&catalog, &ledger, &query, PriceMultiplier::NEUTRAL)), vec!["Midnight Lavender"]);

        query.toggle_note("Cedar");
        assert!(run(&catalog, &ledger, &query, PriceMultiplier::NEUTRAL).is_empty());

        query.toggle_note("Cedar");
        query.toggle_note("Vanilla");
        query.toggle_note("Lavender");
        assert!(query.notes().is_empty());
        assert_eq!(run(&catalog, &ledger, &query, PriceMultiplier::NEUTRAL).len(), 4);
    }

    #[test]
    fn test_add_note_is_idempotent() {
        let mut query = CatalogQuery::default();
        query.add_note("Cedar");
        query.add_note("Cedar");
        assert_eq!(query.notes(), ["Cedar".to_string()]);
        let catalog = catalog::products();
        assert_eq!(names(&run(&catalog, &ReviewLedger::new(), &query, PriceMultiplier::NEUTRAL)), vec!["Spiced Sandalwood"]);
    }

    #[test]
    fn test_category_and_price_ceiling() {
        let catalog = catalog::products();
        let ledger = ReviewLedger::new();
        let mut query = CatalogQuery { category: CategoryFilter::Only(Category::Fresh), ..Default::default() };
        assert_eq!(names(&run(&catalog, &ledger, &query, PriceMultiplier::NEUTRAL)), vec!["Eucalyptus Rain"]);

        query.category = CategoryFilter::All;
        query.set_max_price(2299);
        let neutral = names(&run(&catalog, &ledger, &query, PriceMultiplier::NEUTRAL));
        assert_eq!(neutral, vec!["Eucalyptus Rain", "Velvet Vanilla"]); // inclusive bound

        // 2299 * 1.05 = 2413.95 is over the ceiling once adjusted
        let north = PriceMultiplier::new(Decimal::new(105, 2));
        assert_eq!(names(&run(&catalog, &ledger, &query, north)), vec!["Eucalyptus Rain"]);
    }

    #[test]
    fn test_ceiling_clamps() {
        let mut query = CatalogQuery::default();
        assert!(!query.has_active_filters());
        query.set_max_price(10);
        assert_eq!(query.max_price(), Price::new(PRICE_CEILING_MIN));
        assert!(query.has_active_filters());
        query.set_max_price(90_000);
        assert_eq!(query.max_price(), Price::new(PRICE_CEILING_MAX));
        query.toggle_note("Amber");
        query.category = CategoryFilter::Only(Category::Woody);
        query.clear_filters();
        assert_eq!(query, CatalogQuery::default());
    }

    #[test]
    fn test_price_and_name_sorts() {
        let catalog = catalog::products();
        let ledger = ReviewLedger::new();
        let mut query = CatalogQuery { sort: SortMode::PriceLow, ..Default::default() };
        assert_eq!(
            names(&run(&catalog, &ledger, &query, PriceMultiplier::NEUTRAL)),
            vec!["Eucalyptus Rain", "Velvet Vanilla", "Midnight Lavender", "Spiced Sandalwood"]
        );
        query.sort = SortMode::PriceHigh;
        assert_eq!(names(&run(&catalog, &ledger, &query, PriceMultiplier::NEUTRAL))[0], "Spiced Sandalwood");
        query.sort = SortMode::Name;
        assert_eq!(
            names(&run(&catalog, &ledger, &query, PriceMultiplier::NEUTRAL)),
            vec!["Eucalyptus Rain", "Midnight Lavender", "Spiced Sandalwood", "Velvet Vanilla"]
        );
    }

    #[test]
    fn test_name_sort_folds_accents() {
        let ledger = ReviewLedger::new();
        let catalog: Vec<Product> = ["Zeste", "Éclat", "Ambre", "eclat", "Figue"].iter().enumerate()
            .map(|(i, name)| Product { id: ProductId::new(i.to_string()), name: name.to_string(), ..catalog::products()[0].clone() })
            .collect();
        let query = CatalogQuery { sort: SortMode::Name, ..Default::default() };
        assert_eq!(
            names(&run(&catalog, &ledger, &query, PriceMultiplier::NEUTRAL)),
            vec!["Ambre", "eclat", "Éclat", "Figue", "Zeste"]
        );
    }

    #[test]
    fn test_popularity_sort() {
        let catalog = catalog::products();
        let mut ledger = ReviewLedger::new();
        review(&mut ledger, "3", 5);
        review(&mut ledger, "4", 5);
        review(&mut ledger, "4", 5);
        let query = CatalogQuery::default();
        let ordered = names(&run(&catalog, &ledger, &query, PriceMultiplier::NEUTRAL));
        // 10, 5, then the unreviewed pair in catalog order
        assert_eq!(ordered, vec!["Velvet Vanilla", "Spiced Sandalwood", "Midnight Lavender", "Eucalyptus Rain"]);
    }

    #[test]
    fn test_parse_selections() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!("Gourmand".parse::<CategoryFilter>().unwrap(), CategoryFilter::Only(Category::Gourmand));
        assert_eq!("price-high".parse::<SortMode>().unwrap(), SortMode::PriceHigh);
        assert!("rating".parse::<SortMode>().is_err());
    }
}
