//! Pricing Engine: location zones, adjusted prices and currency display.

use rust_decimal::Decimal;

use crate::domain::value_objects::{group_indian, Price, PriceMultiplier};

pub const CURRENCY_GLYPH: &str = "₹";

/// Named pricing zone resolved from a latitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone { Northern, Southern, Central, Standard }

impl Zone {
    pub fn for_latitude(latitude: f64) -> Self {
        if latitude > 25.0 { Self::Northern } else if latitude < 15.0 { Self::Southern } else { Self::Central }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Northern => "Northern Region Studio",
            Self::Southern => "Southern Coast Studio",
            Self::Central => "Central Hub",
            Self::Standard => "Standard Zone",
        }
    }

    pub fn multiplier(&self) -> PriceMultiplier {
        match self {
            Self::Northern => PriceMultiplier::new(Decimal::new(105, 2)),
            Self::Southern => PriceMultiplier::new(Decimal::new(98, 2)),
            Self::Central | Self::Standard => PriceMultiplier::NEUTRAL,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PricingContext {
    pub location_name: String,
    pub multiplier: PriceMultiplier,
}

impl PricingContext {
    pub fn for_zone(zone: Zone) -> Self {
        Self { location_name: zone.name().to_string(), multiplier: zone.multiplier() }
    }

    pub fn adjusted_price(&self, base: Price) -> Price { self.multiplier.apply(base) }
}

impl Default for PricingContext {
    fn default() -> Self { Self::for_zone(Zone::Standard) }
}

/// `₹` plus en-IN grouping, whole rupees only.
pub fn format_currency(amount: Price) -> String {
    format!("{CURRENCY_GLYPH}{}", group_indian(amount.amount()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zones() {
        assert_eq!(Zone::for_latitude(28.6), Zone::Northern);
        assert_eq!(Zone::for_latitude(25.0), Zone::Central);
        assert_eq!(Zone::for_latitude(15.0), Zone::Central);
        assert_eq!(Zone::for_latitude(13.1), Zone::Southern);
        assert_eq!(Zone::for_latitude(-33.9), Zone::Southern);
    }

    #[test]
    fn test_context_pricing() {
        let north = PricingContext::for_zone(Zone::Northern);
        assert_eq!(north.location_name, "Northern Region Studio");
        assert_eq!(north.adjusted_price(Price::new(2000)), Price::new(2100));
        let fallback = PricingContext::default();
        assert_eq!(fallback.location_name, "Standard Zone");
        assert_eq!(fallback.multiplier, PriceMultiplier::NEUTRAL);
        assert_eq!(format_currency(Price::new(123456)), "₹1,23,456");
    }
}
