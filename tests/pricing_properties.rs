//! Property tests for regional pricing and cart totals.

use proptest::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use lumiere_atelier::catalog;
use lumiere_atelier::domain::aggregates::Cart;
use lumiere_atelier::pricing::{PricingContext, Zone};
use lumiere_atelier::{Price, PriceMultiplier};

fn zone() -> impl Strategy<Value = Zone> {
    prop_oneof![Just(Zone::Northern), Just(Zone::Southern), Just(Zone::Central), Just(Zone::Standard)]
}

fn rounded(base: u64, factor: Decimal) -> u64 {
    let exact = Decimal::from(base) * factor;
    let floor = exact.floor();
    let whole = if exact - floor >= Decimal::new(5, 1) { floor + Decimal::ONE } else { floor };
    whole.to_u64().unwrap()
}

proptest! {
    #[test]
    fn prop_adjusted_price_rounds_half_up(base in 1u64..1_000_000, zone in zone()) {
        let ctx = PricingContext::for_zone(zone);
        let factor = ctx.multiplier.factor();
        prop_assert!([Decimal::new(105, 2), Decimal::new(98, 2), Decimal::ONE].contains(&factor));
        prop_assert_eq!(ctx.adjusted_price(Price::new(base)).amount(), rounded(base, factor));
    }

    #[test]
    fn prop_catalog_prices_follow_zone(zone in zone()) {
        let multiplier = zone.multiplier();
        for product in catalog::products() {
            let expected = (Decimal::from(product.price.amount()) * multiplier.factor())
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            prop_assert_eq!(Decimal::from(product.adjusted_price(multiplier).amount()), expected);
        }
    }

    #[test]
    fn prop_cart_total_sums_rounded_units(quantities in prop::collection::vec(1u32..6, 4), zone in zone()) {
        let multiplier: PriceMultiplier = zone.multiplier();
        let products = catalog::products();
        let mut cart = Cart::new();
        let mut expected = 0u64;
        for (product, qty) in products.iter().zip(&quantities) {
            for _ in 0..*qty { cart.add(product.clone()); }
            expected += multiplier.apply(product.price).amount() * u64::from(*qty);
        }
        prop_assert_eq!(cart.total(multiplier), Price::new(expected));
        prop_assert_eq!(cart.item_count(), quantities.iter().sum::<u32>());
    }
}
