use std::sync::Arc;
use std::time::Duration;

use lumiere_atelier::location::{Coordinates, FixedLocation, NoLocation};
use lumiere_atelier::persistence::{FileStore, KeyValueStore, LedgerRepository, REVIEWS_KEY};
use lumiere_atelier::query::SortMode;
use lumiere_atelier::recommend::OfflineRecommender;
use lumiere_atelier::{Price, ProductId, Rating, ReviewDraft, Storefront, StorefrontError};

async fn open(dir: &std::path::Path) -> Storefront {
    let repository = LedgerRepository::new(Arc::new(FileStore::new(dir)));
    Storefront::load(repository, Arc::new(OfflineRecommender), Duration::from_millis(50)).await
}

#[tokio::test]
async fn test_reviews_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let id = ProductId::new("4");
    {
        let mut store = open(dir.path()).await;
        let mut draft = ReviewDraft::new("Leela", Rating::new(5).unwrap(), "Smells like a bakery");
        store.submit_review(&id, &mut draft).await.unwrap();
        assert_eq!(draft, ReviewDraft::default());
    }
    let store = open(dir.path()).await;
    assert_eq!(store.reviews_for(&id).len(), 1);
    assert_eq!(store.average_rating(&id), Some(5.0));
    assert_eq!(store.visible_products()[0].id, id);
}

#[tokio::test]
async fn test_rejected_review_keeps_draft() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(dir.path()).await;
    let id = ProductId::new("1");
    let mut draft = ReviewDraft::new("", Rating::new(2).unwrap(), "Too sweet");
    let err = store.submit_review(&id, &mut draft).await.unwrap_err();
    assert!(matches!(err, StorefrontError::Review(_)));
    assert_eq!(draft.comment, "Too sweet");
    assert!(store.reviews_for(&id).is_empty());
    assert!(!dir.path().join("lumiere_reviews.json").exists());
}

#[tokio::test]
async fn test_corrupt_ledger_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    FileStore::new(dir.path()).set(REVIEWS_KEY, "[oops").await.unwrap();
    let store = open(dir.path()).await;
    assert!(store.catalog().iter().all(|p| store.average_rating(&p.id).is_none()));
}

#[tokio::test]
async fn test_northern_pricing_applies_to_cart() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(dir.path()).await;
    store.resolve_location(Arc::new(FixedLocation(Coordinates { latitude: 28.6, longitude: 77.2 })), Duration::from_secs(1));
    assert!(store.is_location_loading());
    while store.is_location_loading() {
        store.process_next().await;
    }
    assert_eq!(store.pricing().location_name, "Northern Region Studio");

    let lavender = ProductId::new("1");
    store.add_to_cart(&lavender).unwrap();
    store.add_to_cart(&lavender).unwrap();
    // 2499 * 1.05 = 2623.95 -> 2624 per unit
    assert_eq!(store.cart_total(), Price::new(5248));
    assert_eq!(store.display_price(store.product(&lavender).unwrap()), "₹2,624");

    store.set_sort(SortMode::PriceLow);
    store.set_max_price(2200);
    let visible: Vec<_> = store.visible_products().iter().map(|p| p.name.clone()).collect();
    assert_eq!(visible, vec!["Eucalyptus Rain"]);
}

#[tokio::test]
async fn test_location_applies_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(dir.path()).await;
    store.resolve_location(Arc::new(NoLocation), Duration::from_secs(1));
    assert!(store.process_next().await);
    assert_eq!(store.pricing().location_name, "Standard Zone");
    store.apply(lumiere_atelier::StoreEvent::LocationResolved(
        lumiere_atelier::pricing::PricingContext::for_zone(lumiere_atelier::pricing::Zone::Northern),
    ));
    assert_eq!(store.pricing().location_name, "Standard Zone");
}

#[tokio::test]
async fn test_full_order_with_custom_candle() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(dir.path()).await;
    store.add_to_cart(&ProductId::new("2")).unwrap();
    store.select_scent("forest pine").unwrap();
    store.select_wax_color("Honey Glow").unwrap();
    store.set_label("Cabin");
    let first = store.add_custom_candle();
    assert_eq!(store.builder().label, "");
    let second = store.add_custom_candle();
    assert_ne!(first, second);
    assert_eq!(store.cart().line_count(), 3);
    assert_eq!(store.cart_total(), Price::new(1999 + 3499 * 2));

    let decrement = store.update_quantity(&ProductId::new("2"), -1).unwrap();
    assert_eq!(decrement.value(), 1);
    store.remove_from_cart(&second).unwrap();

    store.open_checkout().unwrap();
    assert!(store.advance_to_review().is_err());
    let details = store.order_details_mut().unwrap();
    details.full_name = "Ira Das".into();
    details.address = "4 Lake Road".into();
    store.advance_to_review().unwrap();
    store.edit_details().unwrap();
    store.advance_to_review().unwrap();
    store.place_order().unwrap();
    while !store.is_order_complete() {
        assert!(store.process_next().await);
    }
    store.finish_order();
    assert!(store.cart().is_empty());
    assert!(store.open_checkout().is_err());
}

#[tokio::test]
async fn test_wishlist_toggle() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(dir.path()).await;
    let id = ProductId::new("3");
    assert!(store.toggle_wishlist(&id).unwrap());
    assert!(!store.toggle_wishlist(&id).unwrap());
    assert!(store.wishlist().is_empty());
    assert!(store.toggle_wishlist(&ProductId::new("nope")).is_err());
}

#[tokio::test]
async fn test_repeated_note_stays_selected() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(dir.path()).await;
    store.add_note("Vanilla");
    store.add_note("Vanilla");
    let visible: Vec<_> = store.visible_products().iter().map(|p| p.name.clone()).collect();
    assert_eq!(visible, vec!["Midnight Lavender"]);
}
