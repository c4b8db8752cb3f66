//! Storefront controller.
//!
//! Owns every piece of session state and exposes intention-revealing
//! operations over it. Asynchronous work (location lookup, recommendation,
//! payment settlement) runs in spawned tasks that report back as
//! [`StoreEvent`]s; [`Storefront::apply`] folds them in one at a time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::builder::CandleBuilder;
use crate::catalog::{self, CUSTOM_SCENTS};
use crate::config::StorefrontConfig;
use crate::domain::aggregates::{
    Cart, CartError, Checkout, CheckoutStep, OrderDetails, Product, Review, ReviewDraft, ReviewLedger,
    SettlementTicket, Wishlist,
};
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::value_objects::{Price, ProductId, Quantity};
use crate::location::{self, FixedLocation, LocationResolver, NoLocation};
use crate::persistence::{FileStore, LedgerRepository};
use crate::pricing::{format_currency, PricingContext};
use crate::query::{self, CatalogQuery, CategoryFilter, SortMode};
use crate::recommend::{GeminiRecommender, InFlight, OfflineRecommender, RecommendationDesk, Recommender};
use crate::{Result, StorefrontError};

/// Completion of an asynchronous operation.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    LocationResolved(PricingContext),
    Settled(SettlementTicket),
    Recommendation(String),
}

/// Which overlays are showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub cart_open: bool,
    pub quick_view: Option<ProductId>,
}

pub struct Storefront {
    catalog: Vec<Product>,
    ledger: ReviewLedger,
    repository: LedgerRepository,
    cart: Cart,
    wishlist: Wishlist,
    query: CatalogQuery,
    pricing: PricingContext,
    location_pending: bool,
    checkout: Checkout,
    settlement: Option<JoinHandle<()>>,
    settlement_delay: Duration,
    builder: CandleBuilder,
    desk: RecommendationDesk,
    recommendation: Option<String>,
    recommendation_request: Option<InFlight>,
    view: ViewState,
    events_tx: mpsc::UnboundedSender<StoreEvent>,
    events_rx: mpsc::UnboundedReceiver<StoreEvent>,
}

impl Storefront {
    /// Loads the review ledger once and starts with standard-zone pricing.
    pub async fn load(repository: LedgerRepository, recommender: Arc<dyn Recommender>, settlement_delay: Duration) -> Self {
        let ledger = repository.load().await;
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            catalog: catalog::products(),
            ledger,
            repository,
            cart: Cart::new(),
            wishlist: Wishlist::new(),
            query: CatalogQuery::default(),
            pricing: PricingContext::default(),
            location_pending: false,
            checkout: Checkout::new(),
            settlement: None,
            settlement_delay,
            builder: CandleBuilder::default(),
            desk: RecommendationDesk::new(recommender),
            recommendation: None,
            recommendation_request: None,
            view: ViewState::default(),
            events_tx,
            events_rx,
        }
    }

    /// Wires file persistence, the configured recommender and location, and starts the lookup.
    pub async fn from_config(config: &StorefrontConfig) -> Result<Self> {
        let repository = LedgerRepository::new(Arc::new(FileStore::new(config.data_dir.clone())));
        let recommender: Arc<dyn Recommender> = match &config.gemini {
            Some(gemini) => Arc::new(GeminiRecommender::new(gemini)?),
            None => Arc::new(OfflineRecommender),
        };
        let resolver: Arc<dyn LocationResolver> = match config.coordinates {
            Some(coords) => Arc::new(FixedLocation(coords)),
            None => Arc::new(NoLocation),
        };
        let mut store = Self::load(repository, recommender, config.settlement_delay).await;
        store.resolve_location(resolver, config.location_timeout);
        Ok(store)
    }

    // =========================================================================
    // Event loop
    // =========================================================================

    /// Whether any spawned operation has yet to be applied.
    pub fn has_pending(&self) -> bool {
        self.location_pending || self.recommendation_request.is_some() || self.settlement.is_some()
    }

    /// Waits for the next completion, or `None` when nothing is outstanding.
    pub async fn next_event(&mut self) -> Option<StoreEvent> {
        if !self.has_pending() { return None; }
        self.events_rx.recv().await
    }

    /// Waits for and applies one completion. Returns `false` when idle.
    pub async fn process_next(&mut self) -> bool {
        match self.next_event().await {
            Some(event) => { self.apply(event); true }
            None => false,
        }
    }

    pub fn apply(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::LocationResolved(ctx) => {
                if self.location_pending {
                    tracing::info!(location = %ctx.location_name, multiplier = %ctx.multiplier, "Pricing context set");
                    self.pricing = ctx;
                    self.location_pending = false;
                } else {
                    tracing::debug!("Ignoring duplicate location result");
                }
            }
            StoreEvent::Settled(ticket) => match self.checkout.settle(ticket) {
                Ok(()) => {
                    self.settlement = None;
                    tracing::info!(session = ticket.session(), total = %self.cart_total(), "Order settled");
                }
                Err(e) => tracing::debug!(error = %e, session = ticket.session(), "Ignoring settlement"),
            },
            StoreEvent::Recommendation(text) => {
                self.recommendation_request = None;
                self.recommendation = Some(text);
            }
        }
        self.drain_events();
    }

    fn drain_events(&mut self) {
        let mut events = self.cart.take_events();
        events.extend(self.ledger.take_events());
        events.extend(self.checkout.take_events());
        for event in events {
            tracing::debug!(?event, "Domain event");
            if let DomainEvent::Cart(CartEvent::ItemAdded { .. }) = event {
                self.view.cart_open = true;
                self.view.quick_view = None;
            }
        }
    }

    // =========================================================================
    // Location & pricing
    // =========================================================================

    /// Starts a lookup. The first result after this call sets the context; later ones are ignored.
    pub fn resolve_location(&mut self, resolver: Arc<dyn LocationResolver>, deadline: Duration) {
        self.location_pending = true;
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let ctx = location::resolve_pricing(resolver.as_ref(), deadline).await;
            let _ = tx.send(StoreEvent::LocationResolved(ctx));
        });
    }

    pub fn pricing(&self) -> &PricingContext { &self.pricing }
    pub fn is_location_loading(&self) -> bool { self.location_pending }
    pub fn adjusted_price(&self, product: &Product) -> Price { self.pricing.adjusted_price(product.price) }
    pub fn display_price(&self, product: &Product) -> String { format_currency(self.adjusted_price(product)) }

    // =========================================================================
    // Catalog & query
    // =========================================================================

    pub fn catalog(&self) -> &[Product] { &self.catalog }
    pub fn all_notes(&self) -> Vec<String> { catalog::all_unique_notes(&self.catalog) }
    pub fn query(&self) -> &CatalogQuery { &self.query }

    /// The list to render, recomputed from current inputs on every call.
    pub fn visible_products(&self) -> Vec<&Product> {
        query::run(&self.catalog, &self.ledger, &self.query, self.pricing.multiplier)
    }

    pub fn set_category(&mut self, category: CategoryFilter) { self.query.category = category; }
    pub fn toggle_note(&mut self, note: &str) { self.query.toggle_note(note); }
    pub fn add_note(&mut self, note: &str) { self.query.add_note(note); }
    pub fn set_max_price(&mut self, ceiling: u64) { self.query.set_max_price(ceiling); }
    pub fn set_sort(&mut self, sort: SortMode) { self.query.sort = sort; }
    pub fn clear_filters(&mut self) { self.query.clear_filters(); }

    pub fn product(&self, id: &ProductId) -> Result<&Product> {
        catalog::find(&self.catalog, id).ok_or_else(|| StorefrontError::ProductNotFound(id.clone()))
    }

    pub fn view(&self) -> &ViewState { &self.view }

    pub fn open_quick_view(&mut self, id: &ProductId) -> Result<()> {
        self.product(id)?;
        self.view.quick_view = Some(id.clone());
        Ok(())
    }

    pub fn close_quick_view(&mut self) { self.view.quick_view = None; }
    pub fn close_cart(&mut self) { self.view.cart_open = false; }

    // =========================================================================
    // Cart & wishlist
    // =========================================================================

    pub fn cart(&self) -> &Cart { &self.cart }
    pub fn cart_total(&self) -> Price { self.cart.total(self.pricing.multiplier) }

    pub fn add_to_cart(&mut self, id: &ProductId) -> Result<()> {
        let product = self.product(id)?.clone();
        self.cart.add(product);
        self.drain_events();
        Ok(())
    }

    pub fn remove_from_cart(&mut self, id: &ProductId) -> Result<()> {
        self.cart.remove(id)?;
        self.drain_events();
        Ok(())
    }

    pub fn update_quantity(&mut self, id: &ProductId, delta: i32) -> Result<Quantity> {
        let quantity = self.cart.set_quantity_delta(id, delta)?;
        self.drain_events();
        Ok(quantity)
    }

    pub fn wishlist(&self) -> &Wishlist { &self.wishlist }

    /// Returns whether the product is starred afterwards.
    pub fn toggle_wishlist(&mut self, id: &ProductId) -> Result<bool> {
        let product = self.product(id)?.clone();
        Ok(self.wishlist.toggle(&product))
    }

    // =========================================================================
    // Custom builder
    // =========================================================================

    pub fn builder(&self) -> &CandleBuilder { &self.builder }

    pub fn select_scent(&mut self, scent: &str) -> Result<()> {
        let found = CUSTOM_SCENTS.iter().find(|s| s.eq_ignore_ascii_case(scent.trim()))
            .ok_or_else(|| StorefrontError::UnknownOption(scent.to_string()))?;
        self.builder.scent = found.to_string();
        Ok(())
    }

    pub fn select_wax_color(&mut self, color: &str) -> Result<()> {
        self.builder.wax_color = catalog::wax_color(color).ok_or_else(|| StorefrontError::UnknownOption(color.to_string()))?;
        Ok(())
    }

    pub fn set_label(&mut self, label: impl Into<String>) { self.builder.label = label.into(); }

    /// Builds the current design into the cart and clears the label.
    pub fn add_custom_candle(&mut self) -> ProductId {
        let product = self.builder.build();
        let id = product.id.clone();
        self.cart.add(product);
        self.builder.clear_label();
        self.drain_events();
        id
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    pub fn reviews_for(&self, id: &ProductId) -> &[Review] { self.ledger.reviews_for(id) }
    pub fn average_rating(&self, id: &ProductId) -> Option<f64> { self.ledger.average_rating(id) }

    /// Prepends a review and persists the whole ledger. On success the draft is reset;
    /// on rejection it is left as typed. A failed write is logged, the review kept.
    pub async fn submit_review(&mut self, id: &ProductId, draft: &mut ReviewDraft) -> Result<Review> {
        self.product(id)?;
        let review = self.ledger.submit(id, draft)?.clone();
        *draft = ReviewDraft::default();
        if let Err(e) = self.repository.persist(&self.ledger).await {
            tracing::warn!(error = %e, "Could not persist review ledger");
        }
        self.drain_events();
        Ok(review)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    pub fn checkout(&self) -> &Checkout { &self.checkout }

    pub fn open_checkout(&mut self) -> Result<()> {
        if self.cart.is_empty() { return Err(CartError::EmptyCart.into()); }
        self.checkout.open();
        self.view.cart_open = false;
        Ok(())
    }

    pub fn order_details_mut(&mut self) -> Result<&mut OrderDetails> {
        Ok(self.checkout.details_mut()?)
    }

    pub fn advance_to_review(&mut self) -> Result<()> {
        self.checkout.advance_to_review()?;
        self.drain_events();
        Ok(())
    }

    pub fn edit_details(&mut self) -> Result<()> {
        self.checkout.edit_details()?;
        self.drain_events();
        Ok(())
    }

    /// Marks the order processing and schedules its settlement.
    pub fn place_order(&mut self) -> Result<()> {
        let ticket = self.checkout.place_order()?;
        let tx = self.events_tx.clone();
        let delay = self.settlement_delay;
        self.settlement = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(StoreEvent::Settled(ticket));
        }));
        tracing::info!(session = ticket.session(), total = %self.cart_total(), "Order placed");
        self.drain_events();
        Ok(())
    }

    /// Closes the checkout view, cancelling any pending settlement.
    pub fn close_checkout(&mut self) {
        self.cancel_settlement();
        self.checkout.close();
        self.drain_events();
    }

    /// Back to the catalog after an order: empties the cart and rewinds checkout.
    pub fn finish_order(&mut self) {
        self.cancel_settlement();
        self.cart.clear();
        self.checkout.reset();
        self.view = ViewState::default();
        self.drain_events();
    }

    pub fn is_order_complete(&self) -> bool { self.checkout.step() == CheckoutStep::Success }

    fn cancel_settlement(&mut self) {
        if let Some(handle) = self.settlement.take() {
            handle.abort();
        }
    }

    // =========================================================================
    // Recommendations
    // =========================================================================

    pub fn recommendation(&self) -> Option<&str> { self.recommendation.as_deref() }
    pub fn is_recommendation_loading(&self) -> bool { self.recommendation_request.is_some() }

    /// Starts a request; rejected while another one is pending or an input is empty.
    /// The desk stays claimed until the answer is applied.
    pub fn request_recommendation(&mut self, mood: &str, preferences: &str) -> Result<()> {
        self.recommendation_request = Some(self.desk.begin(mood, preferences)?);
        let desk = self.desk.clone();
        let tx = self.events_tx.clone();
        let (mood, preferences) = (mood.to_string(), preferences.to_string());
        tokio::spawn(async move {
            let text = desk.fetch(&mood, &preferences).await;
            let _ = tx.send(StoreEvent::Recommendation(text));
        });
        Ok(())
    }
}
