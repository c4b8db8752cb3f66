//! Lumière Atelier - command-line storefront

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use lumiere_atelier::config::StorefrontConfig;
use lumiere_atelier::query::{CategoryFilter, SortMode};
use lumiere_atelier::{PaymentMethod, ProductId, Rating, ReviewDraft, Storefront};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lumiere", about = "Browse, review and order from the Lumière & Co. atelier")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List candles through the category, note and price filters
    Browse {
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
        #[arg(long = "note")]
        notes: Vec<String>,
        #[arg(long)]
        max_price: Option<u64>,
        #[arg(long, default_value = "popularity")]
        sort: SortMode,
    },
    /// List every scent note in the catalog
    Notes,
    /// Add a review to a candle's journal
    Review {
        product: String,
        #[arg(long)]
        author: String,
        #[arg(long, default_value_t = 5, allow_hyphen_values = true)]
        rating: i64,
        #[arg(long)]
        comment: String,
    },
    /// Show a candle's review journal
    Reviews { product: String },
    /// Ask the perfumer for a recommendation
    Recommend {
        #[arg(long)]
        mood: String,
        #[arg(long)]
        preference: String,
    },
    /// Run a full checkout
    Order {
        #[arg(long = "product")]
        products: Vec<String>,
        /// Add a custom candle with this scent
        #[arg(long)]
        custom_scent: Option<String>,
        #[arg(long, default_value = "Natural Cream")]
        custom_color: String,
        #[arg(long, default_value = "")]
        custom_label: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        address: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        zip: String,
        #[arg(long, default_value = "card")]
        payment: PaymentMethod,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = StorefrontConfig::from_env()?;
    let mut store = Storefront::from_config(&config).await?;
    while store.is_location_loading() {
        store.process_next().await;
    }
    tracing::info!(location = %store.pricing().location_name, "🕯️ Lumière Atelier ready");

    match cli.command {
        Command::Browse { category, notes, max_price, sort } => {
            store.set_category(category);
            for note in &notes { store.add_note(note); }
            if let Some(ceiling) = max_price { store.set_max_price(ceiling); }
            store.set_sort(sort);
            let products = store.visible_products();
            if products.is_empty() {
                println!("No candles match these filters.");
            }
            for p in products {
                let rating = store.average_rating(&p.id).map_or_else(|| "no reviews".to_string(), |avg| format!("{avg:.1}★"));
                println!("[{}] {:<20} {:>8}  {:<9} {}  ({rating})", p.id, p.name, store.display_price(p), p.category, p.notes.join(", "));
            }
        }
        Command::Notes => {
            for note in store.all_notes() { println!("{note}"); }
        }
        Command::Review { product, author, rating, comment } => {
            let id = ProductId::new(product);
            let mut draft = ReviewDraft::new(author, Rating::clamped(rating), comment);
            let review = store.submit_review(&id, &mut draft).await?;
            println!("Saved review {} for {} ({}★, {})", review.id, store.product(&id)?.name, review.rating.value(), review.date);
        }
        Command::Reviews { product } => {
            let id = ProductId::new(product);
            let name = store.product(&id)?.name.clone();
            match store.average_rating(&id) {
                Some(avg) => println!("{name}: {avg:.1}★ from {} reviews", store.reviews_for(&id).len()),
                None => println!("{name}: no reviews yet"),
            }
            for r in store.reviews_for(&id) {
                println!("  {} ★{} {} - {}", r.date, r.rating.value(), r.customer_name, r.comment);
            }
        }
        Command::Recommend { mood, preference } => {
            store.request_recommendation(&mood, &preference)?;
            while store.recommendation().is_none() && store.process_next().await {}
            println!("{}", store.recommendation().unwrap_or_default());
        }
        Command::Order { products, custom_scent, custom_color, custom_label, name, email, address, city, zip, payment } => {
            for product in products { store.add_to_cart(&ProductId::new(product))?; }
            if let Some(scent) = custom_scent {
                store.select_scent(&scent)?;
                store.select_wax_color(&custom_color)?;
                store.set_label(custom_label);
                store.add_custom_candle();
            }
            store.open_checkout()?;
            let details = store.order_details_mut()?;
            details.full_name = name;
            details.email = email;
            details.address = address;
            details.city = city;
            details.zip_code = zip;
            details.payment_method = payment;
            store.advance_to_review()?;

            for item in store.cart().items() {
                println!("{:>3} x {:<24} {:>8}", item.quantity.value(), item.product.name, store.display_price(&item.product));
            }
            let total = store.cart_total();
            println!("Total ({}): {total}", store.pricing().location_name);

            store.place_order()?;
            println!("Processing transaction...");
            while !store.is_order_complete() {
                if !store.process_next().await { bail!("Order did not settle"); }
            }
            let details = store.checkout().details();
            println!("Order confirmed for {} via {}. Paid {total}.", details.full_name, details.payment_method);
            store.finish_order();
        }
    }
    Ok(())
}
