//! Ecocycle CLI - Catalog, cart, and checkout for the rewards storefront.
//!
//! Each invocation is one context over the shared data directory, so two
//! terminals behave like two browser tabs: run `eco-cli watch` in one and
//! edit the cart from the other.
//!
//! # Usage
//!
//! ```bash
//! # Browse products under 300 points, cheapest first
//! eco-cli catalog --band under300 --sort low
//!
//! # Add two notebooks, then review the cart with home delivery
//! eco-cli add 1 -q 2
//! eco-cli cart --delivery delivery
//!
//! # Redeem the cart
//! eco-cli checkout --delivery pickup
//! ```
//!
//! # Commands
//!
//! - `catalog`, `product` - Browse the catalog
//! - `add`, `set`, `inc`, `dec`, `remove`, `clear` - Edit the cart
//! - `cart`, `checkout` - Totals, balance gate, and redemption
//! - `watch` - Follow cart changes from every context
//! - `ask` - Ask the chat assistant

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ecocycle_core::{DeliveryMethod, PriceBand, ProductId, SortOrder};
use ecocycle_storefront::config::StorefrontConfig;
use ecocycle_storefront::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "eco-cli")]
#[command(author, version, about = "Ecocycle rewards storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Catalog {
        /// Match product names and descriptions
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only these categories (repeatable)
        #[arg(short, long)]
        category: Vec<String>,

        /// Price bands: `under300`, `300to500`, `500to1000`, `over1000` (repeatable)
        #[arg(short, long = "band")]
        bands: Vec<PriceBand>,

        /// Order: `featured`, `low`, `high`
        #[arg(long, default_value_t = SortOrder::Featured)]
        sort: SortOrder,
    },
    /// Show a product's details and stock
    Product { id: ProductId },
    /// Add a product to the cart
    Add {
        id: ProductId,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a cart line (clamped to stock)
    #[command(allow_negative_numbers = true)]
    Set { id: ProductId, quantity: i64 },
    /// Add one unit to a cart line
    Inc { id: ProductId },
    /// Remove one unit from a cart line
    Dec { id: ProductId },
    /// Remove a line from the cart
    Remove { id: ProductId },
    /// Remove every line from the cart
    Clear,
    /// Show the cart, totals, and checkout gate
    Cart {
        /// `pickup` or `delivery`
        #[arg(short, long, default_value_t = DeliveryMethod::Pickup)]
        delivery: DeliveryMethod,
    },
    /// Redeem the cart with the points balance
    Checkout {
        /// `pickup` or `delivery`
        #[arg(short, long, default_value_t = DeliveryMethod::Pickup)]
        delivery: DeliveryMethod,

        /// Print the receipt as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reprint the cart whenever any context changes it (Ctrl-C to stop)
    Watch {
        /// `pickup` or `delivery`
        #[arg(short, long, default_value_t = DeliveryMethod::Pickup)]
        delivery: DeliveryMethod,
    },
    /// Ask the chat assistant
    Ask {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
}

/// Initialize tracing on stderr; JSON when `ECOCYCLE_LOG_FORMAT=json`.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ecocycle_storefront=info,ecocycle_cli=info".into());
    let json = std::env::var("ECOCYCLE_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Loads .env before the subscriber reads RUST_LOG
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing();

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !matches!(e, CommandError::Notice(_)) {
                tracing::error!("Command failed: {e}");
            }
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), CommandError> {
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Catalog {
            search,
            category,
            bands,
            sort,
        } => commands::catalog::list(&state, search, category, bands, sort),
        Commands::Product { id } => commands::catalog::show(&state, id)?,
        Commands::Add { id, quantity } => commands::cart::add(&state, id, quantity)?,
        Commands::Set { id, quantity } => commands::cart::set(&state, id, quantity)?,
        Commands::Inc { id } => commands::cart::increment(&state, id)?,
        Commands::Dec { id } => commands::cart::decrement(&state, id)?,
        Commands::Remove { id } => commands::cart::remove(&state, id)?,
        Commands::Clear => commands::cart::clear(&state)?,
        Commands::Cart { delivery } => commands::cart::show(&state, delivery),
        Commands::Checkout { delivery, json } => {
            commands::cart::checkout(&state, delivery, json)?;
        }
        Commands::Watch { delivery } => commands::cart::watch(&state, delivery).await,
        Commands::Ask { message } => commands::assistant::ask(&state, &message.join(" ")).await,
    }
    Ok(())
}
