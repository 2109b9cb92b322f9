use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use khana_core::meal::{Cuisine, Location};
use khana_core::order::DeliveryMode;
use khana_core::user::Role;
use rust_decimal::Decimal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "khana")]
#[command(about = "Khana - order homemade meals from local chefs", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for durable records (overrides KHANA_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with an email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// customer, chef or admin
        #[arg(long, default_value = "customer")]
        role: Role,
    },
    /// Create an account and log in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "customer")]
        role: Role,
    },
    /// End the current session
    Logout,
    /// Show the current session
    Whoami,
    /// List available meals
    Browse {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        cuisine: Option<Cuisine>,
        #[arg(long)]
        location: Option<Location>,
    },
    /// Manage your listings (chefs only)
    Chef {
        #[command(subcommand)]
        action: ChefAction,
    },
    /// Manage your cart (customers only)
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Moderate listings and view platform figures (admins only)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Place an order for the current cart
    Checkout {
        /// delivery or pickup
        #[arg(long, default_value = "delivery")]
        mode: DeliveryMode,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: String,
    },
    /// Track placed orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ChefAction {
    /// List a new meal
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        cuisine: Cuisine,
        #[arg(long)]
        location: Location,
        #[arg(long)]
        prep_time: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Show your meals
    List,
    /// Change fields of one of your meals
    Update {
        meal_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long)]
        prep_time: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Remove one of your meals
    Delete { meal_id: String },
    /// Show or hide a meal from customers
    Toggle { meal_id: String },
    /// Show orders, units sold and revenue
    Stats {
        /// How many recent orders to list
        #[arg(long, default_value_t = 5)]
        recent: usize,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add one unit of a meal
    Add { meal_id: String },
    /// Set a line's quantity (0 removes it)
    Set { meal_id: String, quantity: u32 },
    /// Remove a line
    Remove { meal_id: String },
    /// Show cart contents and the price breakdown
    Show {
        /// delivery or pickup
        #[arg(long, default_value = "delivery")]
        mode: DeliveryMode,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Show platform-wide counts and revenue
    Stats,
    /// List every meal, rejected ones included
    Meals,
    /// List every order, newest first
    Orders,
    /// Make a rejected meal visible again
    Approve { meal_id: String },
    /// Hide a meal from customers
    Reject { meal_id: String },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Show an order and its progress
    Show { order_id: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config.toml if none exists
    Init,
    /// Print the effective configuration
    Show,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "khana=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Config { action } => {
            let service = commands::config_service(cli.config)?;
            return match action {
                ConfigAction::Init => commands::config::init(&service),
                ConfigAction::Show => commands::config::show(&service),
            };
        }
        command => command,
    };

    let storefront = commands::open_storefront(cli.config, cli.data_dir).await?;

    match command {
        Commands::Login {
            email,
            password,
            role,
        } => commands::session::login(&storefront, &email, &password, role).await?,
        Commands::Register {
            name,
            email,
            password,
            role,
        } => commands::session::register(&storefront, &name, &email, &password, role).await?,
        Commands::Logout => commands::session::logout(&storefront).await?,
        Commands::Whoami => commands::session::whoami(&storefront).await?,
        Commands::Browse {
            search,
            cuisine,
            location,
        } => commands::browse::run(&storefront, search, cuisine, location).await?,
        Commands::Chef { action } => match action {
            ChefAction::Add {
                name,
                description,
                price,
                cuisine,
                location,
                prep_time,
                image,
            } => {
                let form = khana_application::MealForm {
                    name,
                    description,
                    price,
                    cuisine,
                    location,
                    prep_time,
                    image,
                };
                commands::chef::add(&storefront, form).await?
            }
            ChefAction::List => commands::chef::list(&storefront).await?,
            ChefAction::Update {
                meal_id,
                name,
                description,
                price,
                prep_time,
                image,
            } => {
                let update = khana_core::meal::MealUpdate {
                    name,
                    description,
                    price,
                    prep_time,
                    image,
                    ..Default::default()
                };
                commands::chef::update(&storefront, &meal_id, update).await?
            }
            ChefAction::Delete { meal_id } => commands::chef::delete(&storefront, &meal_id).await?,
            ChefAction::Toggle { meal_id } => commands::chef::toggle(&storefront, &meal_id).await?,
            ChefAction::Stats { recent } => commands::chef::stats(&storefront, recent).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Stats => commands::admin::stats(&storefront).await?,
            AdminAction::Meals => commands::admin::meals(&storefront).await?,
            AdminAction::Orders => commands::admin::orders(&storefront).await?,
            AdminAction::Approve { meal_id } => {
                commands::admin::approve(&storefront, &meal_id).await?
            }
            AdminAction::Reject { meal_id } => {
                commands::admin::reject(&storefront, &meal_id).await?
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Add { meal_id } => commands::cart::add(&storefront, &meal_id).await?,
            CartAction::Set { meal_id, quantity } => {
                commands::cart::set(&storefront, &meal_id, quantity).await?
            }
            CartAction::Remove { meal_id } => commands::cart::remove(&storefront, &meal_id).await?,
            CartAction::Show { mode } => commands::cart::show(&storefront, mode).await?,
            CartAction::Clear => commands::cart::clear(&storefront).await?,
        },
        Commands::Checkout {
            mode,
            address,
            phone,
        } => {
            let request = khana_core::order::CheckoutRequest {
                mode,
                address,
                phone,
            };
            commands::order::checkout(&storefront, &request).await?
        }
        Commands::Order { action } => match action {
            OrderAction::Show { order_id } => commands::order::show(&storefront, &order_id).await?,
        },
        Commands::Config { .. } => {}
    }

    Ok(())
}
