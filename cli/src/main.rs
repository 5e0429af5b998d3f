//! Storefront CLI - browse the catalog, manage the cart and place orders.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog sorted by retail price, most expensive first
//! storefront -e buyer@example.com -p password products --sort retail_price --desc
//!
//! # Put product 3 in the cart and order everything in it
//! # (credentials from STOREFRONT_EMAIL / STOREFRONT_PASSWORD)
//! storefront add 3
//! storefront order
//!
//! # Create an account (no login needed)
//! storefront register --name Acme --email a@b.c --phone "+7(999)000-11-22" \
//!     --address "Lenina 1" --contact-person Ivan --password secret
//! ```
//!
//! # Environment
//!
//! - `STOREFRONT_API_URL` - API base URL
//! - `STOREFRONT_EMAIL` / `STOREFRONT_PASSWORD` - login used when the flags are absent
//!
//! A `.env` file in the working directory is loaded first.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use storefront_core::{ApiError, ClientConfig, ConfigError, SortField, Storefront};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about = "Storefront client")]
struct Cli {
    /// Account email
    #[arg(short, long, env = "STOREFRONT_EMAIL")]
    email: Option<String>,

    /// Account password
    #[arg(short, long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the catalog
    Products {
        /// Column to sort by (`id`, `name`, `wholesale_price`, `retail_price`, `description`)
        #[arg(long)]
        sort: Option<SortField>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
        /// Only products with a retail price below this
        #[arg(long)]
        below: Option<f64>,
        /// Only products with a retail price above this
        #[arg(long)]
        above: Option<f64>,
        /// Only products whose name contains this
        #[arg(long)]
        name: Option<String>,
    },
    /// Search names and descriptions (numbers also match ids and prices)
    Search { query: String },
    /// Show a single product
    Show { product_id: i64 },
    /// Show the cart with totals and discount
    Cart,
    /// Add one unit of a product to the cart
    Add { product_id: i64 },
    /// Remove a product from the cart
    Remove { product_id: i64 },
    /// Empty the cart
    ClearCart,
    /// Check out the cart
    Checkout,
    /// Place a retail order for the cart
    Order,
    /// List past orders
    Orders,
    /// Show the profile
    Profile,
    /// Change profile fields; omitted fields keep their value
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long = "new-email")]
        new_email: Option<String>,
        #[arg(long)]
        contact_person: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long = "email")]
        account_email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        contact_person: String,
        #[arg(long = "password")]
        account_password: String,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("login failed: {}", .0.user_message())]
    Login(ApiError),
    #[error("no credentials: pass --email and --password or set STOREFRONT_EMAIL and STOREFRONT_PASSWORD")]
    MissingCredentials,
    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),
}

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        match exit_code(&e) {
            Some(code) => {
                eprintln!("error: {e}");
                std::process::exit(code);
            }
            None => eprintln!("{e}"),
        }
    }
}

/// Exit status for a failed run. `None` means exit normally: not being
/// signed in is a notice, not a failure.
fn exit_code(err: &CliError) -> Option<i32> {
    match err {
        CliError::Login(_) | CliError::MissingCredentials => None,
        CliError::Config(_) | CliError::Api(_) => Some(1),
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = ClientConfig::from_env()?;
    tracing::debug!(api_url = %config.api_url, "loaded configuration");
    let mut shop = Storefront::from_config(&config);

    if let Command::Register {
        name,
        account_email,
        phone,
        address,
        contact_person,
        account_password,
    } = cli.command
    {
        let form = storefront_core::RegistrationForm {
            name,
            email: account_email,
            phone,
            address,
            contact_person,
            password: account_password,
        };
        commands::register(&mut shop, &form)?;
        return Ok(());
    }

    let (Some(email), Some(password)) = (cli.email.as_deref(), cli.password.as_deref()) else {
        return Err(CliError::MissingCredentials);
    };
    shop.login(email, password).map_err(CliError::Login)?;

    match cli.command {
        Command::Products {
            sort,
            desc,
            below,
            above,
            name,
        } => commands::products(&shop, sort, desc, below, above, name),
        Command::Search { query } => commands::search(&shop, &query)?,
        Command::Show { product_id } => commands::show(&shop, product_id)?,
        Command::Cart => commands::cart(&shop)?,
        Command::Add { product_id } => commands::add(&shop, product_id)?,
        Command::Remove { product_id } => commands::remove(&shop, product_id)?,
        Command::ClearCart => commands::clear_cart(&shop)?,
        Command::Checkout => commands::checkout(&shop)?,
        Command::Order => commands::order(&shop)?,
        Command::Orders => commands::orders(&shop)?,
        Command::Profile => commands::profile(&shop)?,
        Command::UpdateProfile {
            name,
            phone,
            new_email,
            contact_person,
            address,
        } => commands::update_profile(
            &mut shop,
            commands::ProfileChanges {
                name,
                phone,
                email: new_email,
                contact_person,
                address,
            },
        )?,
        Command::Register { .. } => {}
    }

    shop.logout();
    Ok(())
}
