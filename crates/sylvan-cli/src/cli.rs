//! CLI argument definitions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sylvan_core::ApiUrl;

use crate::commands::{
    addresses::AddressesCommand, admin::AdminCommand, auth::AuthCommand, cart::CartCommand,
    catalog::CatalogCommand, products::ProductsCommand,
};

/// Storefront client for the sylvan nature shop.
#[derive(Parser, Debug)]
#[command(name = "sylvan")]
#[command(author, version = env!("SYLVAN_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Storefront API base URL
    #[arg(
        long,
        global = true,
        env = "SYLVAN_API_URL",
        default_value = "http://localhost:5000"
    )]
    pub api: String,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn api_url(&self) -> Result<ApiUrl> {
        ApiUrl::new(&self.api).context("Invalid API URL")
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Account registration, login and session management
    Auth(AuthCommand),

    /// Browse the product feed
    Products(ProductsCommand),

    /// Manage the address book
    Addresses(AddressesCommand),

    /// List categories and tags
    Catalog(CatalogCommand),

    /// Manage the local shopping cart
    Cart(CartCommand),

    /// Catalog administration (admin accounts only)
    Admin(AdminCommand),
}
