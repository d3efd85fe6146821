//! sylvan - command-line client for the sylvan storefront.
//!
//! Browses the catalog through the same paginated feed a storefront page
//! uses, and manages the account, address book, cart and catalog.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{addresses, admin, auth, cart, catalog, products};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let api = cli.api_url()?;
    match cli.command {
        Commands::Auth(cmd) => auth::handle(cmd, api).await,
        Commands::Products(cmd) => products::handle(cmd, api).await,
        Commands::Addresses(cmd) => addresses::handle(cmd).await,
        Commands::Catalog(cmd) => catalog::handle(cmd, api).await,
        Commands::Cart(cmd) => cart::handle(cmd, api).await,
        Commands::Admin(cmd) => admin::handle(cmd).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so stdout stays parseable.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
