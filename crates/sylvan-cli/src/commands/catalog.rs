//! Category and tag listings.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use sylvan_core::ApiUrl;
use sylvan_http::HttpStorefront;

use crate::output;

#[derive(Args, Debug)]
pub struct CatalogCommand {
    #[command(subcommand)]
    pub command: CatalogSubcommand,

    /// Print as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum CatalogSubcommand {
    /// List product categories
    Categories,

    /// List product tags
    Tags,
}

pub async fn handle(cmd: CatalogCommand, api: ApiUrl) -> Result<()> {
    let storefront = HttpStorefront::new(api).context("Failed to create HTTP client")?;

    let entries: Vec<(i64, String)> = match cmd.command {
        CatalogSubcommand::Categories => {
            let categories = storefront
                .categories()
                .await
                .context("Failed to list categories")?;
            if cmd.json {
                return output::json_pretty(&categories);
            }
            categories.into_iter().map(|c| (c.id.get(), c.name)).collect()
        }
        CatalogSubcommand::Tags => {
            let tags = storefront.tags().await.context("Failed to list tags")?;
            if cmd.json {
                return output::json_pretty(&tags);
            }
            tags.into_iter().map(|t| (t.id.get(), t.name)).collect()
        }
    };

    if entries.is_empty() {
        output::note("Nothing here yet.");
    }
    for (id, name) in entries {
        output::field(&format!("#{id}"), &name);
    }
    Ok(())
}
