//! Product feed commands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use sylvan_core::error::Error;
use sylvan_core::feed::{FeedView, cancellation};
use sylvan_core::{ApiUrl, CategoryId, PageSize, ProductFilter, ProductId, TagId};
use sylvan_http::HttpStorefront;

use crate::output;

#[derive(Args, Debug)]
pub struct ProductsCommand {
    #[command(subcommand)]
    pub command: ProductsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProductsSubcommand {
    /// List products page by page
    List(ListArgs),

    /// Show a single product
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Products per page (1-100)
    #[arg(long, default_value_t = 12)]
    pub page_size: u32,

    /// Number of pages to load
    #[arg(long, conflicts_with = "all")]
    pub pages: Option<usize>,

    /// Keep loading until the feed is exhausted
    #[arg(long)]
    pub all: bool,

    /// Only products in this category
    #[arg(long)]
    pub category: Option<i64>,

    /// Only products with this tag
    #[arg(long)]
    pub tag: Option<i64>,

    /// Print one JSON object per product
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Product ID
    pub id: i64,

    /// Print the product as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle(cmd: ProductsCommand, api: ApiUrl) -> Result<()> {
    let storefront = HttpStorefront::new(api).context("Failed to create HTTP client")?;
    match cmd.command {
        ProductsSubcommand::List(args) => list(args, &storefront).await,
        ProductsSubcommand::Show(args) => show(args, &storefront).await,
    }
}

async fn list(args: ListArgs, storefront: &HttpStorefront) -> Result<()> {
    let page_size = PageSize::new(args.page_size).context("Invalid page size")?;
    let filter = ProductFilter {
        category: args.category.map(CategoryId::new),
        tag: args.tag.map(TagId::new),
    };
    let max_pages = if args.all {
        None
    } else {
        Some(args.pages.unwrap_or(1).max(1))
    };

    let (handle, signal) = cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    let mut feed = storefront.feed(page_size, filter, signal);

    // Print each page's new cards as soon as it merges, the way the grid
    // grows under the sentinel.
    let mut printed = 0;
    let mut pages = 1;
    let mut result = feed.load_initial().await.map(|_| ());
    loop {
        for product in &feed.items()[printed..] {
            if args.json {
                output::json(product)?;
            } else {
                output::product_card(product);
            }
        }
        printed = feed.items().len();

        if result.is_err() || max_pages.is_some_and(|max| pages >= max) {
            break;
        }
        match feed.on_sentinel_visible().await {
            Ok(Some(_)) => pages += 1,
            Ok(None) => break,
            Err(e) => result = Err(e),
        }
    }

    if let Err(Error::Cancelled) = result {
        output::note("Cancelled.");
        return Ok(());
    }

    match feed.view() {
        FeedView::Failed { message } => bail!("Failed to load products: {message}"),
        FeedView::Empty => output::note("No products found."),
        FeedView::Items {
            error: Some(message),
            ..
        } => {
            output::error(&format!("Failed to load more products: {message}"));
            bail!("Showing {printed} products loaded before the error");
        }
        FeedView::Items { sentinel: true, .. } => output::note(&format!(
            "{printed} products shown. More available: use --pages N or --all."
        )),
        FeedView::Items { .. } | FeedView::Loading { .. } => {}
    }

    Ok(())
}

async fn show(args: ShowArgs, storefront: &HttpStorefront) -> Result<()> {
    let product = storefront
        .product(ProductId::new(args.id))
        .await
        .with_context(|| format!("Failed to fetch product {}", args.id))?;

    if args.json {
        return output::json_pretty(&product);
    }
    output::product_detail(&product);
    Ok(())
}
