//! Catalog administration commands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use sylvan_core::catalog::{NewCategory, NewProduct, NewTag, ProductUpdate};
use sylvan_core::{CategoryId, ProductId, TagId};
use sylvan_http::HttpSession;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct AdminCommand {
    #[command(subcommand)]
    pub command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AdminSubcommand {
    /// Create a product
    ProductCreate(ProductCreateArgs),

    /// Change fields of a product
    ProductUpdate(ProductUpdateArgs),

    /// Delete a product
    ProductDelete { id: i64 },

    /// Create a category
    CategoryCreate { name: String },

    /// Delete a category
    CategoryDelete { id: i64 },

    /// Create a tag
    TagCreate { name: String },

    /// Delete a tag
    TagDelete { id: i64 },
}

#[derive(Args, Debug)]
pub struct ProductCreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Unit price, e.g. 12.50
    #[arg(long)]
    pub price: Decimal,

    /// Discount percentage
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub discount: u8,

    /// Units in stock
    #[arg(long, default_value_t = 0)]
    pub quantity: u32,

    #[arg(long)]
    pub category: Option<i64>,

    /// Tag ID (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<i64>,

    /// Image URL (repeatable)
    #[arg(long = "image")]
    pub images: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ProductUpdateArgs {
    /// Product ID
    pub id: i64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub price: Option<Decimal>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub discount: Option<u8>,

    #[arg(long)]
    pub quantity: Option<u32>,

    #[arg(long)]
    pub category: Option<i64>,
}

pub async fn handle(cmd: AdminCommand) -> Result<()> {
    let session = session::require()?;
    if !session.is_admin().await {
        bail!("Admin access required");
    }
    session::persisting(&session, run(cmd.command, &session)).await
}

async fn run(command: AdminSubcommand, session: &HttpSession) -> Result<()> {
    match command {
        AdminSubcommand::ProductCreate(args) => {
            if args.price.is_sign_negative() {
                bail!("Price must not be negative");
            }
            let product = NewProduct {
                name: args.name,
                description: args.description,
                price: args.price,
                discount: args.discount,
                quantity: args.quantity,
                category_id: args.category.map(CategoryId::new),
                tag_ids: args.tags.into_iter().map(TagId::new).collect(),
                image_urls: args.images,
            };
            let created = session
                .create_product(&product)
                .await
                .context("Failed to create product")?;
            output::success(&format!("Product #{} created", created.id));
            output::product_card(&created);
        }
        AdminSubcommand::ProductUpdate(args) => {
            let update = ProductUpdate {
                name: args.name,
                description: args.description,
                price: args.price,
                discount: args.discount,
                quantity: args.quantity,
                category_id: args.category.map(CategoryId::new),
            };
            let updated = session
                .update_product(ProductId::new(args.id), &update)
                .await
                .context("Failed to update product")?;
            output::success(&format!("Product #{} updated", updated.id));
            output::product_card(&updated);
        }
        AdminSubcommand::ProductDelete { id } => {
            session
                .delete_product(ProductId::new(id))
                .await
                .context("Failed to delete product")?;
            output::success(&format!("Product #{id} deleted"));
        }
        AdminSubcommand::CategoryCreate { name } => {
            let category = session
                .create_category(&NewCategory { name })
                .await
                .context("Failed to create category")?;
            output::success(&format!("Category #{} created", category.id));
        }
        AdminSubcommand::CategoryDelete { id } => {
            session
                .delete_category(CategoryId::new(id))
                .await
                .context("Failed to delete category")?;
            output::success(&format!("Category #{id} deleted"));
        }
        AdminSubcommand::TagCreate { name } => {
            let tag = session
                .create_tag(&NewTag { name })
                .await
                .context("Failed to create tag")?;
            output::success(&format!("Tag #{} created", tag.id));
        }
        AdminSubcommand::TagDelete { id } => {
            session
                .delete_tag(TagId::new(id))
                .await
                .context("Failed to delete tag")?;
            output::success(&format!("Tag #{id} deleted"));
        }
    }

    Ok(())
}
