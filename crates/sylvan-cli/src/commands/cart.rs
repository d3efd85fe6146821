//! Local shopping cart commands.
//!
//! The cart lives in the data directory next to the session and is cleared
//! on logout.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use sylvan_core::{ApiUrl, ProductId};
use sylvan_http::HttpStorefront;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct CartCommand {
    #[command(subcommand)]
    pub command: CartSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CartSubcommand {
    /// Add a product to the cart
    Add {
        /// Product ID
        id: i64,

        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },

    /// Set the quantity of a cart line; 0 removes it
    Set {
        /// Product ID
        id: i64,

        quantity: u32,
    },

    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: i64,
    },

    /// Show the cart and its subtotal
    Show {
        /// Print the cart as JSON
        #[arg(long)]
        json: bool,
    },

    /// Empty the cart
    Clear,
}

pub async fn handle(cmd: CartCommand, api: ApiUrl) -> Result<()> {
    let mut cart = storage::load_cart()?;

    match cmd.command {
        CartSubcommand::Add { id, quantity } => {
            let storefront = HttpStorefront::new(api).context("Failed to create HTTP client")?;
            let product = storefront
                .product(ProductId::new(id))
                .await
                .with_context(|| format!("Failed to fetch product {id}"))?;
            let name = product.name.clone();

            let total = cart.add(product, quantity);
            if total == 0 {
                bail!("{name} is sold out");
            }
            output::success(&format!("{name} x{total} in cart"));
        }
        CartSubcommand::Set { id, quantity } => {
            match cart.set_quantity(ProductId::new(id), quantity) {
                Some(0) => output::success(&format!("Product #{id} removed from cart")),
                Some(total) => output::success(&format!("Product #{id} x{total} in cart")),
                None => bail!("Product #{id} is not in the cart"),
            }
        }
        CartSubcommand::Remove { id } => match cart.remove(ProductId::new(id)) {
            Some(line) => output::success(&format!("{} removed from cart", line.product.name)),
            None => bail!("Product #{id} is not in the cart"),
        },
        CartSubcommand::Show { json } => {
            if json {
                return output::json_pretty(&cart);
            }
            if cart.is_empty() {
                output::note("Your cart is empty.");
                return Ok(());
            }
            cart.lines().iter().for_each(output::cart_line);
            println!();
            output::field("Items", &cart.item_count().to_string());
            output::field("Subtotal", &output::money(cart.subtotal()));
            return Ok(());
        }
        CartSubcommand::Clear => {
            cart.clear();
            output::success("Cart cleared");
        }
    }

    storage::save_cart(&cart)
}
