//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;

use sylvan_core::customer::Address;
use sylvan_core::store::CartLine;
use sylvan_core::Product;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dimmed note to stderr.
pub fn note(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

/// One line per product, as a card in the product grid.
pub fn product_card(product: &Product) {
    let price = if product.discount > 0 {
        format!(
            "{} {} {}",
            money(product.price).strikethrough().dimmed(),
            money(product.final_price()).bold(),
            format!("-{}%", product.discount).green()
        )
    } else {
        money(product.price).bold().to_string()
    };

    let stock = if product.in_stock() {
        format!("{} in stock", product.quantity).dimmed()
    } else {
        "sold out".red()
    };

    println!(
        "{:>6}  {}  {}  {}",
        format!("#{}", product.id).dimmed(),
        product.name,
        price,
        stock
    );
}

/// Full product detail.
pub fn product_detail(product: &Product) {
    println!("{}", product.name.bold());
    field("ID", &product.id.to_string());
    field("Price", &money(product.price));
    if product.discount > 0 {
        field("Discount", &format!("{}%", product.discount));
        field("Final price", &money(product.final_price()));
    }
    field("Stock", &product.quantity.to_string());
    if let Some(category) = &product.category {
        field("Category", &category.name);
    }
    if !product.tags.is_empty() {
        let tags: Vec<&str> = product.tags.iter().map(|t| t.name.as_str()).collect();
        field("Tags", &tags.join(", "));
    }
    if let Some(image) = product.thumbnail() {
        field("Image", &image.url);
    }
    if let Some(description) = &product.description {
        println!();
        println!("{}", description);
    }
}

pub fn address_line(address: &Address) {
    let marker = if address.is_default {
        "★".yellow().to_string()
    } else {
        " ".to_string()
    };
    let label = address
        .label
        .as_deref()
        .map(|l| format!("{} ", l.bold()))
        .unwrap_or_default();

    println!(
        "{} {:>5}  {}{}, {} {}, {}",
        marker,
        format!("#{}", address.id).dimmed(),
        label,
        address.street,
        address.postal_code,
        address.city,
        address.country
    );
}

pub fn cart_line(line: &CartLine) {
    println!(
        "{:>6}  {} x{}  {}",
        format!("#{}", line.product.id).dimmed(),
        line.product.name,
        line.quantity,
        money(line.total())
    );
}
