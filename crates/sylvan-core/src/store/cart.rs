//! Shopping cart shown in the storefront sidebar.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Product;
use crate::types::ProductId;

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Snapshot of the product when it was last added.
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Discounted unit price times quantity.
    pub fn total(&self) -> Decimal {
        self.product.final_price() * Decimal::from(self.quantity)
    }
}

/// Cart contents in the order products were first added.
///
/// Quantities never exceed the stock of the product snapshot; a quantity of
/// zero removes the line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units, merging with an existing line. The stored
    /// snapshot is replaced by `product`.
    ///
    /// Returns the line's resulting quantity; zero if nothing is in stock.
    pub fn add(&mut self, product: Product, quantity: u32) -> u32 {
        let id = product.id;
        let current = self.line(id).map_or(0, |line| line.quantity);
        let wanted = current.saturating_add(quantity).min(product.quantity);

        if wanted == 0 {
            self.remove(id);
            return 0;
        }

        match self.lines.iter_mut().find(|line| line.product.id == id) {
            Some(line) => {
                line.product = product;
                line.quantity = wanted;
            }
            None => self.lines.push(CartLine {
                product,
                quantity: wanted,
            }),
        }
        debug!(product = %id, quantity = wanted, "cart line updated");
        wanted
    }

    /// Set the quantity of a line. Zero removes it.
    ///
    /// Returns the resulting quantity, or `None` if the product is not in
    /// the cart.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> Option<u32> {
        let index = self.lines.iter().position(|line| line.product.id == id)?;
        if quantity == 0 {
            self.lines.remove(index);
            return Some(0);
        }
        let line = &mut self.lines[index];
        line.quantity = quantity.min(line.product.quantity);
        if line.quantity == 0 {
            self.lines.remove(index);
            return Some(0);
        }
        Some(line.quantity)
    }

    /// Remove a product from the cart.
    pub fn remove(&mut self, id: ProductId) -> Option<CartLine> {
        let index = self.lines.iter().position(|line| line.product.id == id)?;
        Some(self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == id)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::total).sum()
    }
}
