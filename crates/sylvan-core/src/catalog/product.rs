//! Product, category and tag records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, ProductId, TagId};

/// A catalog product as returned by `GET Product` and `GET Product/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique id, stable across pages.
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price before discount.
    pub price: Decimal,
    /// Discount percentage, `0..=100`.
    #[serde(default)]
    pub discount: u8,
    /// Units in stock.
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub category: Option<Category>,
}

impl Product {
    /// Unit price after the discount, rounded to cents.
    pub fn final_price(&self) -> Decimal {
        let keep = Decimal::from(100 - self.discount.min(100));
        (self.price * keep / Decimal::ONE_HUNDRED).round_dp(2)
    }

    /// Returns true if at least one unit is in stock.
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    /// The first image, used as the card thumbnail.
    pub fn thumbnail(&self) -> Option<&ProductImage> {
        self.images.first()
    }
}

/// An image reference attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A product tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// Body of `POST Product`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub discount: u8,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    pub tag_ids: Vec<TagId>,
    pub image_urls: Vec<String>,
}

/// Body of `PUT Product/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

/// Body of `POST Category`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub name: String,
}

/// Body of `POST Tag`.
#[derive(Debug, Clone, Serialize)]
pub struct NewTag {
    pub name: String,
}
