//! Catalog model: products, categories, tags and the paginated envelope.

mod page;
mod product;

pub use page::{Page, ProductFilter};
pub use product::{
    Category, NewCategory, NewProduct, NewTag, Product, ProductImage, ProductUpdate, Tag,
};
