//! REST client and endpoint contract.

mod client;
mod endpoints;

pub use client::ApiClient;
pub use endpoints::*;
