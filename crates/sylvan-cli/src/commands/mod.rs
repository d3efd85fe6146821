//! Subcommand implementations, one module per command group.

pub mod addresses;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod products;
