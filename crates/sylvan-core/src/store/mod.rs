//! Client-side state containers.
//!
//! Both stores are plain values owned by whoever needs them. Nothing here is
//! global; tearing a store down is an explicit call.

mod auth;
mod cart;

pub use auth::{AuthSession, AuthStore};
pub use cart::{Cart, CartLine};
