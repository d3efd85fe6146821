//! Customer account model: profile and address book.

mod address;
mod profile;

pub use address::{Address, NewAddress, sort_by_city, sort_default_first};
pub use profile::{Customer, NewCustomer, ProfileUpdate};
