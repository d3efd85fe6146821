//! Customer addresses and the two orderings the address book offers.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::types::AddressId;

/// A saved shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    #[serde(default)]
    pub label: Option<String>,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Body of `POST Customer/addresses` and `PUT Customer/addresses/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
}

/// Order addresses with the default first, then by city.
///
/// This is the order the address book is displayed in after every fetch.
/// City comparison ignores case; equal keys keep their relative order.
pub fn sort_default_first(addresses: &mut [Address]) {
    addresses.sort_by_cached_key(|a| (Reverse(a.is_default), a.city.to_lowercase()));
}

/// Order addresses by city alone, ignoring the default flag.
///
/// City comparison ignores case; equal keys keep their relative order.
pub fn sort_by_city(addresses: &mut [Address]) {
    addresses.sort_by_cached_key(|a| a.city.to_lowercase());
}
