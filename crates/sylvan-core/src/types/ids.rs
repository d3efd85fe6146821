//! Backend entity identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw backend id.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw id.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self).map_err(|e| {
                    InvalidInputError::Id {
                        value: s.to_string(),
                        reason: e.to_string(),
                    }
                    .into()
                })
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

entity_id!(
    /// Identifier of a catalog product. Stable across pages.
    ProductId
);
entity_id!(
    /// Identifier of a product category.
    CategoryId
);
entity_id!(
    /// Identifier of a product tag.
    TagId
);
entity_id!(
    /// Identifier of a customer address.
    AddressId
);
entity_id!(
    /// Identifier of a customer account.
    CustomerId
);
