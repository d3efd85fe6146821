//! Pagination primitives.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, InvalidInputError};

/// Opaque position in a paginated listing.
///
/// Numerically it is the index the next page starts at, but only the backend
/// assigns meaning to it. [`Cursor::FIRST`] requests the first page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(u64);

impl Cursor {
    /// Cursor of the first page.
    pub const FIRST: Cursor = Cursor(0);

    /// Wrap a cursor value received from the backend.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value sent as the `cursor` query parameter.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of items requested per page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    /// Largest page the backend serves.
    pub const MAX: u32 = 100;

    /// Validate a page size.
    ///
    /// # Errors
    ///
    /// Returns an error for zero or anything above [`PageSize::MAX`].
    pub fn new(value: u32) -> Result<Self, Error> {
        if value == 0 || value > Self::MAX {
            return Err(InvalidInputError::PageSize {
                value,
                reason: format!("must be between 1 and {}", Self::MAX),
            }
            .into());
        }
        Ok(Self(value))
    }

    /// Returns the raw value sent as the `pageSize` query parameter.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(12)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
