//! Order record model.
//!
//! This module provides the [`OrderRecord`] resting-order entry kept by the store
//! and the [`RecordFragment`] wire shape the feed delivers for every action.

use crate::error::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Side of a resting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Bid.
    Buy,
    /// Ask.
    Sell,
}

impl Side {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => f.write_str("Buy"),
            Self::Sell => f.write_str("Sell"),
        }
    }
}

/// A resting order as held by the store.
///
/// `id` is the feed-assigned identifier and the sole lookup key. `size` and
/// `price` stay optional because the feed may omit them until a later update
/// fills them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Instrument identifier (e.g., "XBTUSD").
    pub symbol: String,
    /// Feed-assigned order identifier.
    pub id: u64,
    /// Buy or sell.
    pub side: Side,
    /// Resting quantity.
    pub size: Option<u64>,
    /// Limit price.
    pub price: Option<Decimal>,
}

impl OrderRecord {
    /// Creates a fully populated record.
    pub fn new(
        symbol: impl Into<String>,
        id: u64,
        side: Side,
        size: u64,
        price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            id,
            side,
            size: Some(size),
            price: Some(price),
        }
    }

    /// Builds a record from an `insert` or `partial` fragment.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingField` if the fragment has no `id`, `symbol` or `side`.
    pub fn from_fragment(fragment: &RecordFragment, action: &'static str) -> Result<Self> {
        let id = fragment.id.ok_or(Error::missing_field(action, "id"))?;
        let symbol = fragment
            .symbol
            .clone()
            .ok_or(Error::missing_field(action, "symbol"))?;
        let side = fragment.side.ok_or(Error::missing_field(action, "side"))?;

        Ok(Self {
            symbol,
            id,
            side,
            size: fragment.size.flatten(),
            price: fragment.price.flatten(),
        })
    }

    /// Merges the fields present in `fragment` onto this record.
    ///
    /// Present fields overwrite, absent fields are kept. An explicit `null`
    /// size or price clears the value. The id never changes.
    pub fn merge(&mut self, fragment: &RecordFragment) {
        if let Some(symbol) = &fragment.symbol {
            self.symbol.clone_from(symbol);
        }
        if let Some(side) = fragment.side {
            self.side = side;
        }
        if let Some(size) = fragment.size {
            self.size = size;
        }
        if let Some(price) = fragment.price {
            self.price = price;
        }
    }

    /// Price used for ladder ordering; a missing price orders as zero.
    #[must_use]
    pub fn sort_price(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO)
    }
}

/// A raw record as delivered in an operation's `data` array.
///
/// Every field is optional on the wire: `update` and `delete` fragments
/// routinely carry only the id and the fields that changed.
///
/// `size` and `price` distinguish an absent key (`None`) from an explicit
/// `null` (`Some(None)`), which an update applies as a cleared value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFragment {
    /// Instrument identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Feed-assigned order identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Buy or sell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    /// Resting quantity.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<Option<u64>>,
    /// Limit price.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Option<Decimal>>,
}

/// Deserializes a key that is present, keeping `null` as `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl RecordFragment {
    /// Creates a fragment carrying only an id.
    #[must_use]
    pub fn with_id(id: u64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Creates a fully populated fragment.
    pub fn full(symbol: impl Into<String>, id: u64, side: Side, size: u64, price: Decimal) -> Self {
        Self {
            symbol: Some(symbol.into()),
            id: Some(id),
            side: Some(side),
            size: Some(Some(size)),
            price: Some(Some(price)),
        }
    }

    /// Sets the size.
    #[must_use]
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(Some(size));
        self
    }

    /// Sets the price.
    #[must_use]
    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(Some(price));
        self
    }

    /// Sends an explicit `null` price.
    #[must_use]
    pub fn clear_price(mut self) -> Self {
        self.price = Some(None);
        self
    }
}

impl From<&OrderRecord> for RecordFragment {
    fn from(record: &OrderRecord) -> Self {
        Self {
            symbol: Some(record.symbol.clone()),
            id: Some(record.id),
            side: Some(record.side),
            size: Some(record.size),
            price: Some(record.price),
        }
    }
}
