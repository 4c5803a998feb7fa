//! Spread calculation.
//!
//! Derives best bid, best ask, spread and spread percent from the two ladders.
//! [`SpreadSelector`] keeps returning the same `Arc<Spread>` while the best
//! prices stay put.

use super::record::OrderRecord;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Fractional digits of [`Spread::spread_percent`].
pub const SPREAD_PERCENT_SCALE: u32 = 4;

/// Top-of-book spread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spread {
    /// `best_ask - best_bid`.
    pub spread: Decimal,
    /// `spread / best_bid * 100`, with exactly four fractional digits.
    pub spread_percent: Decimal,
    /// Highest bid price.
    pub best_bid: Decimal,
    /// Lowest ask price.
    pub best_ask: Decimal,
}

impl Spread {
    /// Computes the spread from two top-of-book prices.
    ///
    /// Returns `None` when `best_bid` is zero, as the percentage is undefined.
    #[must_use]
    pub fn from_prices(best_bid: Decimal, best_ask: Decimal) -> Option<Self> {
        let spread = best_ask - best_bid;
        let mut spread_percent = spread
            .checked_div(best_bid)?
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(SPREAD_PERCENT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        spread_percent.rescale(SPREAD_PERCENT_SCALE);

        Some(Self {
            spread,
            spread_percent,
            best_bid,
            best_ask,
        })
    }
}

impl fmt::Display for Spread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}%) bid {} / ask {}",
            self.spread.round_dp(2),
            self.spread_percent,
            self.best_bid,
            self.best_ask
        )
    }
}

/// Computes the spread of two ladders.
///
/// Unavailable (`None`) when either ladder is empty, when either top entry has
/// no price, or when the best bid is zero.
#[must_use]
pub fn compute_spread(bids: &[OrderRecord], asks: &[OrderRecord]) -> Option<Spread> {
    let best_bid = bids.first()?.price?;
    let best_ask = asks.first()?.price?;
    Spread::from_prices(best_bid, best_ask)
}

/// Returns `previous` if `next` has the same best bid and best ask.
#[must_use]
pub fn stabilize_spread(previous: Option<&Arc<Spread>>, next: Option<Spread>) -> Option<Arc<Spread>> {
    let next = next?;
    match previous {
        Some(prev) if prev.best_bid == next.best_bid && prev.best_ask == next.best_ask => {
            Some(Arc::clone(prev))
        }
        _ => Some(Arc::new(next)),
    }
}

/// Memoized spread.
#[derive(Debug, Clone, Default)]
pub struct SpreadSelector {
    current: Option<Arc<Spread>>,
}

impl SpreadSelector {
    /// Creates an empty selector.
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Returns the spread of the given ladders.
    ///
    /// Once the spread becomes unavailable the memo is dropped, so the next
    /// available spread is always a fresh `Arc`.
    pub fn select(&mut self, bids: &[OrderRecord], asks: &[OrderRecord]) -> Option<Arc<Spread>> {
        let spread = stabilize_spread(self.current.as_ref(), compute_spread(bids, asks));
        self.current.clone_from(&spread);
        spread
    }

    /// Returns the last spread handed out.
    #[must_use]
    pub fn current(&self) -> Option<&Arc<Spread>> {
        self.current.as_ref()
    }

    /// Forgets the memoized spread.
    pub fn reset(&mut self) {
        self.current = None;
    }
}
