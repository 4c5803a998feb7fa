//! Ladder views.
//!
//! A ladder is the sorted sequence of resting orders on one side of one symbol.
//! Bids are ordered best (highest) first, asks best (lowest) first.
//!
//! [`LadderSelector`] recomputes a ladder on demand and hands back the previous
//! `Arc` whenever the new ladder matches it element-wise on `(id, price, size)`,
//! so consumers can compare with [`Arc::ptr_eq`] to skip redraws.

use super::record::{OrderRecord, Side};
use super::store::{BookMap, OrderBookStore};
use std::cmp::Ordering;
use std::sync::Arc;

/// Shared, immutable ladder.
pub type Ladder = Arc<Vec<OrderRecord>>;

/// Builds the sorted ladder for `side` of `symbol`.
///
/// Records without a price order as if priced at zero. Equal prices fall back
/// to ascending id so the order does not depend on map iteration.
#[must_use]
pub fn compute_ladder(book: &BookMap, side: Side, symbol: &str) -> Vec<OrderRecord> {
    let mut ladder: Vec<OrderRecord> = book
        .values()
        .filter(|r| r.side == side && r.symbol == symbol)
        .cloned()
        .collect();

    ladder.sort_by(|a, b| compare_for_side(side, a, b));
    ladder
}

fn compare_for_side(side: Side, a: &OrderRecord, b: &OrderRecord) -> Ordering {
    let by_price = match side {
        Side::Buy => b.sort_price().cmp(&a.sort_price()),
        Side::Sell => a.sort_price().cmp(&b.sort_price()),
    };
    by_price.then(a.id.cmp(&b.id))
}

/// Returns true if both ladders hold the same `(id, price, size)` at every position.
#[must_use]
pub fn ladders_equal(a: &[OrderRecord], b: &[OrderRecord]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.id == y.id && x.price == y.price && x.size == y.size)
}

/// Returns `previous` if `next` is equal to it, otherwise wraps `next`.
#[must_use]
pub fn stabilize_ladder(previous: Option<&Ladder>, next: Vec<OrderRecord>) -> Ladder {
    match previous {
        Some(prev) if ladders_equal(prev, &next) => Arc::clone(prev),
        _ => Arc::new(next),
    }
}

/// Memoized ladder for one side.
#[derive(Debug, Clone)]
pub struct LadderSelector {
    side: Side,
    /// Last ladder handed out.
    current: Option<Ladder>,
    /// Store generation and symbol `current` was computed from.
    computed_for: Option<(u64, String)>,
}

impl LadderSelector {
    /// Creates a selector for one side.
    #[must_use]
    pub const fn new(side: Side) -> Self {
        Self {
            side,
            current: None,
            computed_for: None,
        }
    }

    /// Returns the side this selector projects.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Returns the ladder for `symbol`.
    ///
    /// Skips recomputation entirely when neither the store nor the symbol
    /// changed since the last call; otherwise recomputes and reuses the
    /// previous `Arc` if the content is unchanged.
    pub fn select(&mut self, store: &OrderBookStore, symbol: &str) -> Ladder {
        if let (Some(current), Some((generation, last_symbol))) =
            (&self.current, &self.computed_for)
        {
            if *generation == store.generation() && last_symbol == symbol {
                return Arc::clone(current);
            }
        }

        let next = compute_ladder(store.book(), self.side, symbol);
        let ladder = stabilize_ladder(self.current.as_ref(), next);

        self.current = Some(Arc::clone(&ladder));
        self.computed_for = Some((store.generation(), symbol.to_string()));
        ladder
    }

    /// Returns the last ladder handed out, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Ladder> {
        self.current.as_ref()
    }

    /// Forgets the memoized ladder.
    pub fn reset(&mut self) {
        self.current = None;
        self.computed_for = None;
    }
}

/// Width of a depth bar as a percentage of `max_size`, capped at 100.
#[must_use]
pub fn depth_percent(size: Option<u64>, max_size: u64) -> f64 {
    let max_size = max_size.max(1);
    (size.unwrap_or(0) as f64 / max_size as f64 * 100.0).min(100.0)
}

/// Largest size across both visible ladders, never below 1.
#[must_use]
pub fn max_visible_size(bids: &[OrderRecord], asks: &[OrderRecord]) -> u64 {
    bids.iter()
        .chain(asks)
        .map(|r| r.size.unwrap_or(0))
        .max()
        .unwrap_or(0)
        .max(1)
}
