//! Order book reconstruction module.
//!
//! This module rebuilds a level-2 book from the feed's delta stream and derives
//! the views the presentation layer draws:
//!
//! ```text
//! Operation (partial / insert / update / delete)
//!   └── OrderBookStore::apply (one atomic transition per operation)
//!         └── BookMap (id → OrderRecord, all symbols)
//!               ├── LadderSelector (Buy)  ─┐
//!               ├── LadderSelector (Sell) ─┴── SpreadSelector
//! ```
//!
//! ## Components
//!
//! - [`OrderRecord`], [`RecordFragment`], [`Side`]: the record model
//! - [`Operation`], [`Table`], [`Action`]: one feed operation
//! - [`OrderBookStore`]: the keyed store and its `apply` transition
//! - [`LadderSelector`], [`compute_ladder`]: sorted bid/ask ladders
//! - [`SpreadSelector`], [`compute_spread`]: top-of-book spread
//!
//! ## Example
//!
//! ```rust
//! use bitmex_l2_book::orderbook::{
//!     LadderSelector, Operation, OrderBookStore, RecordFragment, Side,
//! };
//! use rust_decimal_macros::dec;
//!
//! let mut store = OrderBookStore::new();
//! store.apply(&Operation::partial(vec![
//!     RecordFragment::full("XBTUSD", 1, Side::Buy, 100, dec!(50000)),
//!     RecordFragment::full("XBTUSD", 2, Side::Buy, 20, dec!(50001)),
//! ]));
//!
//! let mut bids = LadderSelector::new(Side::Buy);
//! let ladder = bids.select(&store, "XBTUSD");
//! assert_eq!(ladder[0].price, Some(dec!(50001)));
//! ```

mod ladder;
mod operation;
mod record;
mod spread;
mod store;

// Re-export all public types
pub use ladder::{
    Ladder, LadderSelector, compute_ladder, depth_percent, ladders_equal, max_visible_size,
    stabilize_ladder,
};
pub use operation::{Action, DataRow, Operation, Table};
pub use record::{OrderRecord, RecordFragment, Side};
pub use spread::{SPREAD_PERCENT_SCALE, Spread, SpreadSelector, compute_spread, stabilize_spread};
pub use store::{BookMap, BookSnapshot, OrderBookStore};
