//! # BitMEX L2 Book - Order Book Reconstruction and Derived Views
//!
//! A Rust library that rebuilds a level-2 order book from the BitMEX
//! `orderBookL2` / `orderBookL2_25` realtime feed and derives the sorted bid
//! ladder, ask ladder and top-of-book spread a live display needs on every
//! update.
//!
//! ## Key Features
//!
//! - **Atomic Apply**: Each `partial`, `insert`, `update` or `delete` operation
//!   is one transition of the store. Readers holding a snapshot never see a
//!   half-applied operation.
//!
//! - **Per-Symbol Snapshots**: A `partial` supersedes the state of exactly the
//!   symbols it contains, dropping stale orders that are absent from it.
//!
//! - **Reference-Stable Views**: Ladders and spread are handed out as `Arc`s that
//!   stay pointer-equal while their visible content is unchanged, so renderers
//!   can skip work with [`Arc::ptr_eq`](std::sync::Arc::ptr_eq).
//!
//! - **Tolerant of Feed Races**: Updates for unknown ids, duplicate
//!   deletes and unknown actions never fail the stream.
//!
//! - **Exact Prices**: Prices are `rust_decimal::Decimal`, so spreads do not pick
//!   up binary floating point noise.
//!
//! ## Architecture
//!
//! ```text
//! Feed adapter (transport owned by the caller)
//!   └── OrderBookView::handle_message (classify frame, count, apply)
//!         └── OrderBookStore::apply (id → OrderRecord, all symbols)
//!               ├── bids()   LadderSelector (Buy,  selected symbol)
//!               ├── asks()   LadderSelector (Sell, selected symbol)
//!               └── spread() SpreadSelector
//! ```
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`orderbook`] | Record model, store, ladders and spread |
//! | [`view`] | Presentation-facing view with the selected symbol |
//! | [`feed`] | Frame classification, subscriptions, connection counters |
//! | [`config`] | View configuration |
//! | [`error`] | Error types and `Result` type alias |
//!
//! ## Example Usage
//!
//! ```rust
//! use bitmex_l2_book::view::OrderBookView;
//! use rust_decimal_macros::dec;
//!
//! let mut view = OrderBookView::default();
//!
//! view.handle_message(r#"{"table":"orderBookL2_25","action":"partial","data":[
//!     {"symbol":"XBTUSD","id":1,"side":"Buy","size":100,"price":100},
//!     {"symbol":"XBTUSD","id":2,"side":"Sell","size":50,"price":101}
//! ]}"#);
//!
//! let spread = view.spread().unwrap();
//! assert_eq!(spread.spread, dec!(1));
//! assert_eq!(spread.spread_percent.to_string(), "1.0000");
//!
//! // No change in between: same allocation.
//! let bids = view.bids();
//! assert!(std::sync::Arc::ptr_eq(&bids, &view.bids()));
//! ```
//!
//! ## Dependencies
//!
//! - **rust_decimal** (1.39): Precise decimal arithmetic
//! - **serde** / **serde_json** (1.0): Feed frame decoding
//! - **dashmap** (6): Concurrent topic set for subscriptions
//! - **chrono** (0.4): Feed statistics timestamps
//! - **thiserror** (2.0): Error handling
//! - **tracing** (0.1): Structured diagnostics

pub mod config;
pub mod error;
pub mod feed;
pub mod orderbook;
pub mod view;

pub use error::{Error, Result};
