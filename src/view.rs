//! Order book view module.
//!
//! This module provides the [`OrderBookView`], the object the presentation
//! layer holds. It owns the store, the selected symbol, the memoized ladder
//! and spread selectors, and the connection counters the feed adapter writes.
//!
//! ## Data flow
//!
//! ```text
//! feed frame ──► handle_message ──► OrderBookStore::apply
//!                                          │
//!                 bids() / asks() ◄── LadderSelector (per side)
//!                        │
//!                    spread() ◄────── SpreadSelector
//! ```
//!
//! Selectors are pulled after each `apply`. Every accessor returns an `Arc`
//! that stays pointer-equal while its content is unchanged.

use crate::config::ViewConfig;
use crate::feed::{ConnectionStatus, FeedMessage, FeedStats};
use crate::orderbook::{
    Action, BookSnapshot, Ladder, LadderSelector, Operation, OrderBookStore, OrderRecord, Side,
    Spread, SpreadSelector,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, trace};

/// Live order book with derived ladders and spread for the selected symbol.
#[derive(Debug)]
pub struct OrderBookView {
    config: ViewConfig,
    store: OrderBookStore,
    selected_symbol: String,
    bids: LadderSelector,
    asks: LadderSelector,
    spread: SpreadSelector,
    status: ConnectionStatus,
    stats: FeedStats,
}

impl Default for OrderBookView {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl OrderBookView {
    /// Creates an empty view selecting `config.default_symbol`.
    #[must_use]
    pub fn new(config: ViewConfig) -> Self {
        Self {
            selected_symbol: config.default_symbol.clone(),
            config,
            store: OrderBookStore::new(),
            bids: LadderSelector::new(Side::Buy),
            asks: LadderSelector::new(Side::Sell),
            spread: SpreadSelector::new(),
            status: ConnectionStatus::default(),
            stats: FeedStats::new(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &OrderBookStore {
        &self.store
    }

    /// Returns a consistent snapshot of the whole book.
    #[must_use]
    pub fn snapshot(&self) -> BookSnapshot {
        self.store.snapshot()
    }

    /// Applies one operation to the store.
    pub fn apply(&mut self, operation: &Operation) -> Option<Action> {
        let started = Instant::now();
        let applied = self.store.apply(operation);
        if applied.is_some() {
            self.stats.record_apply(started.elapsed());
        }
        applied
    }

    /// Handles one raw feed frame.
    ///
    /// Unparseable frames are logged and dropped. Every decoded frame counts
    /// towards the connection status; feed errors are recorded there, and table
    /// frames are applied. Returns the applied action, if any.
    pub fn handle_message(&mut self, raw: &str) -> Option<Action> {
        let message = match FeedMessage::parse(raw) {
            Ok(message) => message,
            Err(err) => {
                error!("failed to parse feed message: {err}");
                return None;
            }
        };

        self.status.on_message();
        self.stats.record_message(Utc::now());

        match message {
            FeedMessage::Subscribed(topic) => {
                info!(%topic, "subscribed");
                None
            }
            FeedMessage::Info(text) => {
                info!("feed info: {text}");
                None
            }
            FeedMessage::Error(text) => {
                error!("feed error: {text}");
                self.status.set_error(format!("WebSocket Error: {text}"));
                None
            }
            FeedMessage::Table(operation) => self.apply(&operation),
            FeedMessage::Other(value) => {
                trace!(%value, "unhandled feed message");
                None
            }
        }
    }

    /// Returns the selected symbol.
    #[must_use]
    pub fn selected_symbol(&self) -> &str {
        &self.selected_symbol
    }

    /// Selects another symbol. The store is left as is.
    ///
    /// Returns true if the selection changed.
    pub fn set_selected_symbol(&mut self, symbol: impl Into<String>) -> bool {
        let symbol = symbol.into();
        if symbol == self.selected_symbol {
            return false;
        }
        info!(from = %self.selected_symbol, to = %symbol, "selected symbol changed");
        self.selected_symbol = symbol;
        true
    }

    /// Subscription topic of the selected symbol.
    #[must_use]
    pub fn subscription_topic(&self) -> String {
        self.config.topic(&self.selected_symbol)
    }

    /// Returns the ladder for `side` of the selected symbol.
    pub fn ladder(&mut self, side: Side) -> Ladder {
        let selector = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        selector.select(&self.store, &self.selected_symbol)
    }

    /// Bids of the selected symbol, best first.
    pub fn bids(&mut self) -> Ladder {
        self.ladder(Side::Buy)
    }

    /// Asks of the selected symbol, best first.
    pub fn asks(&mut self) -> Ladder {
        self.ladder(Side::Sell)
    }

    /// Spread of the selected symbol, or `None` while unavailable.
    pub fn spread(&mut self) -> Option<Arc<Spread>> {
        let bids = self.bids();
        let asks = self.asks();
        self.spread.select(&bids, &asks)
    }

    /// The first `display_depth` entries of a ladder.
    pub fn visible(&mut self, side: Side) -> Vec<OrderRecord> {
        let depth = self.config.display_depth;
        self.ladder(side).iter().take(depth).cloned().collect()
    }

    /// Returns the connection status.
    #[must_use]
    pub const fn connection_status(&self) -> &ConnectionStatus {
        &self.status
    }

    /// Returns the connection status for the feed adapter to update.
    pub fn connection_status_mut(&mut self) -> &mut ConnectionStatus {
        &mut self.status
    }

    /// Returns the feed statistics.
    #[must_use]
    pub const fn stats(&self) -> &FeedStats {
        &self.stats
    }
}
