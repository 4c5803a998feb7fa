//! View configuration.

use crate::error::{Error, Result};
use crate::orderbook::Table;
use serde::{Deserialize, Serialize};

/// Instrument shown when nothing else is selected.
pub const DEFAULT_SYMBOL: &str = "XBTUSD";

/// Realtime endpoint of the feed.
pub const DEFAULT_ENDPOINT: &str = "wss://ws.bitmex.com/realtime";

/// Rows shown per side.
pub const DEFAULT_DISPLAY_DEPTH: usize = 25;

/// Settings for an [`OrderBookView`](crate::view::OrderBookView).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Initially selected instrument.
    pub default_symbol: String,
    /// Table to subscribe to.
    pub table: Table,
    /// Feed endpoint handed to the transport.
    pub endpoint: String,
    /// Rows shown per side.
    pub display_depth: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_symbol: DEFAULT_SYMBOL.to_string(),
            table: Table::OrderBookL2_25,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            display_depth: DEFAULT_DISPLAY_DEPTH,
        }
    }
}

impl ViewConfig {
    /// Parses and validates a JSON configuration. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` for malformed JSON and `Error::InvalidConfig` if a
    /// value is out of range.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the symbol and endpoint are set and the depth is positive.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` describing the first offending value.
    pub fn validate(&self) -> Result<()> {
        if self.default_symbol.trim().is_empty() {
            return Err(Error::invalid_config("default_symbol must not be empty"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(Error::invalid_config("endpoint must not be empty"));
        }
        if self.display_depth == 0 {
            return Err(Error::invalid_config("display_depth must be positive"));
        }
        Ok(())
    }

    /// Subscription topic for `symbol` on the configured table.
    #[must_use]
    pub fn topic(&self, symbol: &str) -> String {
        format!("{}:{}", self.table, symbol)
    }
}
