//! Error types for the order book engine.
//!
//! None of these errors ever escape [`OrderBookStore::apply`](crate::orderbook::OrderBookStore::apply):
//! the engine logs them and keeps the book usable. They surface through the
//! classification helpers on [`Operation`](crate::orderbook::Operation), message
//! parsing in [`feed`](crate::feed), and configuration loading.

use thiserror::Error;

/// Result type alias for order book operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the order book engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The operation targets a table this engine does not maintain.
    #[error("unknown table: {table}")]
    UnknownTable {
        /// The table name received from the feed.
        table: String,
    },

    /// The operation carries an action this engine does not understand.
    #[error("unknown orderbook action: {action}")]
    UnknownAction {
        /// The action name received from the feed.
        action: String,
    },

    /// A record fragment lacks a field its action requires.
    #[error("{action} fragment missing required field `{field}`")]
    MissingField {
        /// The action being applied.
        action: &'static str,
        /// The missing field.
        field: &'static str,
    },

    /// A feed frame does not have the expected shape.
    #[error("malformed message: {message}")]
    MalformedMessage {
        /// Description of the problem.
        message: String,
    },

    /// JSON decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration value is out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },
}

impl Error {
    /// Creates an unknown table error.
    pub fn unknown_table(table: impl Into<String>) -> Self {
        Self::UnknownTable {
            table: table.into(),
        }
    }

    /// Creates an unknown action error.
    pub fn unknown_action(action: impl Into<String>) -> Self {
        Self::UnknownAction {
            action: action.into(),
        }
    }

    /// Creates a missing field error.
    #[must_use]
    pub const fn missing_field(action: &'static str, field: &'static str) -> Self {
        Self::MissingField { action, field }
    }

    /// Creates a malformed message error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedMessage {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
