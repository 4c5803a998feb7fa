//! Connection status and feed statistics.
//!
//! Both are written by the feed adapter and only surfaced by the view for
//! observability; the order book never reads them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Close code of a normal, user-requested disconnect.
pub const NORMAL_CLOSURE: u16 = 1000;

/// Summary of the feed connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    /// True while the socket is open.
    pub is_connected: bool,
    /// Last error worth showing to a human.
    pub error: Option<String>,
    /// Number of frames decoded since the last connect.
    pub message_count: u64,
}

impl ConnectionStatus {
    /// Resets the status for a new connection attempt.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Marks the socket as open.
    pub fn on_connect(&mut self) {
        self.is_connected = true;
    }

    /// Counts one decoded frame.
    pub fn on_message(&mut self) {
        self.message_count += 1;
    }

    /// Records a transport-level failure.
    pub fn on_transport_error(&mut self) {
        self.error = Some("WebSocket connection error".to_string());
    }

    /// Marks the socket as closed.
    ///
    /// Any close code other than [`NORMAL_CLOSURE`] is recorded as an error.
    pub fn on_disconnect(&mut self, code: u16) {
        self.is_connected = false;
        if code != NORMAL_CLOSURE {
            self.error = Some(format!("Connection closed unexpectedly (Code: {code})"));
        }
    }

    /// Records an error reported by the feed.
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_connected {
            "Live"
        } else {
            "Disconnected"
        };
        write!(f, "{state} ({} messages)", self.message_count)?;
        if let Some(error) = &self.error {
            write!(f, ": {error}")?;
        }
        Ok(())
    }
}

/// Weight of the newest sample in the apply latency average.
const LATENCY_EMA_WEIGHT: f64 = 0.1;

/// Throughput and latency counters for the feed.
#[derive(Debug, Clone, Serialize)]
pub struct FeedStats {
    /// When counting started.
    pub started_at: DateTime<Utc>,
    /// When the last frame arrived.
    pub last_message_at: Option<DateTime<Utc>>,
    /// Frames seen since `started_at`.
    pub message_count: u64,
    /// Operations applied to the store.
    pub operations_applied: u64,
    /// Exponential moving average of the time spent in `apply`.
    pub avg_apply_latency: Option<Duration>,
}

impl Default for FeedStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedStats {
    /// Starts counting now.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Starts counting at the given instant.
    #[must_use]
    pub const fn starting_at(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            last_message_at: None,
            message_count: 0,
            operations_applied: 0,
            avg_apply_latency: None,
        }
    }

    /// Counts one frame received at `at`.
    pub fn record_message(&mut self, at: DateTime<Utc>) {
        self.message_count += 1;
        self.last_message_at = Some(at);
    }

    /// Folds one `apply` duration into the moving average.
    pub fn record_apply(&mut self, latency: Duration) {
        self.operations_applied += 1;
        self.avg_apply_latency = Some(match self.avg_apply_latency {
            None => latency,
            Some(avg) => avg.mul_f64(1.0 - LATENCY_EMA_WEIGHT) + latency.mul_f64(LATENCY_EMA_WEIGHT),
        });
    }

    /// Time elapsed between `started_at` and `now`.
    #[must_use]
    pub fn uptime(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.started_at
    }

    /// Frames per second between `started_at` and `now`.
    #[must_use]
    pub fn message_rate(&self, now: DateTime<Utc>) -> f64 {
        let millis = self.uptime(now).num_milliseconds();
        if millis <= 0 {
            return 0.0;
        }
        self.message_count as f64 / (millis as f64 / 1000.0)
    }
}
