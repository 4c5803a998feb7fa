//! Subscription bookkeeping over a feed transport.
//!
//! The transport itself (socket, reconnects, timeouts) lives outside this
//! crate behind [`FeedTransport`]. [`SubscriptionRegistry`] tracks which topics
//! are live so repeated subscribe calls do not spam the feed.

use crate::error::Result;
use dashmap::DashSet;
use serde::Serialize;
use tracing::debug;

/// Connection to the realtime feed.
pub trait FeedTransport {
    /// Opens the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be started.
    fn connect(&mut self) -> Result<()>;

    /// Closes the connection with a normal close code.
    fn disconnect(&mut self);

    /// Sends a text frame. Returns false if the connection is not open.
    fn send(&self, message: &str) -> bool;

    /// Returns true while the connection is open.
    fn is_connected(&self) -> bool;
}

/// Request verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionOp {
    /// Start receiving topics.
    Subscribe,
    /// Stop receiving topics.
    Unsubscribe,
}

/// Wire request, e.g. `{"op":"subscribe","args":["orderBookL2_25:XBTUSD"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionRequest {
    /// Request verb.
    pub op: SubscriptionOp,
    /// Topics.
    pub args: Vec<String>,
}

impl SubscriptionRequest {
    /// Serializes the request to a JSON frame.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Topics currently subscribed on one connection.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    topics: DashSet<String>,
}

impl SubscriptionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to `topics`.
    ///
    /// With `dedupe`, topics already subscribed are left out of the request.
    /// Topics are recorded only if the transport accepted the frame. Returns
    /// true if nothing needed sending or the frame was sent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if the request cannot be serialized.
    pub fn subscribe<T, S>(&self, transport: &T, topics: &[S], dedupe: bool) -> Result<bool>
    where
        T: FeedTransport + ?Sized,
        S: AsRef<str>,
    {
        let pending: Vec<String> = topics
            .iter()
            .map(|t| t.as_ref().to_string())
            .filter(|t| !dedupe || !self.topics.contains(t))
            .collect();

        self.send(transport, SubscriptionOp::Subscribe, pending)
    }

    /// Unsubscribes from those of `topics` that are currently subscribed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if the request cannot be serialized.
    pub fn unsubscribe<T, S>(&self, transport: &T, topics: &[S]) -> Result<bool>
    where
        T: FeedTransport + ?Sized,
        S: AsRef<str>,
    {
        let pending: Vec<String> = topics
            .iter()
            .map(|t| t.as_ref().to_string())
            .filter(|t| self.topics.contains(t))
            .collect();

        self.send(transport, SubscriptionOp::Unsubscribe, pending)
    }

    fn send<T>(&self, transport: &T, op: SubscriptionOp, args: Vec<String>) -> Result<bool>
    where
        T: FeedTransport + ?Sized,
    {
        if args.is_empty() {
            return Ok(true);
        }

        let request = SubscriptionRequest { op, args };
        if !transport.send(&request.to_json()?) {
            debug!(?op, topics = ?request.args, "transport not open, request dropped");
            return Ok(false);
        }

        for topic in request.args {
            match op {
                SubscriptionOp::Subscribe => {
                    self.topics.insert(topic);
                }
                SubscriptionOp::Unsubscribe => {
                    self.topics.remove(&topic);
                }
            }
        }
        Ok(true)
    }

    /// Returns true if `topic` is subscribed.
    #[must_use]
    pub fn contains(&self, topic: &str) -> bool {
        self.topics.contains(topic)
    }

    /// Returns all subscribed topics (sorted).
    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.topics.iter().map(|t| t.key().clone()).collect();
        topics.sort_unstable();
        topics
    }

    /// Returns the number of subscribed topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Returns true if nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Forgets every topic, e.g. before reconnecting.
    pub fn clear(&self) {
        self.topics.clear();
    }
}
