//! Feed adapter boundary.
//!
//! The network connection is owned by the caller. This module provides what
//! sits on this side of it:
//!
//! - [`FeedMessage`]: classification of raw frames
//! - [`ConnectionStatus`] and [`FeedStats`]: observability counters
//! - [`FeedTransport`] and [`SubscriptionRegistry`]: topic bookkeeping

mod message;
mod status;
mod subscription;

pub use message::FeedMessage;
pub use status::{ConnectionStatus, FeedStats, NORMAL_CLOSURE};
pub use subscription::{
    FeedTransport, SubscriptionOp, SubscriptionRequest, SubscriptionRegistry,
};
