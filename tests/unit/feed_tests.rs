//! Integration tests for the feed boundary.

use bitmex_l2_book::Result;
use bitmex_l2_book::config::ViewConfig;
use bitmex_l2_book::feed::{FeedTransport, NORMAL_CLOSURE, SubscriptionRegistry};
use bitmex_l2_book::view::OrderBookView;
use std::sync::Mutex;

/// Transport stand-in that records outgoing frames.
#[derive(Default)]
struct LoopbackTransport {
    open: bool,
    sent: Mutex<Vec<String>>,
}

impl FeedTransport for LoopbackTransport {
    fn connect(&mut self) -> Result<()> {
        self.open = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.open = false;
    }

    fn send(&self, message: &str) -> bool {
        if self.open {
            self.sent.lock().unwrap().push(message.to_string());
        }
        self.open
    }

    fn is_connected(&self) -> bool {
        self.open
    }
}

#[test]
fn test_session_resubscribes_on_symbol_change() {
    let mut transport = LoopbackTransport::default();
    let registry = SubscriptionRegistry::new();
    let mut view = OrderBookView::new(ViewConfig::default());

    view.connection_status_mut().reset();
    transport.connect().unwrap();
    view.connection_status_mut().on_connect();

    let topic = view.subscription_topic();
    assert!(registry.subscribe(&transport, &[topic.as_str()], true).unwrap());

    view.set_selected_symbol("ETHUSD");
    let topic = view.subscription_topic();
    assert!(registry.subscribe(&transport, &[topic.as_str()], true).unwrap());

    assert_eq!(
        registry.topics(),
        vec!["orderBookL2_25:ETHUSD", "orderBookL2_25:XBTUSD"]
    );
    assert_eq!(transport.sent.lock().unwrap().len(), 2);

    transport.disconnect();
    view.connection_status_mut().on_disconnect(NORMAL_CLOSURE);
    registry.clear();

    let status = view.connection_status();
    assert!(!status.is_connected);
    assert!(status.error.is_none());
    assert!(registry.is_empty());
}

#[test]
fn test_feed_error_frame_surfaces_in_status() {
    let mut view = OrderBookView::default();
    view.connection_status_mut().on_connect();

    view.handle_message(r#"{"status":400,"error":"Unknown or expired API key."}"#);

    assert_eq!(
        view.connection_status().error.as_deref(),
        Some("WebSocket Error: Unknown or expired API key.")
    );
    assert!(view.connection_status().is_connected);
}
