//! Feed Replay Example
//!
//! This example replays a short recorded BitMEX session through an
//! `OrderBookView`:
//! - Welcome banner and subscription acknowledgement
//! - Initial `partial` snapshot for XBTUSD
//! - Streaming inserts, updates and deletes
//! - A frame for an unmaintained table and an unknown action
//!
//! After each frame it prints the top of book and whether the derived
//! ladders were reallocated.
//!
//! Run with: `cargo run --example replay_feed`

use bitmex_l2_book::orderbook::Side;
use bitmex_l2_book::view::OrderBookView;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SESSION: &[&str] = &[
    r#"{"info":"Welcome to the BitMEX Realtime API.","version":"2.0.0"}"#,
    r#"{"success":true,"subscribe":"orderBookL2_25:XBTUSD","request":{"op":"subscribe","args":["orderBookL2_25:XBTUSD"]}}"#,
    r#"{"table":"orderBookL2_25","action":"partial","keys":["symbol","id","side"],"data":[
        {"symbol":"XBTUSD","id":8799500000,"side":"Sell","size":1200,"price":50005},
        {"symbol":"XBTUSD","id":8799499500,"side":"Sell","size":300,"price":50000.5},
        {"symbol":"XBTUSD","id":8799500500,"side":"Buy","size":4500,"price":49999.5},
        {"symbol":"XBTUSD","id":8799501000,"side":"Buy","size":900,"price":49995}
    ]}"#,
    r#"{"table":"orderBookL2_25","action":"update","data":[{"symbol":"XBTUSD","id":8799500500,"side":"Buy","size":4200}]}"#,
    r#"{"table":"orderBookL2_25","action":"insert","data":[{"symbol":"XBTUSD","id":8799500400,"side":"Buy","size":150,"price":50000}]}"#,
    r#"{"table":"trade","action":"insert","data":[{"symbol":"XBTUSD","side":"Buy","size":10,"price":50000.5}]}"#,
    r#"{"table":"orderBookL2_25","action":"delete","data":[{"symbol":"XBTUSD","id":8799499500,"side":"Sell"}]}"#,
    r#"{"table":"orderBookL2_25","action":"bogus","data":[{"id":8799500000}]}"#,
    r#"{"table":"orderBookL2_25","action":"update","data":[{"id":42,"size":1}]}"#,
];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("=== Feed Replay ===");

    let mut view = OrderBookView::default();
    view.connection_status_mut().on_connect();
    info!("Subscribing to {}", view.subscription_topic());

    let mut bids = view.bids();
    let mut asks = view.asks();

    for (n, frame) in SESSION.iter().enumerate() {
        let action = view.handle_message(frame);

        let next_bids = view.bids();
        let next_asks = view.asks();
        let redraw = !Arc::ptr_eq(&bids, &next_bids) || !Arc::ptr_eq(&asks, &next_asks);
        bids = next_bids;
        asks = next_asks;

        match view.spread() {
            Some(spread) => info!(frame = n, ?action, redraw, "spread {spread}"),
            None => info!(frame = n, ?action, redraw, "spread unavailable"),
        }
    }

    info!("--- Final Book ---");
    for ask in view.visible(Side::Sell).iter().rev() {
        info!("  ASK {:>10} {:>8}", format_price(ask.price), ask.size.unwrap_or(0));
    }
    for bid in view.visible(Side::Buy) {
        info!("  BID {:>10} {:>8}", format_price(bid.price), bid.size.unwrap_or(0));
    }

    info!("Connection: {}", view.connection_status());
    info!("Orders in store: {}", view.store().len());
}

fn format_price(price: Option<rust_decimal::Decimal>) -> String {
    price.map_or_else(|| "0.0".to_string(), |p| format!("{:.1}", p))
}
