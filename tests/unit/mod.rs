//! Integration tests for bitmex-l2-book.

mod feed_tests;
mod orderbook_tests;
