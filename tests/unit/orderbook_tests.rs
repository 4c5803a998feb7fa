//! Integration tests for the orderbook module.

use bitmex_l2_book::orderbook::{Action, Operation, OrderBookStore, RecordFragment, Side};
use bitmex_l2_book::view::OrderBookView;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::sync::Arc;

fn xbt(id: u64, side: Side, size: u64, price: rust_decimal::Decimal) -> RecordFragment {
    RecordFragment::full("XBTUSD", id, side, size, price)
}

#[test]
fn test_end_to_end_partial_update_delete() {
    let mut view = OrderBookView::default();

    view.handle_message(
        r#"{"table":"orderBookL2_25","action":"partial","data":[
            {"symbol":"XBTUSD","id":1,"side":"Buy","size":100,"price":50000},
            {"symbol":"XBTUSD","id":2,"side":"Sell","size":50,"price":50010}
        ]}"#,
    );
    view.handle_message(r#"{"table":"orderBookL2_25","action":"update","data":[{"id":1,"size":80}]}"#);
    view.handle_message(r#"{"table":"orderBookL2_25","action":"delete","data":[{"id":2}]}"#);

    let bids = view.bids();
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0].id, 1);
    assert_eq!(bids[0].price, Some(dec!(50000)));
    assert_eq!(bids[0].size, Some(80));

    assert!(view.asks().is_empty());
    assert!(view.spread().is_none());
    assert_eq!(view.connection_status().message_count, 3);
}

#[test]
fn test_key_uniqueness_after_mixed_operations() {
    let mut store = OrderBookStore::new();

    store.apply(&Operation::partial(vec![
        xbt(1, Side::Buy, 10, dec!(100)),
        xbt(2, Side::Sell, 10, dec!(101)),
    ]));
    store.apply(&Operation::insert(vec![
        xbt(1, Side::Buy, 20, dec!(99)),
        xbt(3, Side::Buy, 5, dec!(98)),
        xbt(3, Side::Buy, 6, dec!(98)),
    ]));
    store.apply(&Operation::update(vec![RecordFragment::with_id(2).size(1)]));
    store.apply(&Operation::partial(vec![xbt(2, Side::Sell, 4, dec!(102))]));

    let ids: HashSet<u64> = store.book().values().map(|r| r.id).collect();
    assert_eq!(ids.len(), store.len());
    assert_eq!(store.book().keys().copied().collect::<HashSet<_>>(), ids);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_partial_then_update_same_id_in_order() {
    let mut store = OrderBookStore::new();

    store.apply(&Operation::partial(vec![xbt(7, Side::Buy, 10, dec!(100))]));
    store.apply(&Operation::update(vec![
        RecordFragment::with_id(7).size(3).price(dec!(100.5)),
    ]));

    let record = store.get(7).unwrap();
    assert_eq!(record.size, Some(3));
    assert_eq!(record.price, Some(dec!(100.5)));
}

#[test]
fn test_update_with_explicit_null_clears_price() {
    let mut view = OrderBookView::default();

    view.handle_message(
        r#"{"table":"orderBookL2_25","action":"partial","data":[{"symbol":"XBTUSD","id":1,"side":"Buy","size":5,"price":10}]}"#,
    );
    view.handle_message(r#"{"table":"orderBookL2_25","action":"update","data":[{"id":1,"price":null}]}"#);

    let record = view.store().get(1).unwrap();
    assert_eq!(record.price, None);
    assert_eq!(record.size, Some(5));
}

#[test]
fn test_bad_row_only_skips_itself() {
    let mut view = OrderBookView::default();

    let action = view.handle_message(
        r#"{"table":"orderBookL2_25","action":"insert","data":[
            {"symbol":"XBTUSD","id":1,"side":"Buy","size":5,"price":10},
            {"symbol":"XBTUSD","id":2,"side":"Buy","size":-1,"price":10}
        ]}"#,
    );

    assert_eq!(action, Some(Action::Insert));
    assert_eq!(view.store().len(), 1);
    assert!(view.store().contains(1));
}

#[test]
fn test_resnapshot_with_bad_row_still_drops_stale_orders() {
    let mut view = OrderBookView::default();
    view.apply(&Operation::partial(vec![
        xbt(1, Side::Buy, 10, dec!(100)),
        xbt(2, Side::Sell, 10, dec!(101)),
    ]));

    let action = view.handle_message(
        r#"{"table":"orderBookL2_25","action":"partial","data":[
            {"symbol":"XBTUSD","id":3,"side":"Buy","size":4,"price":99},
            {"symbol":"XBTUSD","id":4,"side":"buy","size":4,"price":102},
            {"symbol":"XBTUSD","id":5,"size":4,"price":103}
        ]}"#,
    );

    assert_eq!(action, Some(Action::Partial));
    assert_eq!(view.store().len(), 1);
    assert_eq!(view.bids()[0].id, 3);
    assert!(view.asks().is_empty());
}

#[test]
fn test_unknown_action_does_not_change_book() {
    let mut view = OrderBookView::default();
    view.apply(&Operation::partial(vec![xbt(1, Side::Buy, 10, dec!(100))]));
    let before = view.snapshot();

    let action = view.handle_message(
        r#"{"table":"orderBookL2_25","action":"bogus","data":[{"id":1,"size":1}]}"#,
    );

    assert_eq!(action, None);
    assert_eq!(*view.snapshot(), *before);
}

#[test]
fn test_other_tables_are_ignored() {
    let mut view = OrderBookView::default();

    view.handle_message(
        r#"{"table":"trade","action":"insert","data":[{"symbol":"XBTUSD","id":1,"side":"Buy","size":1,"price":1}]}"#,
    );

    assert!(view.store().is_empty());
    assert_eq!(view.store().generation(), 0);
}

#[test]
fn test_ladder_ordering_through_view() {
    let mut view = OrderBookView::default();
    view.apply(&Operation::partial(vec![
        xbt(1, Side::Buy, 1, dec!(10)),
        xbt(2, Side::Buy, 1, dec!(30)),
        xbt(3, Side::Buy, 1, dec!(20)),
        xbt(4, Side::Sell, 1, dec!(15)),
        xbt(5, Side::Sell, 1, dec!(5)),
        xbt(6, Side::Sell, 1, dec!(25)),
    ]));

    let bid_prices: Vec<_> = view.bids().iter().map(|r| r.price.unwrap()).collect();
    let ask_prices: Vec<_> = view.asks().iter().map(|r| r.price.unwrap()).collect();

    assert_eq!(bid_prices, vec![dec!(30), dec!(20), dec!(10)]);
    assert_eq!(ask_prices, vec![dec!(5), dec!(15), dec!(25)]);
}

#[test]
fn test_stability_across_no_op_and_foreign_updates() {
    let mut view = OrderBookView::default();
    view.apply(&Operation::partial(vec![
        xbt(1, Side::Buy, 10, dec!(100)),
        xbt(2, Side::Sell, 10, dec!(101)),
        RecordFragment::full("ETHUSD", 3, Side::Buy, 10, dec!(2000)),
    ]));

    let bids = view.bids();
    let asks = view.asks();

    // Deleting an absent id still bumps the store generation.
    view.apply(&Operation::delete(vec![RecordFragment::with_id(999)]));
    view.apply(&Operation::partial(vec![RecordFragment::full(
        "ETHUSD",
        4,
        Side::Sell,
        1,
        dec!(2001),
    )]));

    assert!(Arc::ptr_eq(&bids, &view.bids()));
    assert!(Arc::ptr_eq(&asks, &view.asks()));

    view.apply(&Operation::insert(vec![xbt(5, Side::Buy, 1, dec!(99))]));
    assert!(!Arc::ptr_eq(&bids, &view.bids()));
    assert!(Arc::ptr_eq(&asks, &view.asks()));
}

#[test]
fn test_spread_reference_survives_depth_changes() {
    let mut view = OrderBookView::default();
    view.apply(&Operation::partial(vec![
        xbt(1, Side::Buy, 10, dec!(100)),
        xbt(2, Side::Sell, 10, dec!(101)),
    ]));
    let spread = view.spread().unwrap();

    view.apply(&Operation::insert(vec![xbt(3, Side::Buy, 10, dec!(99))]));
    view.apply(&Operation::update(vec![RecordFragment::with_id(1).size(1)]));
    assert!(Arc::ptr_eq(&spread, &view.spread().unwrap()));

    view.apply(&Operation::delete(vec![RecordFragment::with_id(1)]));
    let moved = view.spread().unwrap();
    assert!(!Arc::ptr_eq(&spread, &moved));
    assert_eq!(moved.best_bid, dec!(99));
    assert_eq!(moved.spread, dec!(2));
}

#[test]
fn test_snapshot_held_by_reader_is_consistent() {
    let mut store = OrderBookStore::new();
    store.apply(&Operation::partial(vec![
        xbt(1, Side::Buy, 10, dec!(100)),
        xbt(2, Side::Buy, 10, dec!(99)),
    ]));
    let reader = store.snapshot();

    store.apply(&Operation::partial(vec![xbt(3, Side::Buy, 1, dec!(98))]));

    let mut ids: Vec<u64> = reader.keys().copied().collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(store.book().keys().copied().collect::<Vec<_>>(), vec![3]);
}
