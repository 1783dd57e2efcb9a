//! Tests for delta application and top-of-book queries

#[cfg(test)]
mod tests {
    use super::super::test_helpers::{book_with, update};
    use crate::orderbook::{BookUpdateEvent, OrderBook, PriceLevel, Side, UpdateMode};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_empty_book_queries() {
        let book = OrderBook::new("TEST");

        assert_eq!(book.symbol(), "TEST");
        assert_eq!(book.best_ask(), None);
        assert_eq!(book.best_bid(), None);
        assert_eq!(book.mid_price(), None);
        assert_eq!(book.spread(), None);
        assert!(book.asks_sorted().is_empty());
        assert!(book.bids_sorted().is_empty());
        assert!(book.is_empty());
        assert_eq!(book.sequence(), 0);
    }

    #[test]
    fn test_mid_price_and_spread() {
        let book = book_with(&[(100.0, 1.0), (101.0, 2.0)], &[(99.0, 1.0), (98.0, 2.0)]);

        assert_eq!(book.best_ask(), Some(100.0));
        assert_eq!(book.best_bid(), Some(99.0));
        assert_eq!(book.mid_price(), Some(99.5));
        assert_eq!(book.spread(), Some(1.0));
    }

    #[test]
    fn test_one_sided_book_has_no_mid() {
        let book = book_with(&[(100.0, 1.0)], &[]);

        assert_eq!(book.best_ask(), Some(100.0));
        assert_eq!(book.best_bid(), None);
        assert_eq!(book.mid_price(), None);
        assert_eq!(book.spread(), None);
    }

    #[test]
    fn test_sorted_views() {
        let book = book_with(
            &[(101.0, 2.0), (100.0, 1.0), (103.0, 4.0)],
            &[(97.0, 3.0), (99.0, 1.0), (98.0, 2.0)],
        );

        let asks: Vec<f64> = book.asks_sorted().iter().map(|l| l.price).collect();
        let bids: Vec<f64> = book.bids_sorted().iter().map(|l| l.price).collect();
        assert_eq!(asks, vec![100.0, 101.0, 103.0]);
        assert_eq!(bids, vec![99.0, 98.0, 97.0]);

        // snapshot copies are restartable
        assert_eq!(book.asks_sorted(), book.asks_sorted());
    }

    #[test]
    fn test_zero_quantity_removes_level() {
        let book = book_with(&[(100.0, 1.0), (101.0, 2.0)], &[(99.0, 1.0)]);

        book.apply_update(&update(&[(100.0, 0.0)], &[]));

        assert_eq!(book.quantity_at(Side::Sell, 100.0), None);
        assert_eq!(book.best_ask(), Some(101.0));
    }

    #[test]
    fn test_negative_quantity_removes_level() {
        let book = book_with(&[], &[(99.0, 1.0), (98.0, 2.0)]);

        book.apply_update(&update(&[], &[(99.0, -5.0)]));

        assert_eq!(book.quantity_at(Side::Buy, 99.0), None);
        assert_eq!(book.best_bid(), Some(98.0));
    }

    #[test]
    fn test_removing_absent_level_is_not_an_error() {
        let book = book_with(&[(100.0, 1.0)], &[]);

        let event = book.apply_update(&update(&[(105.0, 0.0)], &[(90.0, 0.0)]));

        assert_eq!(event.sequence, 2);
        assert_eq!(book.level_counts(), (1, 0));
    }

    #[test]
    fn test_overwrite_level() {
        let book = book_with(&[(100.0, 1.0)], &[]);

        book.apply_update(&update(&[(100.0, 7.5)], &[]));

        assert_eq!(book.quantity_at(Side::Sell, 100.0), Some(7.5));
        assert_eq!(book.level_counts(), (1, 0));
    }

    #[test]
    fn test_identical_delta_is_idempotent() {
        let book = book_with(&[(100.0, 1.0)], &[(99.0, 1.0)]);
        let delta = update(&[(100.5, 3.0)], &[(98.5, 2.0)]);

        book.apply_update(&delta);
        let after_first = (book.asks_sorted(), book.bids_sorted());
        book.apply_update(&delta);
        let after_second = (book.asks_sorted(), book.bids_sorted());

        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_empty_update_changes_nothing_but_sequence() {
        let book = book_with(&[(100.0, 1.0)], &[(99.0, 1.0)]);
        let before = book.snapshot();

        book.apply_update(&update(&[], &[]));
        let after = book.snapshot();

        assert_eq!(before.asks, after.asks);
        assert_eq!(before.bids, after.bids);
        assert_eq!(after.sequence, before.sequence + 1);
    }

    #[test]
    fn test_crossed_book_is_representable() {
        let book = book_with(&[(100.0, 1.0)], &[(101.0, 1.0)]);

        assert_eq!(book.spread(), Some(-1.0));
        assert_eq!(book.mid_price(), Some(100.5));
        assert!(book.snapshot().is_crossed());
    }

    #[test]
    fn test_replace_snapshot_drops_stale_levels() {
        let book = book_with(&[(100.0, 1.0), (101.0, 2.0)], &[(99.0, 1.0), (98.0, 2.0)]);

        book.replace_snapshot(&update(&[(102.0, 1.0)], &[(97.0, 1.0)]));

        assert_eq!(book.asks_sorted(), vec![PriceLevel::new(102.0, 1.0)]);
        assert_eq!(book.bids_sorted(), vec![PriceLevel::new(97.0, 1.0)]);
    }

    #[test]
    fn test_delta_merge_keeps_levels_absent_from_update() {
        let book = book_with(&[(100.0, 1.0), (101.0, 2.0)], &[]);

        book.apply(&update(&[(102.0, 1.0)], &[]), UpdateMode::DeltaMerge);

        assert_eq!(book.level_counts(), (3, 0));
    }

    #[test]
    fn test_top_levels_limits_each_side() {
        let asks: Vec<(f64, f64)> = (0..15).map(|i| (100.0 + i as f64, 1.0)).collect();
        let bids: Vec<(f64, f64)> = (0..3).map(|i| (99.0 - i as f64, 1.0)).collect();
        let book = book_with(&asks, &bids);

        let (top_asks, top_bids) = book.top_levels(10);

        assert_eq!(top_asks.len(), 10);
        assert_eq!(top_asks[0].price, 100.0);
        assert_eq!(top_asks[9].price, 109.0);
        assert_eq!(top_bids.len(), 3);
        assert_eq!(top_bids[0].price, 99.0);
    }

    #[test]
    fn test_update_listener_receives_event() {
        let received: Arc<Mutex<Vec<BookUpdateEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let book = OrderBook::with_update_listener(
            "TEST",
            Arc::new(move |event: &BookUpdateEvent| {
                sink.lock().unwrap().push(event.clone());
            }),
        );

        book.apply_update(&update(&[(100.0, 1.0), (101.0, 1.0)], &[(99.0, 2.0)]));

        let events = received.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].sequence, 1);
        assert_eq!(events[0].ask_changes, 2);
        assert_eq!(events[0].bid_changes, 1);
        assert_eq!(events[0].best_ask, Some(100.0));
        assert_eq!(events[0].best_bid, Some(99.0));
    }

    #[test]
    fn test_listener_can_query_book_without_deadlock() {
        let book = Arc::new(OrderBook::new("TEST"));
        let seen_mid = Arc::new(Mutex::new(None));

        let reader = Arc::clone(&book);
        let sink = Arc::clone(&seen_mid);
        book.subscribe(Arc::new(move |_event: &BookUpdateEvent| {
            *sink.lock().unwrap() = reader.mid_price();
        }));

        book.apply_update(&update(&[(100.0, 1.0)], &[(98.0, 1.0)]));

        assert_eq!(*seen_mid.lock().unwrap(), Some(99.0));
    }

    #[test]
    fn test_clear_listeners() {
        let calls = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&calls);
        let book = OrderBook::new("TEST");
        book.subscribe(Arc::new(move |_: &BookUpdateEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        book.apply_update(&update(&[(100.0, 1.0)], &[]));
        book.clear_listeners();
        book.apply_update(&update(&[(101.0, 1.0)], &[]));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let book = Arc::new(OrderBook::new("TEST"));
        let mut handles = Vec::new();

        for t in 0..4 {
            let book = Arc::clone(&book);
            handles.push(std::thread::spawn(move || {
                for i in 0..250 {
                    let n = (t * 250 + i) as f64;
                    book.apply_update(&update(&[(100.0 + n, 1.0)], &[(1.0 + n * 0.01, 1.0)]));
                    let _ = book.mid_price();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(book.sequence(), 1000);
        assert_eq!(book.level_counts(), (1000, 1000));
        assert_eq!(book.best_ask(), Some(100.0));
    }
}
