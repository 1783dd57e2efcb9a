use orderbook_impact::{BookUpdate, LevelDelta, OrderBook, UpdateMode};
use proptest::prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    /// Prices on a 0.5 grid so that deltas frequently hit existing levels
    fn delta() -> impl Strategy<Value = (f64, f64)> {
        (1u32..400, -2i32..20).prop_map(|(tick, qty)| (tick as f64 * 0.5, qty as f64))
    }

    fn update() -> impl Strategy<Value = BookUpdate> {
        (
            prop::collection::vec(delta(), 0..12),
            prop::collection::vec(delta(), 0..12),
        )
            .prop_map(|(asks, bids)| {
                let to_deltas = |levels: Vec<(f64, f64)>| {
                    levels
                        .into_iter()
                        .map(|(p, q)| LevelDelta { price: p, quantity: q })
                        .collect::<Vec<_>>()
                };
                BookUpdate {
                    asks: to_deltas(asks),
                    bids: to_deltas(bids),
                }
            })
    }

    fn assert_invariants(book: &OrderBook) {
        let asks = book.asks_sorted();
        let bids = book.bids_sorted();

        assert!(asks.iter().all(|l| l.price > 0.0 && l.quantity > 0.0));
        assert!(bids.iter().all(|l| l.price > 0.0 && l.quantity > 0.0));
        assert!(asks.windows(2).all(|w| w[0].price < w[1].price));
        assert!(bids.windows(2).all(|w| w[0].price > w[1].price));
        assert_eq!(book.best_ask(), asks.first().map(|l| l.price));
        assert_eq!(book.best_bid(), bids.first().map(|l| l.price));
    }

    proptest! {
        #[test]
        fn delta_merge_keeps_book_consistent(updates in prop::collection::vec(update(), 1..20)) {
            let book = OrderBook::new("PROP");
            for u in &updates {
                book.apply(u, UpdateMode::DeltaMerge);
                assert_invariants(&book);
            }
            prop_assert_eq!(book.sequence(), updates.len() as u64);
        }

        #[test]
        fn last_delta_per_price_wins(updates in prop::collection::vec(update(), 1..10)) {
            let book = OrderBook::new("PROP");
            let mut expected = std::collections::BTreeMap::<u64, f64>::new();
            for u in &updates {
                book.apply_update(u);
                for d in &u.asks {
                    let key = (d.price * 2.0) as u64;
                    if d.quantity > 0.0 {
                        expected.insert(key, d.quantity);
                    } else {
                        expected.remove(&key);
                    }
                }
            }

            let asks = book.asks_sorted();
            prop_assert_eq!(asks.len(), expected.len());
            for (level, (key, qty)) in asks.iter().zip(expected.iter()) {
                prop_assert_eq!(level.price, *key as f64 / 2.0);
                prop_assert_eq!(level.quantity, *qty);
            }
        }

        #[test]
        fn snapshot_replace_matches_last_update(updates in prop::collection::vec(update(), 1..10)) {
            let book = OrderBook::new("PROP");
            for u in &updates {
                book.apply(u, UpdateMode::SnapshotReplace);
                assert_invariants(&book);
            }

            let Some(last) = updates.last() else {
                return Ok(());
            };
            let fresh = OrderBook::new("PROP");
            fresh.apply_update(last);
            prop_assert_eq!(book.asks_sorted(), fresh.asks_sorted());
            prop_assert_eq!(book.bids_sorted(), fresh.bids_sorted());
        }

        #[test]
        fn mid_lies_between_best_prices(updates in prop::collection::vec(update(), 1..10)) {
            let book = OrderBook::new("PROP");
            for u in &updates {
                book.apply_update(u);
            }

            match (book.best_bid(), book.best_ask(), book.mid_price()) {
                (Some(bid), Some(ask), Some(mid)) => {
                    prop_assert!(mid >= bid.min(ask) && mid <= bid.max(ask));
                    prop_assert_eq!(book.spread(), Some(ask - bid));
                }
                (_, _, mid) => prop_assert!(mid.is_none()),
            }
        }
    }

    #[test]
    fn test_concurrent_readers_see_consistent_books() {
        use std::sync::Arc;
        use std::thread;

        let book = Arc::new(OrderBook::new("CONC"));
        let writer = {
            let book = Arc::clone(&book);
            thread::spawn(move || {
                for n in 0..500 {
                    let price = 1.0 + n as f64 * 0.01;
                    let update = BookUpdate::from_pairs(&[(price + 10.0, 1.0)], &[(price, 1.0)])
                        .unwrap();
                    book.apply_update(&update);
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let book = Arc::clone(&book);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let snapshot = book.snapshot();
                        assert!(snapshot.asks.windows(2).all(|w| w[0].price < w[1].price));
                        assert!(snapshot.bids.windows(2).all(|w| w[0].price > w[1].price));
                        assert_eq!(snapshot.asks.len(), snapshot.bids.len());
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(book.level_counts(), (500, 500));
    }
}
