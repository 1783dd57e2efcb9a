use orderbook_impact::{
    CycleMetrics, EngineConfig, EngineError, MetricsEngine, OrderKind, RawBookUpdate, Side,
    UpdateMode,
};
use std::sync::{Arc, Mutex};

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "asks": [["64012.5", "1.25", "0", "3"], ["64013.0", "0.75", "0", "1"], ["64015.5", "2.0", "0", "4"]],
        "bids": [["64011.0", "0.5", "0", "2"], ["64010.5", "1.5", "0", "5"]]
    }"#;

    const DELTA: &str = r#"{
        "asks": [["64012.5", "0", "0", "0"]],
        "bids": [["64012.0", "0.4", "0", "1"]]
    }"#;

    fn parse(json: &str) -> RawBookUpdate {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_string_feed_records_drive_the_engine() {
        let mut engine = MetricsEngine::new(EngineConfig::default()).unwrap();

        let first = engine.process_update(&parse(SNAPSHOT)).unwrap();
        assert_eq!(first.mid_price, Some((64012.5 + 64011.0) / 2.0));

        let second = engine.process_update(&parse(DELTA)).unwrap();
        assert_eq!(engine.book().best_ask(), Some(64013.0));
        assert_eq!(engine.book().best_bid(), Some(64012.0));
        assert_eq!(second.spread, Some(1.0));
        assert_eq!(second.sequence, 2);
        assert_eq!(engine.book().level_counts(), (2, 3));
    }

    #[test]
    fn test_engine_from_json_config() {
        let config = EngineConfig::from_json(
            r#"{
                "symbol": "ETH-USDT-SWAP",
                "fee_tier": "Tier 2 (0.07%/0.09%)",
                "order_quantity": 500.0,
                "order_kind": "Limit",
                "update_mode": "snapshot_replace"
            }"#,
        )
        .unwrap();
        assert_eq!(config.update_mode, UpdateMode::SnapshotReplace);
        assert_eq!(config.order_kind, OrderKind::Limit);

        let mut engine = MetricsEngine::new(config).unwrap();
        let metrics = engine.process_update(&parse(SNAPSHOT)).unwrap();
        engine.process_update(&parse(DELTA)).unwrap();

        assert!((metrics.fees - 500.0 * 0.0007).abs() < 1e-12);
        assert_eq!(engine.book().level_counts(), (0, 1));
        assert_eq!(engine.book().symbol(), "ETH-USDT-SWAP");
    }

    #[test]
    fn test_malformed_records_are_dropped_between_good_ones() {
        let mut engine = MetricsEngine::new(EngineConfig::default()).unwrap();
        let emitted: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&emitted);
        engine.subscribe(Arc::new(move |m: &CycleMetrics| {
            sink.lock().unwrap().push(m.sequence);
        }));

        let records = [
            SNAPSHOT,
            r#"{"asks": [["64012.5"]], "bids": []}"#,
            r#"{"bids": []}"#,
            r#"{"asks": [["not-a-price", "1"]], "bids": []}"#,
            DELTA,
        ];
        let mut failures = 0;
        for record in records {
            match engine.process_update(&parse(record)) {
                Ok(_) => {}
                Err(EngineError::OrderBook(_)) => failures += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(failures, 3);
        assert_eq!(*emitted.lock().unwrap(), vec![1, 2]);
        assert_eq!(engine.monitor().len(), 2);
        assert_eq!(engine.book().sequence(), 2);
    }

    #[test]
    fn test_latency_report_after_many_cycles() {
        let config = EngineConfig {
            monitor_window: 16,
            order_side: Side::Sell,
            ..EngineConfig::default()
        };
        let mut engine = MetricsEngine::new(config).unwrap();

        for i in 0..40 {
            let bump = i as f64;
            let update = RawBookUpdate::from_pairs(&[(100.0 + bump, 1.0)], &[(99.0, 1.0 + bump)]);
            engine.process_update(&update).unwrap();
        }

        let stats = engine.monitor().get_statistics().unwrap();
        assert_eq!(stats.samples, 16);
        assert!(stats.end_to_end.min <= stats.end_to_end.median);
        assert!(stats.end_to_end.median <= stats.end_to_end.p95);
        assert!(stats.end_to_end.p95 <= stats.end_to_end.p99);
        assert!(stats.end_to_end.p99 <= stats.end_to_end.max);
        assert!(engine.check_latency().is_some());
    }
}
