// demos/src/bin/live_metrics.rs
//
// Feeds a synthetic depth stream through a metrics engine running on a
// Tokio task, printing every emitted metrics record and a latency report at
// the end.
//
// The stream starts with a full book and then sends small random-walk deltas,
// the way a swap depth channel would after its initial snapshot.
//
// Run this demo with:
//   cargo run --bin live_metrics
//   (from the demos directory)

use orderbook_impact::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const UPDATES: usize = 200;

/// Deterministic pseudo-random walk so runs are reproducible
struct Walk {
    state: u64,
}

impl Walk {
    fn next(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.state >> 11) as f64) / ((1u64 << 53) as f64)
    }
}

fn initial_book(mid: f64) -> RawBookUpdate {
    let asks: Vec<(f64, f64)> = (0..20)
        .map(|i| (mid + 0.5 + i as f64 * 0.5, 1.0 + i as f64 * 0.25))
        .collect();
    let bids: Vec<(f64, f64)> = (0..20)
        .map(|i| (mid - 0.5 - i as f64 * 0.5, 1.0 + i as f64 * 0.25))
        .collect();
    RawBookUpdate::from_pairs(&asks, &bids)
}

/// One delta around the current mid: refreshes the touch and removes a stale level
fn next_delta(walk: &mut Walk, mid: &mut f64) -> RawBookUpdate {
    let step = (walk.next() - 0.5).round() * 0.5;
    *mid += step;
    let size = 0.5 + walk.next() * 3.0;
    let (ask, bid) = (*mid + 0.5, *mid - 0.5);

    // plain JSON with string values, as a feed connector would hand it over
    let record = format!(
        r#"{{"asks": [["{ask}", "{size}", "0", "2"], ["{stale_ask}", "0", "0", "0"]],
            "bids": [["{bid}", "{size}", "0", "3"], ["{stale_bid}", "0", "0", "0"]]}}"#,
        stale_ask = ask + 10.0,
        stale_bid = bid - 10.0,
    );
    serde_json::from_str(&record).unwrap_or_default()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();
    info!("Live Metrics Demo");

    let config = EngineConfig {
        order_quantity: 250.0,
        statistics_log_interval: 50,
        ..EngineConfig::default()
    };

    let mut engine = match MetricsEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            warn!("cannot build engine: {e}");
            return;
        }
    };
    engine.subscribe(Arc::new(|m: &CycleMetrics| {
        if m.sequence % 20 == 0 {
            info!(
                "#{:<4} mid {:>10.2?} slippage {:>8.4} bps  fees {:>6.3}  impact {:>8.4}%  maker {:>5.1}%  net {:>8.3}  e2e {:.3} ms",
                m.sequence,
                m.mid_price,
                m.slippage_bps,
                m.fees,
                m.market_impact_pct,
                m.maker_proportion_pct,
                m.net_cost,
                m.latency.end_to_end_ms
            );
        }
    }));
    let monitor = Arc::clone(engine.monitor());

    let driver = EngineDriverTokio::start(engine);
    let mut mid = 64_000.0;
    let mut walk = Walk { state: 42 };

    if let Err(e) = driver.submit(initial_book(mid)) {
        warn!("submit failed: {e}");
    }
    for _ in 0..UPDATES {
        if let Err(e) = driver.submit(next_delta(&mut walk, &mut mid)) {
            warn!("submit failed: {e}");
            break;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    let Some(engine) = driver.shutdown().await else {
        warn!("engine task did not finish cleanly");
        return;
    };

    info!("\n=== Final State ===");
    info!("Cycles: {}", engine.cycles());
    info!("Best bid/ask: {:?} / {:?}", engine.book().best_bid(), engine.book().best_ask());
    monitor.log_statistics();
    if let Some(report) = engine.check_latency() {
        info!("Latency ceilings met: {}", report.all_passed());
    }
}
