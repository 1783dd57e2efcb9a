// demos/src/bin/execution_schedule.rs
//
// Builds a book, then compares Almgren-Chriss liquidation schedules across
// risk-aversion levels and runs a short paper-trading session against the
// impact-adjusted mid.
//
// Run this demo with:
//   cargo run --bin execution_schedule
//   (from the demos directory)

use orderbook_impact::prelude::*;
use std::sync::Arc;
use tracing::{info, warn};

fn build_book() -> Arc<OrderBook> {
    let book = Arc::new(OrderBook::new("BTC-USDT-SWAP"));
    let asks: Vec<(f64, f64)> = (0..10)
        .map(|i| (64_001.0 + i as f64, 2.0 + i as f64))
        .collect();
    let bids: Vec<(f64, f64)> = (0..10)
        .map(|i| (64_000.0 - i as f64, 2.0 + i as f64))
        .collect();
    match BookUpdate::from_pairs(&asks, &bids) {
        Ok(update) => {
            book.apply_update(&update);
        }
        Err(e) => warn!("invalid levels: {e}"),
    }
    book
}

fn demo_schedules(analyzer: &mut MarketImpactAnalyzer) {
    info!("\n=== Optimal Schedules (Q = 1000, T = 1, N = 5) ===");
    for risk_aversion in [0.1, 1.5, 25.0] {
        analyzer.set_execution_parameters(ExecutionModelParameters {
            risk_aversion,
            ..ExecutionModelParameters::default()
        });
        match analyzer.optimal_execution_strategy(1000.0, Side::Sell, 1.0, 5) {
            Ok(schedule) => {
                let holdings: Vec<String> =
                    schedule.holdings.iter().map(|x| format!("{x:.1}")).collect();
                info!(
                    "lambda {:>5}: kappa {:.4}, holdings [{}], shortfall {:.4} bps",
                    risk_aversion,
                    schedule.kappa,
                    holdings.join(", "),
                    schedule.expected_shortfall_bps
                );
            }
            Err(e) => warn!("lambda {risk_aversion}: {e}"),
        }
    }
}

fn demo_paper_trading(book: Arc<OrderBook>) {
    info!("\n=== Paper Trading ===");
    let mut simulator = TradeSimulator::new(book);
    for (quantity, side) in [(5.0, Side::Buy), (2.5, Side::Buy), (7.5, Side::Sell)] {
        if let Some(trade) = simulator.simulate_trade(quantity, side) {
            info!(
                "{} {} @ {:.2} (impact {:.4}%)",
                trade.side, trade.quantity, trade.execution_price, trade.impact_pct
            );
        }
    }
    info!("Trades: {}, PnL: {:.2}", simulator.trade_count(), simulator.pnl());
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();
    info!("Execution Schedule Demo");

    let book = build_book();
    let mut analyzer = MarketImpactAnalyzer::new(Arc::clone(&book));

    if let Estimate::Value(impact) = analyzer.estimate_market_impact(10.0, Side::Buy) {
        info!(
            "Quick impact for 10: {:.4}% (maker {:.0}%)",
            impact.impact_pct,
            impact.maker_proportion * 100.0
        );
    }
    demo_schedules(&mut analyzer);
    demo_paper_trading(book);
}
