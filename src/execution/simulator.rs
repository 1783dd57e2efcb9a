//! Paper trading against the impact model

use super::analyzer::{ImpactEstimate, MarketImpactAnalyzer};
use crate::orderbook::{OrderBook, Side};
use crate::utils::current_time_millis;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};
use uuid::Uuid;

/// A trade filled by the simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedTrade {
    /// Unique trade id
    pub id: Uuid,
    /// Fill time, milliseconds since epoch
    pub timestamp: u64,
    /// Direction of the trade
    pub side: Side,
    /// Filled quantity
    pub quantity: f64,
    /// Mid price moved against the trade by the estimated impact
    pub execution_price: f64,
    /// Impact applied to the mid, in percent
    pub impact_pct: f64,
    /// Estimated impact cost, `impact_pct * quantity / 100`
    pub cost: f64,
}

impl SimulatedTrade {
    /// `execution_price * quantity`
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.execution_price * self.quantity
    }
}

/// Applies estimated impact to the current mid and keeps a cash-flow ledger
/// of the resulting fills.
#[derive(Debug)]
pub struct TradeSimulator {
    analyzer: MarketImpactAnalyzer,
    trades: Vec<SimulatedTrade>,
    pnl: f64,
}

impl TradeSimulator {
    /// Creates a simulator with a default analyzer over `book`
    pub fn new(book: Arc<OrderBook>) -> Self {
        Self::with_analyzer(MarketImpactAnalyzer::new(book))
    }

    /// Creates a simulator using the given analyzer
    pub fn with_analyzer(analyzer: MarketImpactAnalyzer) -> Self {
        Self {
            analyzer,
            trades: Vec::new(),
            pnl: 0.0,
        }
    }

    /// The analyzer used for impact estimates
    pub fn analyzer(&self) -> &MarketImpactAnalyzer {
        &self.analyzer
    }

    /// Mutable access to the analyzer, e.g. to refresh market parameters
    pub fn analyzer_mut(&mut self) -> &mut MarketImpactAnalyzer {
        &mut self.analyzer
    }

    /// Fills `quantity` at the mid moved by the estimated impact.
    ///
    /// Returns `None` without recording anything while the book has no mid.
    pub fn simulate_trade(&mut self, quantity: f64, side: Side) -> Option<SimulatedTrade> {
        let Some(mid) = self.analyzer.book().mid_price() else {
            trace!("simulate_trade: no mid price, book not warm");
            return None;
        };

        let impact = self
            .analyzer
            .estimate_market_impact(quantity, side)
            .unwrap_or(ImpactEstimate::NEUTRAL);
        let execution_price = match side {
            Side::Buy => mid * (1.0 + impact.impact_pct / 100.0),
            Side::Sell => mid * (1.0 - impact.impact_pct / 100.0),
        };

        let trade = SimulatedTrade {
            id: Uuid::new_v4(),
            timestamp: current_time_millis(),
            side,
            quantity,
            execution_price,
            impact_pct: impact.impact_pct,
            cost: impact.estimated_cost,
        };

        match side {
            Side::Buy => self.pnl -= trade.notional(),
            Side::Sell => self.pnl += trade.notional(),
        }
        debug!(
            "simulated {} {} @ {} (impact {}%), pnl {}",
            side, quantity, execution_price, impact.impact_pct, self.pnl
        );

        self.trades.push(trade.clone());
        Some(trade)
    }

    /// Every simulated trade, oldest first
    pub fn trades(&self) -> &[SimulatedTrade] {
        &self.trades
    }

    /// Running cash flow: notional received on sells minus notional paid on buys
    pub fn pnl(&self) -> f64 {
        self.pnl
    }

    /// Number of simulated trades
    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    /// Clears the trade history and the PnL
    pub fn reset(&mut self) {
        self.trades.clear();
        self.pnl = 0.0;
    }
}
