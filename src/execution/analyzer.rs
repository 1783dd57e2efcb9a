//! Market impact analysis over a live order book

use super::almgren_chriss::{AlmgrenChriss, ExecutionModelParameters, ExecutionSchedule};
use super::error::ExecutionError;
use crate::estimators::{DepthEstimator, Estimate};
use crate::orderbook::{OrderBook, Side};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

/// Daily volatility assumed until market parameters are set explicitly
pub const DEFAULT_VOLATILITY: f64 = 0.03;

/// Daily volume assumed until market parameters are set explicitly
pub const DEFAULT_VOLUME: f64 = 5000.0;

/// Conditions the impact formulas are evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketParameters {
    /// Volatility as a fraction per day
    pub volatility: f64,
    /// Traded volume per day, in base units
    pub volume: f64,
    /// Typical trade size, `volume / 1000`
    pub avg_trade_size: f64,
    /// Dollar depth measured on the book, or the configured default
    pub market_depth: f64,
}

impl MarketParameters {
    /// Derives the average trade size from `volume`
    #[must_use]
    pub fn new(volatility: f64, volume: f64, market_depth: f64) -> Self {
        Self {
            volatility,
            volume,
            avg_trade_size: volume / 1000.0,
            market_depth,
        }
    }
}

/// Result of the quick impact path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactEstimate {
    /// Price impact in percent
    pub impact_pct: f64,
    /// Expected passive share of the order, at least 0.2
    pub maker_proportion: f64,
    /// `1 - maker_proportion`
    pub taker_proportion: f64,
    /// `impact_pct * quantity / 100`
    pub estimated_cost: f64,
}

impl ImpactEstimate {
    /// Value reported when depth is unknown
    pub const NEUTRAL: ImpactEstimate = ImpactEstimate {
        impact_pct: 0.0,
        maker_proportion: 0.5,
        taker_proportion: 0.5,
        estimated_cost: 0.0,
    };
}

/// Answers "what does executing this quantity cost right now" against a
/// shared order book.
#[derive(Debug)]
pub struct MarketImpactAnalyzer {
    book: Arc<OrderBook>,
    depth: DepthEstimator,
    default_volatility: f64,
    default_volume: f64,
    market: Option<MarketParameters>,
    model: AlmgrenChriss,
}

impl MarketImpactAnalyzer {
    /// Creates an analyzer with default depth, market and model settings
    pub fn new(book: Arc<OrderBook>) -> Self {
        Self::with_settings(
            book,
            DepthEstimator::default(),
            DEFAULT_VOLATILITY,
            DEFAULT_VOLUME,
            ExecutionModelParameters::default(),
        )
    }

    /// Creates an analyzer with explicit settings
    pub fn with_settings(
        book: Arc<OrderBook>,
        depth: DepthEstimator,
        default_volatility: f64,
        default_volume: f64,
        execution: ExecutionModelParameters,
    ) -> Self {
        Self {
            book,
            depth,
            default_volatility,
            default_volume,
            market: None,
            model: AlmgrenChriss::new(execution),
        }
    }

    /// The book this analyzer reads
    pub fn book(&self) -> &Arc<OrderBook> {
        &self.book
    }

    /// The execution model and its current parameters
    pub fn execution_model(&self) -> &AlmgrenChriss {
        &self.model
    }

    /// Replaces the execution model parameters
    pub fn set_execution_parameters(&mut self, params: ExecutionModelParameters) {
        self.model.set_parameters(params);
    }

    /// Market parameters last computed, if any
    pub fn current_market_parameters(&self) -> Option<&MarketParameters> {
        self.market.as_ref()
    }

    /// Recomputes market parameters, measuring depth on a fresh snapshot
    pub fn update_market_parameters(&mut self, volatility: f64, volume: f64) -> MarketParameters {
        let profile = self.depth.estimate(&self.book.snapshot());
        let params = MarketParameters::new(volatility, volume, profile.depth);
        debug!(
            "{}: market parameters updated: volatility {}, volume {}, depth {}{}",
            self.book.symbol(),
            params.volatility,
            params.volume,
            params.market_depth,
            if profile.is_fallback { " (default)" } else { "" }
        );
        self.market = Some(params);
        params
    }

    fn market_parameters(&mut self) -> MarketParameters {
        match self.market {
            Some(params) => params,
            None => self.update_market_parameters(self.default_volatility, self.default_volume),
        }
    }

    /// Quick impact estimate for executing `quantity` now.
    ///
    /// Returns `NoData` when the measured depth is zero; callers usually map
    /// that to [`ImpactEstimate::NEUTRAL`].
    pub fn estimate_market_impact(
        &mut self,
        quantity: f64,
        side: Side,
    ) -> Estimate<ImpactEstimate> {
        let market = self.market_parameters();
        if market.market_depth <= 0.0 || market.avg_trade_size <= 0.0 {
            return Estimate::NoData;
        }

        let impact_pct =
            (quantity / market.market_depth) * 100.0 * (1.0 + market.volatility * 2.0);
        let maker_proportion = (1.0 - (quantity / market.avg_trade_size) * 0.1).max(0.2);
        let estimate = ImpactEstimate {
            impact_pct,
            maker_proportion,
            taker_proportion: 1.0 - maker_proportion,
            estimated_cost: impact_pct * quantity / 100.0,
        };
        trace!("impact for {side} {quantity}: {estimate:?}");

        Estimate::Value(estimate)
    }

    /// Quick slippage estimate in basis points:
    /// `(quantity / depth) * 10000 * (1 + volatility * 100)`
    pub fn estimate_slippage(&mut self, quantity: f64, side: Side) -> Estimate<f64> {
        let market = self.market_parameters();
        if market.market_depth <= 0.0 {
            return Estimate::NoData;
        }
        let slippage =
            (quantity / market.market_depth) * 10_000.0 * (1.0 + market.volatility * 100.0);
        trace!("slippage for {side} {quantity}: {slippage} bps");
        Estimate::Value(slippage)
    }

    /// Optimal schedule for `quantity` with the arrival price set to the
    /// current mid (zero while the book is one-sided).
    ///
    /// # Errors
    /// [`ExecutionError::InvalidParameters`] for invalid horizon, period
    /// count or model parameters.
    pub fn optimal_execution_strategy(
        &mut self,
        quantity: f64,
        side: Side,
        horizon: f64,
        periods: usize,
    ) -> Result<ExecutionSchedule, ExecutionError> {
        let mid = self.book.mid_price();
        trace!("optimal execution for {side} {quantity} at mid {mid:?}");
        self.schedule_at_price(quantity, horizon, periods, mid)
    }

    /// Optimal schedule using an arrival price the caller already holds,
    /// e.g. the mid of a snapshot taken for the current cycle.
    ///
    /// # Errors
    /// Same as [`Self::optimal_execution_strategy`].
    pub fn schedule_at_price(
        &mut self,
        quantity: f64,
        horizon: f64,
        periods: usize,
        arrival_price: Option<f64>,
    ) -> Result<ExecutionSchedule, ExecutionError> {
        self.model.set_initial_price(arrival_price.unwrap_or(0.0));
        self.model.optimal_schedule(quantity, horizon, periods)
    }
}
