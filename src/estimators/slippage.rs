//! Slippage estimates in basis points

use super::Estimate;
use super::depth::DepthEstimator;
use crate::orderbook::BookSnapshot;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Default base slippage, as a fraction of price
pub const DEFAULT_BASE_SLIPPAGE: f64 = 0.0001;

/// Default order size the linear estimate is scaled to
pub const DEFAULT_REFERENCE_SIZE: f64 = 100.0;

/// The two slippage figures derived from the book, in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlippageEstimate {
    /// Depth-proportional estimate
    pub linear_bps: f64,
    /// Estimate including the relative spread
    pub spread_bps: f64,
}

impl SlippageEstimate {
    /// Neutral value used when the book is one-sided
    pub const ZERO: SlippageEstimate = SlippageEstimate {
        linear_bps: 0.0,
        spread_bps: 0.0,
    };

    /// The larger of the two estimates
    #[must_use]
    pub fn conservative_bps(&self) -> f64 {
        self.linear_bps.max(self.spread_bps)
    }
}

/// Predicts slippage from depth and top-of-book spread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlippageEstimator {
    /// Base slippage as a fraction of price
    pub base_slippage: f64,
    /// Order size used to scale the linear estimate
    pub reference_size: f64,
    /// Depth measurement used by the linear estimate
    pub depth: DepthEstimator,
}

impl Default for SlippageEstimator {
    fn default() -> Self {
        Self {
            base_slippage: DEFAULT_BASE_SLIPPAGE,
            reference_size: DEFAULT_REFERENCE_SIZE,
            depth: DepthEstimator::default(),
        }
    }
}

impl SlippageEstimator {
    /// Creates an estimator with the given base slippage and depth settings
    #[must_use]
    pub fn new(base_slippage: f64, reference_size: f64, depth: DepthEstimator) -> Self {
        Self {
            base_slippage,
            reference_size,
            depth,
        }
    }

    /// Slippage for a given quantity against a known depth, as a fraction
    pub fn estimate(&self, quantity: f64, market_depth: f64) -> Estimate<f64> {
        if market_depth <= 0.0 || !market_depth.is_finite() {
            return Estimate::NoData;
        }
        Estimate::Value(self.base_slippage * (quantity / market_depth))
    }

    /// Computes both estimates on a snapshot.
    ///
    /// Returns [`Estimate::NoData`] when either side of the book is empty.
    pub fn predict(&self, snapshot: &BookSnapshot) -> Estimate<SlippageEstimate> {
        let (Some(mid), Some(spread)) = (snapshot.mid_price(), snapshot.spread()) else {
            return Estimate::NoData;
        };
        let profile = self.depth.estimate(snapshot);
        if profile.depth <= 0.0 || mid <= 0.0 {
            return Estimate::NoData;
        }

        let linear_bps = self.base_slippage * (self.reference_size / profile.depth) * 10_000.0;
        let spread_bps = (self.base_slippage + spread / mid) * 10_000.0;
        trace!("slippage: linear {linear_bps} bps, spread {spread_bps} bps");

        Estimate::Value(SlippageEstimate {
            linear_bps,
            spread_bps,
        })
    }
}
