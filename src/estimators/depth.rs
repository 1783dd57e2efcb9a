//! Dollar depth over the top levels of the book

use crate::orderbook::{BookSnapshot, PriceLevel};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Number of levels per side summed by default
pub const DEFAULT_DEPTH_LEVELS: usize = 10;

/// Depth used when the book has no levels at all
pub const DEFAULT_MARKET_DEPTH: f64 = 1_000_000.0;

/// Notional resting on each side of the book, over the top `levels` levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthProfile {
    /// Sum of `price * quantity` over the top ask levels
    pub ask_depth: f64,
    /// Sum of `price * quantity` over the top bid levels
    pub bid_depth: f64,
    /// Average of the two sides, or the configured default for an empty book
    pub depth: f64,
    /// True when `depth` is the configured default rather than a measurement
    pub is_fallback: bool,
}

impl DepthProfile {
    /// Ratio of the thinner side to the thicker side, in `[0, 1]`.
    ///
    /// `None` when either side carries no depth.
    pub fn imbalance(&self) -> Option<f64> {
        if self.ask_depth <= 0.0 || self.bid_depth <= 0.0 {
            return None;
        }
        Some(self.ask_depth.min(self.bid_depth) / self.ask_depth.max(self.bid_depth))
    }
}

/// Sums notional over the top `levels` levels of each side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthEstimator {
    /// Levels per side to include
    pub levels: usize,
    /// Depth reported when both sides are empty
    pub default_depth: f64,
}

impl Default for DepthEstimator {
    fn default() -> Self {
        Self {
            levels: DEFAULT_DEPTH_LEVELS,
            default_depth: DEFAULT_MARKET_DEPTH,
        }
    }
}

fn notional(levels: &[PriceLevel]) -> f64 {
    levels.iter().map(PriceLevel::notional).sum()
}

impl DepthEstimator {
    /// Creates an estimator over `levels` levels with the given fallback depth
    #[must_use]
    pub fn new(levels: usize, default_depth: f64) -> Self {
        Self {
            levels,
            default_depth,
        }
    }

    /// Measures depth on a snapshot.
    ///
    /// Sides shallower than `levels` are summed as they are. An entirely
    /// empty book yields `default_depth` with `is_fallback` set.
    pub fn estimate(&self, snapshot: &BookSnapshot) -> DepthProfile {
        if snapshot.is_empty() {
            trace!("depth: empty book, using default {}", self.default_depth);
            return DepthProfile {
                ask_depth: 0.0,
                bid_depth: 0.0,
                depth: self.default_depth,
                is_fallback: true,
            };
        }

        let ask_depth = notional(snapshot.top_asks(self.levels));
        let bid_depth = notional(snapshot.top_bids(self.levels));
        let depth = (ask_depth + bid_depth) / 2.0;
        trace!("depth: asks {ask_depth}, bids {bid_depth}, working {depth}");

        DepthProfile {
            ask_depth,
            bid_depth,
            depth,
            is_fallback: false,
        }
    }
}
