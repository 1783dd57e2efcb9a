//! Expected maker share of an order

use super::Estimate;
use super::depth::DepthEstimator;
use crate::orderbook::BookSnapshot;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Lower bound of the maker proportion
pub const MAKER_PROPORTION_MIN: f64 = 0.2;

/// Upper bound of the maker proportion
pub const MAKER_PROPORTION_MAX: f64 = 0.8;

/// Maker proportion reported when the book is one-sided
pub const NEUTRAL_MAKER_PROPORTION: f64 = 0.5;

/// Predicts the fraction of an order that fills passively.
///
/// `maker = 0.5 + (relative_spread * 10) * imbalance`, always clamped to
/// `[MAKER_PROPORTION_MIN, MAKER_PROPORTION_MAX]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MakerTakerEstimator {
    /// Depth measurement used for the imbalance term
    pub depth: DepthEstimator,
}

impl MakerTakerEstimator {
    /// Creates an estimator using the given depth settings
    #[must_use]
    pub fn new(depth: DepthEstimator) -> Self {
        Self { depth }
    }

    /// Maker proportion in `[0.2, 0.8]`, or `NoData` for a one-sided book
    pub fn predict(&self, snapshot: &BookSnapshot) -> Estimate<f64> {
        let Some(relative_spread) = snapshot.relative_spread() else {
            return Estimate::NoData;
        };
        let Some(imbalance) = self.depth.estimate(snapshot).imbalance() else {
            return Estimate::NoData;
        };

        let raw = NEUTRAL_MAKER_PROPORTION + (relative_spread * 10.0) * imbalance;
        // NaN from a degenerate book falls back to neutral before clamping
        let maker = if raw.is_finite() {
            raw.clamp(MAKER_PROPORTION_MIN, MAKER_PROPORTION_MAX)
        } else {
            NEUTRAL_MAKER_PROPORTION
        };
        trace!("maker/taker: spread {relative_spread}, imbalance {imbalance}, maker {maker}");

        Estimate::Value(maker)
    }

    /// Maker proportion with `NoData` mapped to the neutral 0.5
    pub fn predict_or_neutral(&self, snapshot: &BookSnapshot) -> f64 {
        self.predict(snapshot).unwrap_or(NEUTRAL_MAKER_PROPORTION)
    }
}
