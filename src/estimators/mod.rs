//! Heuristic estimators computed from a book snapshot.
//!
//! Every estimator works on a [`BookSnapshot`](crate::orderbook::BookSnapshot)
//! and reports [`Estimate::NoData`] when the book does not carry enough
//! information, leaving the choice of a neutral value to the caller.

pub mod depth;
pub mod maker_taker;
pub mod slippage;

mod tests;

pub use depth::{DEFAULT_DEPTH_LEVELS, DEFAULT_MARKET_DEPTH, DepthEstimator, DepthProfile};
pub use maker_taker::{
    MAKER_PROPORTION_MAX, MAKER_PROPORTION_MIN, MakerTakerEstimator, NEUTRAL_MAKER_PROPORTION,
};
pub use slippage::{SlippageEstimate, SlippageEstimator};

use serde::{Deserialize, Serialize};

/// Outcome of an estimator: either a value or a marker that the book was too
/// thin (e.g. one side empty) to produce one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Estimate<T> {
    /// The estimator produced a value
    Value(T),
    /// The book did not hold enough data
    NoData,
}

impl<T> Estimate<T> {
    /// Returns the value if one was produced
    pub fn value(self) -> Option<T> {
        match self {
            Estimate::Value(v) => Some(v),
            Estimate::NoData => None,
        }
    }

    /// Whether this is [`Estimate::NoData`]
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, Estimate::NoData)
    }

    /// Returns the value or the given neutral fallback
    pub fn unwrap_or(self, neutral: T) -> T {
        match self {
            Estimate::Value(v) => v,
            Estimate::NoData => neutral,
        }
    }

    /// Maps the contained value, keeping `NoData` as is
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Estimate<U> {
        match self {
            Estimate::Value(v) => Estimate::Value(f(v)),
            Estimate::NoData => Estimate::NoData,
        }
    }
}

impl<T> From<Option<T>> for Estimate<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Estimate::Value(v),
            None => Estimate::NoData,
        }
    }
}
