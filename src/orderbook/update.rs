//! Book update records: the raw shape delivered by a feed connector and the
//! validated shape the book applies.

use super::error::OrderBookError;
use super::level::Side;
use serde::{Deserialize, Serialize};

/// A single price or quantity as it arrives from a feed: either a JSON number
/// or a decimal string such as `"64012.5"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedValue {
    /// Numeric value
    Number(f64),
    /// Decimal string value
    Text(String),
}

impl FeedValue {
    /// Parses the value into a float.
    pub fn as_f64(&self) -> Result<f64, String> {
        match self {
            FeedValue::Number(n) => Ok(*n),
            FeedValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("cannot parse {s:?} as a number: {e}")),
        }
    }
}

impl From<f64> for FeedValue {
    fn from(value: f64) -> Self {
        FeedValue::Number(value)
    }
}

impl From<&str> for FeedValue {
    fn from(value: &str) -> Self {
        FeedValue::Text(value.to_string())
    }
}

/// A book-update record exactly as handed over by the feed connector.
///
/// Each level is an array whose first two entries are price and quantity;
/// trailing entries (order counts, liquidation flags) are ignored. A missing
/// `asks` or `bids` field makes the record malformed, while an empty array
/// means "no change on that side".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBookUpdate {
    /// Ask level deltas
    #[serde(default)]
    pub asks: Option<Vec<Vec<FeedValue>>>,
    /// Bid level deltas
    #[serde(default)]
    pub bids: Option<Vec<Vec<FeedValue>>>,
}

impl RawBookUpdate {
    /// Builds a raw record from numeric pairs, mostly useful for tests and demos.
    #[must_use]
    pub fn from_pairs(asks: &[(f64, f64)], bids: &[(f64, f64)]) -> Self {
        let to_raw = |levels: &[(f64, f64)]| {
            levels
                .iter()
                .map(|(p, q)| vec![FeedValue::Number(*p), FeedValue::Number(*q)])
                .collect::<Vec<_>>()
        };
        Self {
            asks: Some(to_raw(asks)),
            bids: Some(to_raw(bids)),
        }
    }
}

/// One validated price/quantity delta. A quantity `<= 0` removes the level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelDelta {
    /// Level price, finite and strictly positive
    pub price: f64,
    /// New quantity at the price; zero or negative removes the level
    pub quantity: f64,
}

impl LevelDelta {
    /// Creates a validated delta
    ///
    /// # Errors
    /// Returns [`OrderBookError::InvalidLevel`] when the price is not a finite
    /// positive number or the quantity is not finite.
    pub fn new(price: f64, quantity: f64) -> Result<Self, OrderBookError> {
        if !price.is_finite() || price <= 0.0 || !quantity.is_finite() {
            return Err(OrderBookError::InvalidLevel { price, quantity });
        }
        Ok(Self { price, quantity })
    }

    /// Whether this delta removes its level
    #[inline]
    #[must_use]
    pub fn is_removal(&self) -> bool {
        self.quantity <= 0.0
    }
}

/// A validated update for both sides of the book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookUpdate {
    /// Ask deltas in feed order
    pub asks: Vec<LevelDelta>,
    /// Bid deltas in feed order
    pub bids: Vec<LevelDelta>,
}

impl BookUpdate {
    /// Builds an update from numeric pairs
    ///
    /// # Errors
    /// Returns [`OrderBookError::InvalidLevel`] for the first invalid pair.
    pub fn from_pairs(asks: &[(f64, f64)], bids: &[(f64, f64)]) -> Result<Self, OrderBookError> {
        let convert = |levels: &[(f64, f64)]| {
            levels
                .iter()
                .map(|(p, q)| LevelDelta::new(*p, *q))
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(Self {
            asks: convert(asks)?,
            bids: convert(bids)?,
        })
    }

    /// Total number of deltas across both sides
    #[must_use]
    pub fn len(&self) -> usize {
        self.asks.len() + self.bids.len()
    }

    /// True when neither side carries a delta
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }
}

fn convert_side(side: Side, levels: &[Vec<FeedValue>]) -> Result<Vec<LevelDelta>, OrderBookError> {
    let malformed = |index: usize, reason: String| OrderBookError::MalformedInput {
        side,
        index,
        reason,
    };

    levels
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let (price, quantity) = match entry.as_slice() {
                [price, quantity, ..] => (price, quantity),
                _ => {
                    return Err(malformed(
                        index,
                        format!("expected [price, quantity], got {} values", entry.len()),
                    ));
                }
            };
            let price = price.as_f64().map_err(|r| malformed(index, r))?;
            let quantity = quantity.as_f64().map_err(|r| malformed(index, r))?;
            LevelDelta::new(price, quantity).map_err(|e| malformed(index, e.to_string()))
        })
        .collect()
}

impl TryFrom<&RawBookUpdate> for BookUpdate {
    type Error = OrderBookError;

    fn try_from(raw: &RawBookUpdate) -> Result<Self, Self::Error> {
        let asks = raw
            .asks
            .as_deref()
            .ok_or(OrderBookError::MissingField { field: "asks" })?;
        let bids = raw
            .bids
            .as_deref()
            .ok_or(OrderBookError::MissingField { field: "bids" })?;

        Ok(Self {
            asks: convert_side(Side::Sell, asks)?,
            bids: convert_side(Side::Buy, bids)?,
        })
    }
}

impl TryFrom<RawBookUpdate> for BookUpdate {
    type Error = OrderBookError;

    fn try_from(raw: RawBookUpdate) -> Result<Self, Self::Error> {
        BookUpdate::try_from(&raw)
    }
}

/// How an incoming update is merged into the book.
///
/// The feed contract (incremental deltas vs. full snapshots) is not something
/// the book can infer, so it is chosen explicitly in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Each record carries changes relative to the previous state
    #[default]
    DeltaMerge,
    /// Each record is a complete book; absent prices are dropped
    SnapshotReplace,
}
