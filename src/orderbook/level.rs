//! Price keys, book sides and price levels

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Side of the book, or direction of a trade.
///
/// Bids rest on the `Buy` side, asks on the `Sell` side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy side (bids) or a buy trade
    Buy,
    /// Sell side (asks) or a sell trade
    Sell,
}

impl Side {
    /// Returns the opposite side
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Name of the book side holding resting interest for this side
    #[must_use]
    pub fn book_side_name(self) -> &'static str {
        match self {
            Side::Buy => "bids",
            Side::Sell => "asks",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" | "bid" => Ok(Side::Buy),
            "sell" | "ask" => Ok(Side::Sell),
            other => Err(format!("unknown side: {other}")),
        }
    }
}

/// Totally ordered wrapper around a finite price, used as the book map key.
///
/// Construction goes through [`PriceKey::new`], which rejects NaN and
/// infinities, so the `total_cmp` ordering agrees with numeric ordering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceKey(f64);

impl PriceKey {
    /// Wraps a finite price. Returns `None` for NaN or infinite values.
    #[must_use]
    pub fn new(price: f64) -> Option<Self> {
        if price.is_finite() {
            // normalise -0.0 so it compares equal to 0.0
            Some(Self(price + 0.0))
        } else {
            None
        }
    }

    /// The wrapped price
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for PriceKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for PriceKey {}

impl PartialOrd for PriceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A resting book level: price and the quantity visible at it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Level price
    pub price: f64,
    /// Quantity resting at this price, always strictly positive inside a book
    pub quantity: f64,
}

impl PriceLevel {
    /// Creates a new level
    #[must_use]
    pub fn new(price: f64, quantity: f64) -> Self {
        Self { price, quantity }
    }

    /// Dollar value of the level (`price * quantity`)
    #[inline]
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.price * self.quantity
    }
}

impl From<(f64, f64)> for PriceLevel {
    fn from((price, quantity): (f64, f64)) -> Self {
        Self { price, quantity }
    }
}
