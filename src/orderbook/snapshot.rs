//! Point-in-time copy of the order book

use super::level::PriceLevel;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A snapshot of the order book state at a specific point in time.
///
/// Snapshots are taken under the book's read lock and then released, so every
/// estimator in the crate works on one of these rather than on the live book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Number of updates applied to the book when the snapshot was taken
    pub sequence: u64,

    /// Timestamp when the snapshot was created (milliseconds since epoch)
    pub timestamp: u64,

    /// Ask levels, best (lowest) price first
    pub asks: Vec<PriceLevel>,

    /// Bid levels, best (highest) price first
    pub bids: Vec<PriceLevel>,
}

impl BookSnapshot {
    /// Builds a snapshot from unsorted level lists, ordering both sides and
    /// dropping levels with non-positive quantity.
    #[must_use]
    pub fn from_levels(mut asks: Vec<PriceLevel>, mut bids: Vec<PriceLevel>) -> Self {
        asks.retain(|l| l.quantity > 0.0);
        bids.retain(|l| l.quantity > 0.0);
        asks.sort_by(|a, b| a.price.total_cmp(&b.price));
        bids.sort_by(|a, b| b.price.total_cmp(&a.price));
        Self {
            sequence: 0,
            timestamp: 0,
            asks,
            bids,
        }
    }

    /// Get the best ask price
    pub fn best_ask(&self) -> Option<f64> {
        let ask = self.asks.first().map(|l| l.price);
        trace!("best_ask: {:?}", ask);
        ask
    }

    /// Get the best bid price
    pub fn best_bid(&self) -> Option<f64> {
        let bid = self.bids.first().map(|l| l.price);
        trace!("best_bid: {:?}", bid);
        bid
    }

    /// Get the mid price (average of best bid and best ask)
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => None,
        }
    }

    /// Get the spread (best ask - best bid). Negative when the book is crossed.
    pub fn spread(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Spread divided by mid price, `None` when undefined or the mid is zero
    pub fn relative_spread(&self) -> Option<f64> {
        let spread = self.spread()?;
        let mid = self.mid_price()?;
        if mid == 0.0 {
            return None;
        }
        Some(spread / mid)
    }

    /// True when both sides carry at least one level
    #[must_use]
    pub fn is_two_sided(&self) -> bool {
        !self.asks.is_empty() && !self.bids.is_empty()
    }

    /// True when both sides are empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }

    /// True when the best bid is at or above the best ask
    #[must_use]
    pub fn is_crossed(&self) -> bool {
        matches!((self.best_bid(), self.best_ask()), (Some(b), Some(a)) if b >= a)
    }

    /// Top `n` ask levels (fewer if the side is shallower)
    #[must_use]
    pub fn top_asks(&self, n: usize) -> &[PriceLevel] {
        &self.asks[..n.min(self.asks.len())]
    }

    /// Top `n` bid levels (fewer if the side is shallower)
    #[must_use]
    pub fn top_bids(&self, n: usize) -> &[PriceLevel] {
        &self.bids[..n.min(self.bids.len())]
    }

    /// Calculate the total quantity on the ask side
    pub fn total_ask_volume(&self) -> f64 {
        self.asks.iter().map(|l| l.quantity).sum()
    }

    /// Calculate the total quantity on the bid side
    pub fn total_bid_volume(&self) -> f64 {
        self.bids.iter().map(|l| l.quantity).sum()
    }
}
