//! Per-cycle output record of the metrics engine

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Flags for selecting which metrics the engine computes every cycle
    ///
    /// Metrics left out are reported as zero, which keeps the cycle cheaper
    /// when a consumer only displays part of the record.
    ///
    /// # Examples
    /// ```
    /// use orderbook_impact::MetricFlags;
    ///
    /// // Only slippage and fees
    /// let flags = MetricFlags::SLIPPAGE | MetricFlags::FEES;
    /// assert!(!flags.contains(MetricFlags::NET_COST));
    ///
    /// // Everything
    /// let flags = MetricFlags::ALL;
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MetricFlags: u32 {
        /// Conservative slippage from the book
        const SLIPPAGE = 1 << 0;

        /// Exchange fees for the configured order
        const FEES = 1 << 1;

        /// Almgren-Chriss expected shortfall
        const MARKET_IMPACT = 1 << 2;

        /// Maker share of the order
        const MAKER_TAKER = 1 << 3;

        /// Slippage, impact and fees combined
        const NET_COST = 1 << 4;

        /// Calculate all metrics
        const ALL = Self::SLIPPAGE.bits() | Self::FEES.bits() | Self::MARKET_IMPACT.bits()
                  | Self::MAKER_TAKER.bits() | Self::NET_COST.bits();
    }
}

impl Default for MetricFlags {
    fn default() -> Self {
        MetricFlags::ALL
    }
}

/// Mean stage latencies of the monitor window when the record was emitted,
/// in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    /// Mean end-to-end cycle time
    pub end_to_end_ms: f64,
    /// Mean time to parse and apply an update
    pub data_processing_ms: f64,
    /// Mean time until metrics were published
    pub ui_update_ms: f64,
}

/// Metrics computed for one book update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleMetrics {
    /// Book sequence number after the update
    pub sequence: u64,
    /// Emission time, milliseconds since epoch
    pub timestamp: u64,
    /// Mid price, `None` while the book is one-sided
    pub mid_price: Option<f64>,
    /// Spread, `None` while the book is one-sided
    pub spread: Option<f64>,
    /// Expected slippage in basis points
    pub slippage_bps: f64,
    /// Expected fees in quote currency
    pub fees: f64,
    /// Expected market impact in percent
    pub market_impact_pct: f64,
    /// Slippage, impact and fees in quote currency
    pub net_cost: f64,
    /// Maker share of the order in percent
    pub maker_proportion_pct: f64,
    /// Pipeline latency
    pub latency: LatencySummary,
    /// True when a book-derived figure fell back to its neutral value
    pub no_data: bool,
}

impl CycleMetrics {
    /// Taker share of the order in percent
    #[must_use]
    pub fn taker_proportion_pct(&self) -> f64 {
        100.0 - self.maker_proportion_pct
    }

    /// Serializes the record as a JSON object
    ///
    /// # Errors
    /// Returns the serializer error, which only happens for non-string map keys
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
