//! Engine configuration.
//!
//! [`EngineConfig`] is an immutable value handed to the engine at
//! construction. Every field has a default, so a JSON document only needs to
//! name what it overrides.

use crate::engine::MetricFlags;
use crate::estimators::{
    DEFAULT_DEPTH_LEVELS, DEFAULT_MARKET_DEPTH, DepthEstimator, MakerTakerEstimator,
    SlippageEstimator,
};
use crate::estimators::slippage::{DEFAULT_BASE_SLIPPAGE, DEFAULT_REFERENCE_SIZE};
use crate::execution::{
    DEFAULT_FEE_TIER, DEFAULT_VOLATILITY, DEFAULT_VOLUME, ExecutionModelParameters, FeeSchedule,
    FeeTierTable, OrderKind,
};
use crate::monitor::{DEFAULT_WINDOW_SIZE, LatencyThresholds};
use crate::orderbook::{Side, UpdateMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors found while loading or validating configuration
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The selected fee tier is not in the fee table
    #[error("unknown fee tier: {tier}")]
    UnknownFeeTier {
        /// The tier name that was looked up
        tier: String,
    },

    /// A field holds a value the engine cannot run with
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// Name of the field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// The configuration document could not be parsed
    #[error("cannot parse configuration: {message}")]
    Parse {
        /// Parser error message
        message: String,
    },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse {
            message: err.to_string(),
        }
    }
}

/// Configuration of a [`MetricsEngine`](crate::engine::MetricsEngine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Instrument the book tracks
    pub symbol: String,
    /// Fee tiers of the exchange
    pub fee_tiers: FeeTierTable,
    /// Name of the tier in `fee_tiers` to charge
    pub fee_tier: String,
    /// Size of the order the metrics are computed for
    pub order_quantity: f64,
    /// Market or limit, deciding the fee rate
    pub order_kind: OrderKind,
    /// Direction of the order
    pub order_side: Side,
    /// Levels per side summed for depth
    pub depth_levels: usize,
    /// Depth used while the book is empty
    pub default_depth: f64,
    /// Daily volatility used for market parameters
    pub volatility: f64,
    /// Daily volume used for market parameters
    pub volume: f64,
    /// Base slippage as a fraction of price
    pub base_slippage: f64,
    /// Order size the linear slippage estimate is scaled to
    pub slippage_reference_size: f64,
    /// Almgren-Chriss parameters
    pub execution: ExecutionModelParameters,
    /// Execution horizon for the impact schedule
    pub horizon: f64,
    /// Number of periods of the impact schedule
    pub periods: usize,
    /// Cycles kept by the latency monitor
    pub monitor_window: usize,
    /// How updates are merged into the book
    pub update_mode: UpdateMode,
    /// Metrics computed every cycle
    pub metrics: MetricFlags,
    /// Per-stage latency ceilings
    pub latency_thresholds: LatencyThresholds,
    /// Log latency statistics every this many cycles, 0 to disable
    pub statistics_log_interval: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            symbol: "BTC-USDT-SWAP".to_string(),
            fee_tiers: FeeTierTable::default(),
            fee_tier: DEFAULT_FEE_TIER.to_string(),
            order_quantity: 1000.0,
            order_kind: OrderKind::Market,
            order_side: Side::Buy,
            depth_levels: DEFAULT_DEPTH_LEVELS,
            default_depth: DEFAULT_MARKET_DEPTH,
            volatility: DEFAULT_VOLATILITY,
            volume: DEFAULT_VOLUME,
            base_slippage: DEFAULT_BASE_SLIPPAGE,
            slippage_reference_size: DEFAULT_REFERENCE_SIZE,
            execution: ExecutionModelParameters::default(),
            horizon: 1.0,
            periods: 4,
            monitor_window: DEFAULT_WINDOW_SIZE,
            update_mode: UpdateMode::DeltaMerge,
            metrics: MetricFlags::ALL,
            latency_thresholds: LatencyThresholds::default(),
            statistics_log_interval: 100,
        }
    }
}

fn require(field: &'static str, ok: bool, message: impl Into<String>) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            message: message.into(),
        })
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration document
    ///
    /// # Errors
    /// [`ConfigError::Parse`] for malformed JSON, otherwise any error from
    /// [`EngineConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty JSON
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that the engine can run with this configuration
    ///
    /// # Errors
    /// [`ConfigError::UnknownFeeTier`] or [`ConfigError::InvalidValue`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fee_schedule()?;
        require(
            "order_quantity",
            self.order_quantity.is_finite() && self.order_quantity >= 0.0,
            format!("must be a non-negative number, got {}", self.order_quantity),
        )?;
        require("depth_levels", self.depth_levels >= 1, "must be at least 1")?;
        require(
            "default_depth",
            self.default_depth.is_finite() && self.default_depth >= 0.0,
            format!("must be a non-negative number, got {}", self.default_depth),
        )?;
        require(
            "volatility",
            self.volatility.is_finite() && self.volatility >= 0.0,
            format!("must be a non-negative number, got {}", self.volatility),
        )?;
        require(
            "volume",
            self.volume.is_finite() && self.volume > 0.0,
            format!("must be positive, got {}", self.volume),
        )?;
        require(
            "horizon",
            self.horizon.is_finite() && self.horizon > 0.0,
            format!("must be positive, got {}", self.horizon),
        )?;
        require("periods", self.periods >= 1, "must be at least 1")?;
        require(
            "execution.temporary_impact",
            self.execution.temporary_impact.is_finite() && self.execution.temporary_impact > 0.0,
            format!("must be positive, got {}", self.execution.temporary_impact),
        )?;
        require(
            "execution.risk_aversion",
            self.execution.risk_aversion.is_finite() && self.execution.risk_aversion >= 0.0,
            format!("must be a non-negative number, got {}", self.execution.risk_aversion),
        )?;
        require(
            "execution.volatility",
            self.execution.volatility.is_finite() && self.execution.volatility >= 0.0,
            format!("must be a non-negative number, got {}", self.execution.volatility),
        )?;
        require("monitor_window", self.monitor_window >= 1, "must be at least 1")?;
        // infinity is allowed and means no ceiling
        let thresholds = &self.latency_thresholds;
        for (field, ms) in [
            ("latency_thresholds.data_processing_ms", thresholds.data_processing_ms),
            ("latency_thresholds.ui_update_ms", thresholds.ui_update_ms),
            ("latency_thresholds.end_to_end_ms", thresholds.end_to_end_ms),
        ] {
            require(field, ms >= 0.0, format!("must be zero or more, got {ms}"))?;
        }
        Ok(())
    }

    /// Resolves the configured fee tier
    ///
    /// # Errors
    /// [`ConfigError::UnknownFeeTier`] when `fee_tier` is not in `fee_tiers`.
    pub fn fee_schedule(&self) -> Result<FeeSchedule, ConfigError> {
        FeeSchedule::from_table(&self.fee_tiers, &self.fee_tier)
    }

    /// Depth estimator over the configured levels and default depth
    #[must_use]
    pub fn depth_estimator(&self) -> DepthEstimator {
        DepthEstimator::new(self.depth_levels, self.default_depth)
    }

    /// Slippage estimator using the configured depth settings
    #[must_use]
    pub fn slippage_estimator(&self) -> SlippageEstimator {
        SlippageEstimator::new(
            self.base_slippage,
            self.slippage_reference_size,
            self.depth_estimator(),
        )
    }

    /// Maker/taker estimator using the configured depth settings
    #[must_use]
    pub fn maker_taker_estimator(&self) -> MakerTakerEstimator {
        MakerTakerEstimator::new(self.depth_estimator())
    }
}
