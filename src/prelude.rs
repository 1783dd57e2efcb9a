/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/10/25
******************************************************************************/

//! Prelude module that re-exports commonly used types and traits.
//!
//! This module provides a convenient way to import the most commonly used
//! types from the orderbook-impact crate. Instead of importing each type
//! individually, you can use:
//!
//! ```rust
//! use orderbook_impact::prelude::*;
//! ```
//!
//! This will import all the essential types needed for feeding a book and
//! reading its metrics.

// Core order book types
pub use crate::orderbook::{
    BookSnapshot, BookUpdate, BookUpdateEvent, BookUpdateListener, OrderBook, OrderBookError,
    PriceLevel, RawBookUpdate, Side, UpdateMode,
};

// Estimators
pub use crate::estimators::{
    DepthEstimator, Estimate, MakerTakerEstimator, SlippageEstimate, SlippageEstimator,
};

// Execution and cost models
pub use crate::execution::{
    AlmgrenChriss, ExecutionError, ExecutionModelParameters, ExecutionSchedule, FeeSchedule,
    ImpactEstimate, MarketImpactAnalyzer, OrderKind, TradeSimulator,
};

// Latency monitoring
pub use crate::monitor::{LatencyThresholds, PerformanceMonitor};

// Engine, configuration and drivers
pub use crate::config::{ConfigError, EngineConfig};
pub use crate::engine::{
    CycleMetrics, EngineDriverStd, EngineDriverTokio, EngineError, MetricFlags, MetricsEngine,
    MetricsListener,
};

// Utility functions
pub use crate::utils::current_time_millis;
