//! # Real-Time Order Book Impact Engine
//!
//! A market-microstructure estimation engine written in Rust. It keeps a live price-level order book from streamed depth updates and, on every update, recomputes pre-trade cost metrics for a configured order: expected slippage, exchange fees, market impact, maker/taker split and net cost. Each update cycle is timed so the pipeline's latency can be checked against a budget.
//!
//! ## Key Features
//!
//! - **Price-Level Order Book**: Aggregated levels per side in ordered maps behind a single `RwLock`. Delta-merge and snapshot-replace semantics are both supported, and selected explicitly through configuration.
//!
//! - **Snapshot-Based Estimation**: Every estimator runs on a `BookSnapshot` copied out under the read lock, so impact arithmetic never blocks feed ingestion.
//!
//! - **Explicit No-Data Results**: Estimators return `Estimate::NoData` for one-sided books instead of sentinel values; the caller decides which neutral value to display.
//!
//! - **Almgren-Chriss Optimal Execution**: Numerically stable trajectory, trading rates and expected cost decomposition, with parameter validation.
//!
//! - **Latency Monitoring**: A bounded-window recorder with mean, median, p95, p99, min and max per pipeline stage, plus threshold checks.
//!
//! - **Thread and Task Drivers**: `EngineDriverStd` and `EngineDriverTokio` move the engine off the feed thread behind an mpsc channel.
//!
//! ## Design Goals
//!
//! 1. **Correctness**: The book's invariants (unique strictly positive levels, best ask = lowest ask, best bid = highest bid) hold after every update, under concurrent readers.
//! 2. **Low Latency**: The book lock is held only while a delta is merged or a snapshot copied; nothing else runs under it.
//! 3. **Explicit Configuration**: Fee tiers, model parameters and defaults live in an immutable `EngineConfig` passed in at construction.
//! 4. **Observability**: Structured `tracing` logs for every cycle, dropped record and latency report.
//!
//! ## Components
//!
//! ### Order Book
//!
//! - `OrderBook::apply_update()` merges deltas: a positive quantity inserts or overwrites a level, zero or negative removes it
//! - `OrderBook::replace_snapshot()` replaces both sides for feeds publishing full books
//! - `best_ask()`, `best_bid()`, `mid_price()`, `spread()`, `asks_sorted()`, `bids_sorted()`, `top_levels()`
//! - `subscribe()` registers listeners notified after each update, outside the lock
//!
//! ### Estimators
//!
//! - **DepthEstimator**: Dollar depth over the top N levels of each side, with a configured fallback for an empty book
//! - **SlippageEstimator**: Depth-proportional and spread-inclusive slippage in basis points
//! - **MakerTakerEstimator**: Maker proportion from relative spread and depth imbalance, clamped to `[0.2, 0.8]`
//!
//! ### Execution
//!
//! - **AlmgrenChriss**: Optimal liquidation schedule and expected shortfall
//! - **MarketImpactAnalyzer**: Quick impact and slippage estimates plus the optimal schedule at the current mid
//! - **TradeSimulator**: Paper fills at the impact-adjusted mid with a cash-flow ledger
//! - **FeeSchedule**: Exchange fee tiers with maker rates for limit orders and taker rates for market orders
//!
//! ### Metrics Engine
//!
//! `MetricsEngine::process_update()` takes a raw feed record through parsing, book update, estimation and publication, bracketed by the `PerformanceMonitor`. `MetricFlags` selects which metrics are computed.
//!
//! ## Example
//!
//! ```rust
//! use orderbook_impact::prelude::*;
//!
//! let mut engine = MetricsEngine::new(EngineConfig::default())?;
//!
//! let update = RawBookUpdate::from_pairs(&[(100.5, 2.0), (101.0, 4.0)], &[(100.0, 3.0)]);
//! let metrics = engine.process_update(&update)?;
//!
//! assert_eq!(metrics.mid_price, Some(100.25));
//! assert!(metrics.maker_proportion_pct >= 20.0 && metrics.maker_proportion_pct <= 80.0);
//! # Ok::<(), orderbook_impact::EngineError>(())
//! ```
//!
//! ## Status
//! This project is currently in active development and is not yet suitable for production use.

pub mod config;
pub mod engine;
pub mod estimators;
pub mod execution;
pub mod monitor;
pub mod orderbook;

pub mod prelude;
mod utils;

pub use config::{ConfigError, EngineConfig};
pub use engine::{
    CycleMetrics, EngineDriverStd, EngineDriverTokio, EngineError, LatencySummary, MetricFlags,
    MetricsEngine, MetricsListener,
};
pub use estimators::{
    DepthEstimator, DepthProfile, Estimate, MakerTakerEstimator, SlippageEstimate,
    SlippageEstimator,
};
pub use execution::{
    AlmgrenChriss, CostBreakdown, ExecutionError, ExecutionModelParameters, ExecutionSchedule,
    FeeRates, FeeSchedule, FeeTierTable, ImpactEstimate, MarketImpactAnalyzer, MarketParameters,
    OrderKind, SimulatedTrade, TradeSimulator,
};
pub use monitor::{
    LatencyCycle, LatencyStatistics, LatencyThresholds, PerformanceMonitor, Stage,
    StageStatistics, ThresholdReport,
};
pub use orderbook::{
    BookSnapshot, BookUpdate, BookUpdateEvent, BookUpdateListener, FeedValue, LevelDelta,
    OrderBook, OrderBookError, PriceLevel, RawBookUpdate, Side, UpdateMode,
};
pub use utils::current_time_millis;
