//! The per-update metrics pipeline

use super::error::EngineError;
use super::metrics::{CycleMetrics, LatencySummary, MetricFlags};
use crate::config::EngineConfig;
use crate::estimators::{Estimate, MakerTakerEstimator, SlippageEstimator};
use crate::execution::{ExecutionError, FeeSchedule, MarketImpactAnalyzer};
use crate::monitor::{PerformanceMonitor, ThresholdReport};
use crate::orderbook::{BookSnapshot, BookUpdate, OrderBook, RawBookUpdate};
use crate::utils::current_time_millis;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Callback receiving every emitted [`CycleMetrics`]
pub type MetricsListener = Arc<dyn Fn(&CycleMetrics) + Send + Sync>;

/// Owns the book and every estimator, and turns each feed record into a
/// [`CycleMetrics`].
///
/// The book is shared (`Arc`) so other threads can read it while the engine
/// runs; the write lock is only held while a delta is merged. All metric
/// computation happens on a snapshot.
pub struct MetricsEngine {
    config: EngineConfig,
    book: Arc<OrderBook>,
    monitor: Arc<PerformanceMonitor>,
    analyzer: MarketImpactAnalyzer,
    slippage: SlippageEstimator,
    maker_taker: MakerTakerEstimator,
    fees: FeeSchedule,
    listeners: Vec<MetricsListener>,
    cycles: u64,
}

impl std::fmt::Debug for MetricsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsEngine")
            .field("symbol", &self.config.symbol)
            .field("book", &self.book)
            .field("monitor", &self.monitor)
            .field("fees", &self.fees)
            .field("listeners", &self.listeners.len())
            .field("cycles", &self.cycles)
            .finish()
    }
}

impl MetricsEngine {
    /// Creates an engine with a fresh book for `config.symbol`
    ///
    /// # Errors
    /// [`EngineError::Config`] when the configuration does not validate,
    /// e.g. an unknown fee tier.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let book = Arc::new(OrderBook::new(&config.symbol));
        Self::with_book(config, book)
    }

    /// Creates an engine over an existing shared book
    ///
    /// # Errors
    /// Same as [`MetricsEngine::new`].
    pub fn with_book(config: EngineConfig, book: Arc<OrderBook>) -> Result<Self, EngineError> {
        config.validate()?;
        let fees = config.fee_schedule()?;
        let analyzer = MarketImpactAnalyzer::with_settings(
            Arc::clone(&book),
            config.depth_estimator(),
            config.volatility,
            config.volume,
            config.execution,
        );

        info!(
            "Metrics engine created for {} (fee tier {}, {:?}, {} {} {})",
            config.symbol,
            fees.tier,
            config.update_mode,
            config.order_kind,
            config.order_side,
            config.order_quantity
        );

        Ok(Self {
            slippage: config.slippage_estimator(),
            maker_taker: config.maker_taker_estimator(),
            monitor: Arc::new(PerformanceMonitor::new(config.monitor_window)),
            config,
            book,
            analyzer,
            fees,
            listeners: Vec::new(),
            cycles: 0,
        })
    }

    /// The configuration the engine was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The shared order book
    pub fn book(&self) -> &Arc<OrderBook> {
        &self.book
    }

    /// The shared latency monitor
    pub fn monitor(&self) -> &Arc<PerformanceMonitor> {
        &self.monitor
    }

    /// The impact analyzer
    pub fn analyzer(&self) -> &MarketImpactAnalyzer {
        &self.analyzer
    }

    /// Mutable access to the impact analyzer, e.g. to refresh market parameters
    pub fn analyzer_mut(&mut self) -> &mut MarketImpactAnalyzer {
        &mut self.analyzer
    }

    /// The resolved fee tier
    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Number of cycles completed
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Registers a listener called with every emitted record
    pub fn subscribe(&mut self, listener: MetricsListener) {
        self.listeners.push(listener);
    }

    /// Removes every metrics listener
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Compares the monitor window with the configured latency ceilings
    pub fn check_latency(&self) -> Option<ThresholdReport> {
        self.monitor.check_thresholds(&self.config.latency_thresholds)
    }

    /// Runs one cycle for a feed record.
    ///
    /// A malformed record is dropped: the measurement is cancelled, the book
    /// and the monitor window are left as they were and the error is
    /// returned.
    ///
    /// # Errors
    /// [`EngineError::OrderBook`] for a malformed record,
    /// [`EngineError::Execution`] if the execution model rejects its inputs.
    pub fn process_update(&mut self, raw: &RawBookUpdate) -> Result<CycleMetrics, EngineError> {
        self.monitor.start_measurement();

        let update = match BookUpdate::try_from(raw) {
            Ok(update) => update,
            Err(err) => {
                self.monitor.cancel_measurement();
                warn!("{}: dropping update: {}", self.config.symbol, err);
                return Err(err.into());
            }
        };

        let event = self.book.apply(&update, self.config.update_mode);
        self.monitor.record_data_processing();

        let snapshot = self.book.snapshot();
        let mut metrics = match self.compute(&snapshot) {
            Ok(metrics) => metrics,
            Err(err) => {
                self.monitor.cancel_measurement();
                warn!(
                    "{}: metrics failed for update #{}: {}",
                    self.config.symbol, event.sequence, err
                );
                return Err(err.into());
            }
        };
        metrics.sequence = event.sequence;
        metrics.latency = self.latency_summary();

        for listener in &self.listeners {
            listener(&metrics);
        }
        self.monitor.record_ui_update();
        self.monitor.end_measurement();
        self.cycles += 1;

        debug!(
            "{}: cycle #{} mid {:?}, slippage {:.4} bps, impact {:.4}%, fees {:.4}, net {:.4}",
            self.config.symbol,
            metrics.sequence,
            metrics.mid_price,
            metrics.slippage_bps,
            metrics.market_impact_pct,
            metrics.fees,
            metrics.net_cost
        );

        let interval = self.config.statistics_log_interval;
        if interval > 0 && self.cycles % interval == 0 {
            self.monitor.log_statistics();
            match self.check_latency() {
                Some(report) if !report.all_passed() => {
                    warn!("{}: latency ceilings exceeded: {:?}", self.config.symbol, report);
                }
                _ => {}
            }
        }

        Ok(metrics)
    }

    fn latency_summary(&self) -> LatencySummary {
        let ms = |d: std::time::Duration| d.as_secs_f64() * 1000.0;
        self.monitor
            .get_statistics()
            .map(|stats| LatencySummary {
                end_to_end_ms: ms(stats.end_to_end.mean),
                data_processing_ms: ms(stats.data_processing.mean),
                ui_update_ms: ms(stats.ui_update.mean),
            })
            .unwrap_or_default()
    }

    /// Computes the selected metrics on a snapshot, without touching the book
    /// or the monitor.
    ///
    /// # Errors
    /// [`ExecutionError`] if the execution model rejects its inputs.
    pub fn compute(&mut self, snapshot: &BookSnapshot) -> Result<CycleMetrics, ExecutionError> {
        let flags = self.config.metrics;
        let quantity = self.config.order_quantity;
        let need_cost = flags.contains(MetricFlags::NET_COST);
        let mid_price = snapshot.mid_price();
        let mut no_data = false;

        let slippage_bps = if flags.contains(MetricFlags::SLIPPAGE) || need_cost {
            match self.slippage.predict(snapshot) {
                Estimate::Value(estimate) => estimate.conservative_bps(),
                Estimate::NoData => {
                    no_data = true;
                    0.0
                }
            }
        } else {
            0.0
        };

        let fees = if flags.contains(MetricFlags::FEES) || need_cost {
            self.fees.calculate_fee(quantity, self.config.order_kind)
        } else {
            0.0
        };

        let market_impact_pct = if flags.contains(MetricFlags::MARKET_IMPACT) || need_cost {
            if mid_price.is_none() {
                no_data = true;
            }
            let schedule = self.analyzer.schedule_at_price(
                quantity,
                self.config.horizon,
                self.config.periods,
                mid_price,
            )?;
            schedule.expected_shortfall_bps / 100.0
        } else {
            0.0
        };

        let maker_proportion_pct = if flags.contains(MetricFlags::MAKER_TAKER) {
            match self.maker_taker.predict(snapshot) {
                Estimate::Value(maker) => maker * 100.0,
                Estimate::NoData => {
                    no_data = true;
                    50.0
                }
            }
        } else {
            0.0
        };

        let net_cost = if need_cost {
            quantity * slippage_bps / 10_000.0 + quantity * market_impact_pct / 100.0 + fees
        } else {
            0.0
        };

        let shown = |flag: MetricFlags, value: f64| if flags.contains(flag) { value } else { 0.0 };

        Ok(CycleMetrics {
            sequence: snapshot.sequence,
            timestamp: current_time_millis(),
            mid_price,
            spread: snapshot.spread(),
            slippage_bps: shown(MetricFlags::SLIPPAGE, slippage_bps),
            fees: shown(MetricFlags::FEES, fees),
            market_impact_pct: shown(MetricFlags::MARKET_IMPACT, market_impact_pct),
            net_cost,
            maker_proportion_pct,
            latency: LatencySummary::default(),
            no_data,
        })
    }
}
