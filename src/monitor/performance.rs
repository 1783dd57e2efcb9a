//! Bounded-window latency recorder for the update pipeline

use crate::utils::current_time_millis;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{info, trace};

/// Number of cycles kept by default
pub const DEFAULT_WINDOW_SIZE: usize = 1000;

/// Default per-stage p95 ceiling, in milliseconds
pub const DEFAULT_MAX_PROCESSING_MS: f64 = 100.0;

/// A timed stage of the update cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Parsing and applying the update, up to `record_data_processing`
    DataProcessing,
    /// Computing and publishing metrics, up to `record_ui_update`
    UiUpdate,
    /// The whole cycle, up to `end_measurement`
    EndToEnd,
}

impl Stage {
    /// Every stage, in pipeline order
    pub const ALL: [Stage; 3] = [Stage::DataProcessing, Stage::UiUpdate, Stage::EndToEnd];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::DataProcessing => write!(f, "data_processing"),
            Stage::UiUpdate => write!(f, "ui_update"),
            Stage::EndToEnd => write!(f, "end_to_end"),
        }
    }
}

/// Stage durations of one completed cycle, each measured from cycle start
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyCycle {
    /// Cycle start, milliseconds since epoch
    pub started_at: u64,
    /// Elapsed time when data processing was recorded
    pub data_processing: Duration,
    /// Elapsed time when the UI update was recorded
    pub ui_update: Duration,
    /// Elapsed time when the cycle ended
    pub end_to_end: Duration,
}

impl LatencyCycle {
    /// Duration recorded for `stage`
    #[must_use]
    pub fn stage(&self, stage: Stage) -> Duration {
        match stage {
            Stage::DataProcessing => self.data_processing,
            Stage::UiUpdate => self.ui_update,
            Stage::EndToEnd => self.end_to_end,
        }
    }
}

/// Distribution of one stage over the window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageStatistics {
    /// Arithmetic mean
    pub mean: Duration,
    /// 50th percentile
    pub median: Duration,
    /// 95th percentile
    pub p95: Duration,
    /// 99th percentile
    pub p99: Duration,
    /// Fastest cycle
    pub min: Duration,
    /// Slowest cycle
    pub max: Duration,
}

impl StageStatistics {
    fn from_samples(samples: &mut [f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        samples.sort_by(f64::total_cmp);
        let n = samples.len();
        let mean = samples.iter().sum::<f64>() / n as f64;
        Some(Self {
            mean: Duration::from_secs_f64(mean),
            median: Duration::from_secs_f64(percentile(samples, 0.5)),
            p95: Duration::from_secs_f64(percentile(samples, 0.95)),
            p99: Duration::from_secs_f64(percentile(samples, 0.99)),
            min: Duration::from_secs_f64(samples[0]),
            max: Duration::from_secs_f64(samples[n - 1]),
        })
    }
}

/// Percentile of sorted samples using rank `p * (n + 1)`, clamped to the
/// sample range and linearly interpolated between neighbours.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    let rank = (p * (n as f64 + 1.0)).clamp(1.0, n as f64);
    let lower = rank.floor() as usize;
    let fraction = rank - lower as f64;
    if lower >= n {
        return sorted[n - 1];
    }
    sorted[lower - 1] + (sorted[lower] - sorted[lower - 1]) * fraction
}

/// Per-stage statistics over the current window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyStatistics {
    /// Number of cycles the statistics were computed from
    pub samples: usize,
    /// Data processing stage
    pub data_processing: StageStatistics,
    /// UI update stage
    pub ui_update: StageStatistics,
    /// Whole cycle
    pub end_to_end: StageStatistics,
}

impl LatencyStatistics {
    /// Statistics of one stage
    #[must_use]
    pub fn stage(&self, stage: Stage) -> &StageStatistics {
        match stage {
            Stage::DataProcessing => &self.data_processing,
            Stage::UiUpdate => &self.ui_update,
            Stage::EndToEnd => &self.end_to_end,
        }
    }
}

/// Per-stage p95 ceilings, in milliseconds. An infinite ceiling never fails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyThresholds {
    /// Ceiling for parsing and applying an update
    pub data_processing_ms: f64,
    /// Ceiling for publishing to subscribers
    pub ui_update_ms: f64,
    /// Ceiling for the whole cycle
    pub end_to_end_ms: f64,
}

impl Default for LatencyThresholds {
    fn default() -> Self {
        Self {
            data_processing_ms: DEFAULT_MAX_PROCESSING_MS,
            ui_update_ms: DEFAULT_MAX_PROCESSING_MS,
            end_to_end_ms: DEFAULT_MAX_PROCESSING_MS,
        }
    }
}

impl LatencyThresholds {
    /// Ceiling for `stage` in milliseconds
    #[must_use]
    pub fn limit_ms(&self, stage: Stage) -> f64 {
        match stage {
            Stage::DataProcessing => self.data_processing_ms,
            Stage::UiUpdate => self.ui_update_ms,
            Stage::EndToEnd => self.end_to_end_ms,
        }
    }

    /// Ceiling for `stage` as a duration; `None` when it is too large for a
    /// `Duration`, including infinity. Negative ceilings clamp to zero.
    #[must_use]
    pub fn limit(&self, stage: Stage) -> Option<Duration> {
        Duration::try_from_secs_f64(self.limit_ms(stage).max(0.0) / 1000.0).ok()
    }

    /// Whether a stage p95 is within its ceiling. Compared in float
    /// milliseconds so any ceiling, including infinity, is accepted; a NaN
    /// ceiling never passes.
    #[must_use]
    pub fn within(&self, stage: Stage, p95: Duration) -> bool {
        p95.as_secs_f64() * 1000.0 <= self.limit_ms(stage)
    }
}

/// Pass/fail per stage: `true` when the stage p95 is within its ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdReport {
    /// Data-processing p95 within its ceiling
    pub data_processing: bool,
    /// Publish p95 within its ceiling
    pub ui_update: bool,
    /// End-to-end p95 within its ceiling
    pub end_to_end: bool,
}

impl ThresholdReport {
    /// Whether every stage passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.data_processing && self.ui_update && self.end_to_end
    }
}

struct InFlight {
    start: Instant,
    cycle: LatencyCycle,
}

/// Records stage latencies of update cycles into a fixed-size window.
///
/// A cycle goes idle → measuring (`start_measurement`) → recorded
/// (`end_measurement`). The in-flight cycle and the window have separate
/// locks, so reading statistics never blocks a cycle being timed.
pub struct PerformanceMonitor {
    window_size: usize,
    in_flight: Mutex<Option<InFlight>>,
    history: Mutex<VecDeque<LatencyCycle>>,
}

impl fmt::Debug for PerformanceMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerformanceMonitor")
            .field("window_size", &self.window_size)
            .field("recorded", &self.len())
            .field("measuring", &self.is_measuring())
            .finish()
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl PerformanceMonitor {
    /// Creates a monitor keeping the last `window_size` cycles (at least one)
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            window_size,
            in_flight: Mutex::new(None),
            history: Mutex::new(VecDeque::with_capacity(window_size)),
        }
    }

    /// Maximum number of cycles kept
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    fn in_flight(&self) -> MutexGuard<'_, Option<InFlight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn history(&self) -> MutexGuard<'_, VecDeque<LatencyCycle>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts timing a new cycle, discarding any cycle still in flight
    pub fn start_measurement(&self) {
        *self.in_flight() = Some(InFlight {
            start: Instant::now(),
            cycle: LatencyCycle {
                started_at: current_time_millis(),
                ..LatencyCycle::default()
            },
        });
    }

    /// Whether a cycle is being timed
    pub fn is_measuring(&self) -> bool {
        self.in_flight().is_some()
    }

    fn stamp(&self, stage: Stage) {
        let mut guard = self.in_flight();
        let Some(current) = guard.as_mut() else {
            return;
        };
        let elapsed = current.start.elapsed();
        match stage {
            Stage::DataProcessing => current.cycle.data_processing = elapsed,
            Stage::UiUpdate => current.cycle.ui_update = elapsed,
            Stage::EndToEnd => current.cycle.end_to_end = elapsed,
        }
    }

    /// Stamps the data-processing stage. No-op while idle; last call wins.
    pub fn record_data_processing(&self) {
        self.stamp(Stage::DataProcessing);
    }

    /// Stamps the UI-update stage. No-op while idle; last call wins.
    pub fn record_ui_update(&self) {
        self.stamp(Stage::UiUpdate);
    }

    /// Finishes the cycle in flight and appends it to the window.
    ///
    /// Returns the recorded cycle, or `None` when no cycle was started.
    pub fn end_measurement(&self) -> Option<LatencyCycle> {
        let InFlight { start, mut cycle } = self.in_flight().take()?;
        cycle.end_to_end = start.elapsed();
        self.record_cycle(cycle);
        trace!("cycle recorded: end to end {:?}", cycle.end_to_end);
        Some(cycle)
    }

    /// Drops the cycle in flight without recording it
    pub fn cancel_measurement(&self) {
        self.in_flight().take();
    }

    /// Appends an already measured cycle, evicting the oldest when full
    pub fn record_cycle(&self, cycle: LatencyCycle) {
        let mut history = self.history();
        while history.len() >= self.window_size {
            history.pop_front();
        }
        history.push_back(cycle);
    }

    /// Number of cycles in the window
    pub fn len(&self) -> usize {
        self.history().len()
    }

    /// True when no cycle has been recorded
    pub fn is_empty(&self) -> bool {
        self.history().is_empty()
    }

    /// The `n` most recent cycles, oldest first
    pub fn recent(&self, n: usize) -> Vec<LatencyCycle> {
        let history = self.history();
        let skip = history.len().saturating_sub(n);
        history.iter().skip(skip).copied().collect()
    }

    /// Empties the window
    pub fn clear(&self) {
        self.history().clear();
    }

    /// Statistics per stage over the window, `None` when it is empty
    pub fn get_statistics(&self) -> Option<LatencyStatistics> {
        let cycles: Vec<LatencyCycle> = self.history().iter().copied().collect();
        let collect = |stage: Stage| -> Vec<f64> {
            cycles.iter().map(|c| c.stage(stage).as_secs_f64()).collect()
        };

        Some(LatencyStatistics {
            samples: cycles.len(),
            data_processing: StageStatistics::from_samples(&mut collect(Stage::DataProcessing))?,
            ui_update: StageStatistics::from_samples(&mut collect(Stage::UiUpdate))?,
            end_to_end: StageStatistics::from_samples(&mut collect(Stage::EndToEnd))?,
        })
    }

    /// Compares each stage's p95 with its ceiling, `None` when the window is empty
    pub fn check_thresholds(&self, limits: &LatencyThresholds) -> Option<ThresholdReport> {
        let stats = self.get_statistics()?;
        let pass = |stage: Stage| limits.within(stage, stats.stage(stage).p95);
        Some(ThresholdReport {
            data_processing: pass(Stage::DataProcessing),
            ui_update: pass(Stage::UiUpdate),
            end_to_end: pass(Stage::EndToEnd),
        })
    }

    /// Logs the current statistics in milliseconds
    pub fn log_statistics(&self) {
        let Some(stats) = self.get_statistics() else {
            return;
        };
        let ms = |d: Duration| d.as_secs_f64() * 1000.0;
        info!("Performance statistics over {} cycles:", stats.samples);
        for stage in Stage::ALL {
            let s = stats.stage(stage);
            info!(
                "  {}: mean {:.2}ms, median {:.2}ms, p95 {:.2}ms, p99 {:.2}ms, min {:.2}ms, max {:.2}ms",
                stage,
                ms(s.mean),
                ms(s.median),
                ms(s.p95),
                ms(s.p99),
                ms(s.min),
                ms(s.max)
            );
        }
    }
}
