//! Latency monitoring for the update pipeline.

pub mod performance;


pub use performance::{
    DEFAULT_MAX_PROCESSING_MS, DEFAULT_WINDOW_SIZE, LatencyCycle, LatencyStatistics,
    LatencyThresholds, PerformanceMonitor, Stage, StageStatistics, ThresholdReport,
};
