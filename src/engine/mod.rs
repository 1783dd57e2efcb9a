//! Metrics engine: runs every estimator on each book update and publishes a
//! [`CycleMetrics`] record.

pub mod driver;
pub mod error;
pub mod metrics;
pub mod pipeline;


pub use driver::{EngineDriverStd, EngineDriverTokio};
pub use error::EngineError;
pub use metrics::{CycleMetrics, LatencySummary, MetricFlags};
pub use pipeline::{MetricsEngine, MetricsListener};
