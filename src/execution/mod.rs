//! Execution cost models: market impact, optimal scheduling, fees and a
//! paper-trading simulator.

pub mod almgren_chriss;
pub mod analyzer;
pub mod error;
/// Exchange fee tiers.
pub mod fees;
pub mod simulator;


pub use almgren_chriss::{
    AlmgrenChriss, CostBreakdown, ExecutionModelParameters, ExecutionSchedule,
};
pub use analyzer::{
    DEFAULT_VOLATILITY, DEFAULT_VOLUME, ImpactEstimate, MarketImpactAnalyzer, MarketParameters,
};
pub use error::ExecutionError;
pub use fees::{DEFAULT_FEE_TIER, FeeRates, FeeSchedule, FeeTierTable, OrderKind};
pub use simulator::{SimulatedTrade, TradeSimulator};
