//! Engine error types

use crate::config::ConfigError;
use crate::execution::ExecutionError;
use crate::orderbook::OrderBookError;
use thiserror::Error;

/// Errors surfaced by the metrics engine and its drivers
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The update record was rejected; the book was left untouched
    #[error(transparent)]
    OrderBook(#[from] OrderBookError),

    /// The execution model rejected its parameters
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// The engine configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The driver is no longer accepting updates
    #[error("engine driver is not running")]
    DriverStopped,
}
