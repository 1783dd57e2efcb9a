use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Event data emitted after an update has been applied to the book.
/// It is assumed that the listener is aware of the
/// order book context so we are not adding symbol here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookUpdateEvent {
    /// Book sequence number after this update
    pub sequence: u64,

    /// Number of ask deltas carried by the update
    pub ask_changes: usize,

    /// Number of bid deltas carried by the update
    pub bid_changes: usize,

    /// Best bid after the update
    pub best_bid: Option<f64>,

    /// Best ask after the update
    pub best_ask: Option<f64>,

    /// Milliseconds since epoch when the update was applied
    pub timestamp: u64,
}

/// A thread-safe listener callback for book update events.
///
/// Listeners run on the thread that applied the update, after the book lock
/// has been released. This provides a point to refresh an external view of
/// the book (e.g. a UI table) without the book depending on it.
pub type BookUpdateListener = Arc<dyn Fn(&BookUpdateEvent) + Send + Sync>;
