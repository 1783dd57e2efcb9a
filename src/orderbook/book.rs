//! Core OrderBook implementation for managing price levels

use super::book_change_event::{BookUpdateEvent, BookUpdateListener};
use super::level::{PriceKey, PriceLevel, Side};
use super::snapshot::BookSnapshot;
use super::update::{BookUpdate, LevelDelta, UpdateMode};
use crate::utils::current_time_millis;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace};

/// Both sides of the book plus the update counter, always mutated together
/// under a single write lock.
#[derive(Debug, Default)]
struct BookState {
    /// Ask side, price -> quantity; iteration order is best ask first
    asks: BTreeMap<PriceKey, f64>,
    /// Bid side, price -> quantity; reverse iteration order is best bid first
    bids: BTreeMap<PriceKey, f64>,
    /// Number of updates applied so far
    sequence: u64,
}

impl BookState {
    fn merge_side(side: &mut BTreeMap<PriceKey, f64>, deltas: &[LevelDelta]) {
        for delta in deltas {
            // LevelDelta guarantees a finite price
            let Some(key) = PriceKey::new(delta.price) else {
                continue;
            };
            if delta.is_removal() {
                side.remove(&key);
            } else {
                side.insert(key, delta.quantity);
            }
        }
    }

    fn best_ask(&self) -> Option<f64> {
        self.asks.keys().next().map(|k| k.value())
    }

    fn best_bid(&self) -> Option<f64> {
        self.bids.keys().next_back().map(|k| k.value())
    }
}

/// The OrderBook keeps aggregated price levels for both sides of a single
/// instrument, as published by a depth feed.
///
/// All state sits behind one `RwLock`: updates take the write lock for the
/// duration of the delta merge only, and every query takes the read lock just
/// long enough to copy out what it needs. Nothing downstream (estimators,
/// listeners) runs while the lock is held.
pub struct OrderBook {
    /// The symbol or identifier for this order book
    symbol: String,

    /// Price level state
    state: RwLock<BookState>,

    /// listens to book updates. This provides a point to refresh an external
    /// view of the book e.g. in the UI
    listeners: RwLock<Vec<BookUpdateListener>>,
}

impl std::fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (asks, bids) = self.level_counts();
        f.debug_struct("OrderBook")
            .field("symbol", &self.symbol)
            .field("asks", &asks)
            .field("bids", &bids)
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl OrderBook {
    /// Create a new, empty order book for the given symbol
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            state: RwLock::new(BookState::default()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Create a new order book with a book update listener already registered
    pub fn with_update_listener(symbol: &str, listener: BookUpdateListener) -> Self {
        let book = Self::new(symbol);
        book.subscribe(listener);
        book
    }

    /// Get the symbol of this order book
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Register a listener notified after every applied update
    pub fn subscribe(&self, listener: BookUpdateListener) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// Remove every registered update listener
    pub fn clear_listeners(&self) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    // Every critical section leaves both maps consistent, so a poisoned lock
    // still guards valid state.
    fn read_state(&self) -> RwLockReadGuard<'_, BookState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, BookState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Merge an update into the book.
    ///
    /// For every delta, a positive quantity inserts or overwrites the level at
    /// that price and a zero or negative quantity removes it (a missing level
    /// is not an error). Applying the same delta twice leaves the book as it
    /// was after the first application.
    pub fn apply_update(&self, update: &BookUpdate) -> BookUpdateEvent {
        self.apply(update, UpdateMode::DeltaMerge)
    }

    /// Replace the whole book with the levels carried by `update`.
    ///
    /// Used for feeds that publish complete books on every message, where a
    /// price absent from the new message must disappear from the book.
    pub fn replace_snapshot(&self, update: &BookUpdate) -> BookUpdateEvent {
        self.apply(update, UpdateMode::SnapshotReplace)
    }

    /// Apply an update with the given merge semantics
    pub fn apply(&self, update: &BookUpdate, mode: UpdateMode) -> BookUpdateEvent {
        let event = {
            let mut state = self.write_state();
            if mode == UpdateMode::SnapshotReplace {
                state.asks.clear();
                state.bids.clear();
            }
            BookState::merge_side(&mut state.asks, &update.asks);
            BookState::merge_side(&mut state.bids, &update.bids);
            state.sequence += 1;

            BookUpdateEvent {
                sequence: state.sequence,
                ask_changes: update.asks.len(),
                bid_changes: update.bids.len(),
                best_bid: state.best_bid(),
                best_ask: state.best_ask(),
                timestamp: current_time_millis(),
            }
        };

        debug!(
            "{}: applied update #{} ({:?}, {} asks, {} bids)",
            self.symbol, event.sequence, mode, event.ask_changes, event.bid_changes
        );

        self.notify(&event);
        event
    }

    fn notify(&self, event: &BookUpdateEvent) {
        let listeners: Vec<BookUpdateListener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener(event);
        }
    }

    /// Get the best ask price, if any
    pub fn best_ask(&self) -> Option<f64> {
        let ask = self.read_state().best_ask();
        trace!("Order book {}: Best ask is {:?}", self.symbol, ask);
        ask
    }

    /// Get the best bid price, if any
    pub fn best_bid(&self) -> Option<f64> {
        let bid = self.read_state().best_bid();
        trace!("Order book {}: Best bid is {:?}", self.symbol, bid);
        bid
    }

    /// Get the mid price (average of best bid and best ask)
    pub fn mid_price(&self) -> Option<f64> {
        let (bid, ask) = {
            let state = self.read_state();
            (state.best_bid(), state.best_ask())
        };
        match (bid, ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => None,
        }
    }

    /// Get the spread (best ask - best bid). Negative when the book is crossed.
    pub fn spread(&self) -> Option<f64> {
        let (bid, ask) = {
            let state = self.read_state();
            (state.best_bid(), state.best_ask())
        };
        match (bid, ask) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// All ask levels, lowest price first
    pub fn asks_sorted(&self) -> Vec<PriceLevel> {
        self.read_state()
            .asks
            .iter()
            .map(|(k, q)| PriceLevel::new(k.value(), *q))
            .collect()
    }

    /// All bid levels, highest price first
    pub fn bids_sorted(&self) -> Vec<PriceLevel> {
        self.read_state()
            .bids
            .iter()
            .rev()
            .map(|(k, q)| PriceLevel::new(k.value(), *q))
            .collect()
    }

    /// Top `n` levels of each side as `(asks, bids)`, best first
    pub fn top_levels(&self, n: usize) -> (Vec<PriceLevel>, Vec<PriceLevel>) {
        let state = self.read_state();
        let asks = state
            .asks
            .iter()
            .take(n)
            .map(|(k, q)| PriceLevel::new(k.value(), *q))
            .collect();
        let bids = state
            .bids
            .iter()
            .rev()
            .take(n)
            .map(|(k, q)| PriceLevel::new(k.value(), *q))
            .collect();
        (asks, bids)
    }

    /// Quantity resting at an exact price on one side
    pub fn quantity_at(&self, side: Side, price: f64) -> Option<f64> {
        let key = PriceKey::new(price)?;
        let state = self.read_state();
        let levels = match side {
            Side::Buy => &state.bids,
            Side::Sell => &state.asks,
        };
        levels.get(&key).copied()
    }

    /// Copy the whole book into a [`BookSnapshot`]
    pub fn snapshot(&self) -> BookSnapshot {
        let state = self.read_state();
        BookSnapshot {
            sequence: state.sequence,
            timestamp: current_time_millis(),
            asks: state
                .asks
                .iter()
                .map(|(k, q)| PriceLevel::new(k.value(), *q))
                .collect(),
            bids: state
                .bids
                .iter()
                .rev()
                .map(|(k, q)| PriceLevel::new(k.value(), *q))
                .collect(),
        }
    }

    /// Number of `(ask, bid)` levels currently in the book
    pub fn level_counts(&self) -> (usize, usize) {
        let state = self.read_state();
        (state.asks.len(), state.bids.len())
    }

    /// Number of updates applied since the book was created
    pub fn sequence(&self) -> u64 {
        self.read_state().sequence
    }

    /// True when neither side has a level
    pub fn is_empty(&self) -> bool {
        let state = self.read_state();
        state.asks.is_empty() && state.bids.is_empty()
    }
}
