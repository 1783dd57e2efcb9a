//! Drivers running a [`MetricsEngine`] off the feed thread.
//!
//! The feed connector only hands records to a channel; a worker owning the
//! engine drains it. `EngineDriverStd` uses a thread and `std::sync::mpsc`,
//! `EngineDriverTokio` a task and an unbounded `tokio::sync::mpsc` channel.

use super::error::EngineError;
use super::pipeline::MetricsEngine;
use crate::orderbook::RawBookUpdate;
use tracing::{error, info, warn};

/// Processes one record; a failed cycle is logged and the loop moves on
fn run_engine(engine: &mut MetricsEngine, update: &RawBookUpdate) {
    if let Err(err) = engine.process_update(update) {
        warn!("{}: update not processed: {}", engine.config().symbol, err);
    }
}

/// Engine driver using a worker thread and standard library mpsc channels.
pub struct EngineDriverStd {
    symbol: String,
    /// Sender for feed records, dropped on shutdown
    sender: Option<std::sync::mpsc::Sender<RawBookUpdate>>,
    /// Worker handle, returning the engine when the channel closes
    handle: Option<std::thread::JoinHandle<MetricsEngine>>,
}

impl EngineDriverStd {
    /// Moves `engine` onto a new worker thread and starts draining updates.
    pub fn start(mut engine: MetricsEngine) -> Self {
        let (sender, receiver) = std::sync::mpsc::channel::<RawBookUpdate>();
        let symbol = engine.config().symbol.clone();

        let handle = std::thread::spawn(move || {
            info!("Engine driver started for {}", engine.config().symbol);

            while let Ok(update) = receiver.recv() {
                run_engine(&mut engine, &update);
            }

            info!(
                "Engine driver stopped for {} after {} cycles",
                engine.config().symbol,
                engine.cycles()
            );
            engine
        });

        Self {
            symbol,
            sender: Some(sender),
            handle: Some(handle),
        }
    }

    /// Queues a record for processing. Never waits for the computation.
    ///
    /// # Errors
    /// [`EngineError::DriverStopped`] when the worker is gone.
    pub fn submit(&self, update: RawBookUpdate) -> Result<(), EngineError> {
        let sender = self.sender.as_ref().ok_or(EngineError::DriverStopped)?;
        sender.send(update).map_err(|e| {
            error!("Failed to send update for {}: {}", self.symbol, e);
            EngineError::DriverStopped
        })
    }

    /// Closes the channel, waits for queued records to be processed and
    /// returns the engine. `None` if the worker panicked.
    pub fn shutdown(mut self) -> Option<MetricsEngine> {
        self.stop()
    }

    fn stop(&mut self) -> Option<MetricsEngine> {
        self.sender.take();
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(engine) => Some(engine),
            Err(_) => {
                error!("Engine worker for {} panicked", self.symbol);
                None
            }
        }
    }
}

impl Drop for EngineDriverStd {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Engine driver using a Tokio task and an unbounded Tokio mpsc channel.
pub struct EngineDriverTokio {
    symbol: String,
    /// Sender for feed records, dropped on shutdown
    sender: Option<tokio::sync::mpsc::UnboundedSender<RawBookUpdate>>,
    /// Task handle, returning the engine when the channel closes
    handle: Option<tokio::task::JoinHandle<MetricsEngine>>,
}

impl EngineDriverTokio {
    /// Moves `engine` into a spawned task and starts draining updates.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn start(mut engine: MetricsEngine) -> Self {
        let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel::<RawBookUpdate>();
        let symbol = engine.config().symbol.clone();

        let handle = tokio::spawn(async move {
            info!("Engine driver started for {} (Tokio)", engine.config().symbol);

            while let Some(update) = receiver.recv().await {
                run_engine(&mut engine, &update);
            }

            info!(
                "Engine driver stopped for {} after {} cycles (Tokio)",
                engine.config().symbol,
                engine.cycles()
            );
            engine
        });

        Self {
            symbol,
            sender: Some(sender),
            handle: Some(handle),
        }
    }

    /// Queues a record for processing. Never waits for the computation.
    ///
    /// # Errors
    /// [`EngineError::DriverStopped`] when the task is gone.
    pub fn submit(&self, update: RawBookUpdate) -> Result<(), EngineError> {
        let sender = self.sender.as_ref().ok_or(EngineError::DriverStopped)?;
        sender.send(update).map_err(|e| {
            error!("Failed to send update for {}: {}", self.symbol, e);
            EngineError::DriverStopped
        })
    }

    /// Closes the channel, waits for queued records to be processed and
    /// returns the engine. `None` if the task panicked or was cancelled.
    pub async fn shutdown(mut self) -> Option<MetricsEngine> {
        self.sender.take();
        let handle = self.handle.take()?;
        match handle.await {
            Ok(engine) => Some(engine),
            Err(e) => {
                error!("Engine task for {} failed: {}", self.symbol, e);
                None
            }
        }
    }
}
