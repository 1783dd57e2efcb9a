//! Price-level order book maintained from streamed depth updates.

pub mod book;
/// Book update notifications for external subscribers.
pub mod book_change_event;
pub mod error;
/// Price keys, sides and levels.
pub mod level;
pub mod snapshot;
/// Raw feed records and validated book updates.
pub mod update;

mod tests;

pub use book::OrderBook;
pub use book_change_event::{BookUpdateEvent, BookUpdateListener};
pub use error::OrderBookError;
pub use level::{PriceKey, PriceLevel, Side};
pub use snapshot::BookSnapshot;
pub use update::{BookUpdate, FeedValue, LevelDelta, RawBookUpdate, UpdateMode};
