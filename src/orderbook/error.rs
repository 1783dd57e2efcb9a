//! Order book error types

use super::level::Side;
use thiserror::Error;

/// Errors that can occur while turning feed records into book updates
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum OrderBookError {
    /// A feed record is missing a required field or carries an unparseable value.
    /// The record is dropped and the book is left untouched.
    #[error("malformed input on {side} level {index}: {reason}")]
    MalformedInput {
        /// Side whose level list contained the bad entry
        side: Side,
        /// Position of the offending entry within that list
        index: usize,
        /// Human readable description of the problem
        reason: String,
    },

    /// A record is missing one of the two level lists entirely
    #[error("malformed input: missing {field} field")]
    MissingField {
        /// Name of the missing field (`asks` or `bids`)
        field: &'static str,
    },

    /// A level carries a price or quantity the book cannot store
    #[error("invalid level: price {price}, quantity {quantity}")]
    InvalidLevel {
        /// The offending price
        price: f64,
        /// The offending quantity
        quantity: f64,
    },
}

impl OrderBookError {
    /// Whether this error means the feed record should be dropped as malformed
    #[must_use]
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            OrderBookError::MalformedInput { .. }
                | OrderBookError::MissingField { .. }
                | OrderBookError::InvalidLevel { .. }
        )
    }
}
