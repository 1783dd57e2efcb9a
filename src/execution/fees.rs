//! Exchange fee tiers and fee calculation

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the tier used when none is configured
pub const DEFAULT_FEE_TIER: &str = "Tier 1 (0.08%/0.1%)";

/// How an order reaches the book, which decides the fee rate it pays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    /// Crosses the spread and pays the taker rate
    #[default]
    Market,
    /// Rests on the book and pays the maker rate
    Limit,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Market => write!(f, "Market"),
            OrderKind::Limit => write!(f, "Limit"),
        }
    }
}

/// Maker and taker rates as fractions of notional (0.001 = 0.1%)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeRates {
    /// Rate charged on passive fills
    pub maker: f64,
    /// Rate charged on aggressive fills
    pub taker: f64,
}

impl FeeRates {
    /// Creates a rate pair
    #[must_use]
    pub fn new(maker: f64, taker: f64) -> Self {
        Self { maker, taker }
    }

    /// Rate applying to an order of the given kind
    #[must_use]
    pub fn rate_for(&self, kind: OrderKind) -> f64 {
        match kind {
            OrderKind::Limit => self.maker,
            OrderKind::Market => self.taker,
        }
    }
}

/// Named fee tiers of an exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeTierTable {
    tiers: BTreeMap<String, FeeRates>,
}

impl Default for FeeTierTable {
    /// OKX spot tiers 1 to 3
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert(DEFAULT_FEE_TIER, FeeRates::new(0.0008, 0.001));
        table.insert("Tier 2 (0.07%/0.09%)", FeeRates::new(0.0007, 0.0009));
        table.insert("Tier 3 (0.06%/0.08%)", FeeRates::new(0.0006, 0.0008));
        table
    }
}

impl FeeTierTable {
    /// A table without tiers
    #[must_use]
    pub fn empty() -> Self {
        Self {
            tiers: BTreeMap::new(),
        }
    }

    /// Adds or replaces a tier
    pub fn insert(&mut self, name: &str, rates: FeeRates) {
        self.tiers.insert(name.to_string(), rates);
    }

    /// Looks up a tier by its exact name
    pub fn get(&self, name: &str) -> Option<FeeRates> {
        self.tiers.get(name).copied()
    }

    /// Tier names in lexical order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tiers.keys().map(String::as_str)
    }

    /// Number of tiers
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// True when the table has no tiers
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

/// The fee tier selected for an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Name of the selected tier
    pub tier: String,
    /// Rates of the selected tier
    pub rates: FeeRates,
}

impl FeeSchedule {
    /// Resolves `tier` in `table`.
    ///
    /// # Errors
    /// [`ConfigError::UnknownFeeTier`] when the table has no such tier.
    pub fn from_table(table: &FeeTierTable, tier: &str) -> Result<Self, ConfigError> {
        let rates = table.get(tier).ok_or_else(|| ConfigError::UnknownFeeTier {
            tier: tier.to_string(),
        })?;
        Ok(Self {
            tier: tier.to_string(),
            rates,
        })
    }

    /// Fee for an order of the given notional and kind
    #[must_use]
    pub fn calculate_fee(&self, notional: f64, kind: OrderKind) -> f64 {
        notional * self.rates.rate_for(kind)
    }
}
