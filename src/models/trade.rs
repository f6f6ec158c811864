use serde::{Deserialize, Serialize};

use super::Direction;

/// A validated, enriched trade row. Only rows that survive ingestion become a
/// `Trade`; everything here is already typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: String,
    pub direction: Direction,
    pub instrument: String,
    /// Normalized root symbol used for grouping.
    pub canonical_instrument: String,
    /// First entry timestamp, milliseconds since epoch.
    pub entry_ms: f64,
    /// First close timestamp, milliseconds since epoch.
    pub close_ms: f64,
    pub entry_price: f64,
    pub close_price: f64,
    pub net_profit: f64,
    pub actor_id: String,
    pub account_id: String,
    pub quantity: f64,
}

impl Trade {
    /// True if the closed intervals `[entry, close]` of both trades intersect
    /// at one trade's entry point.
    pub fn overlaps(&self, other: &Trade) -> bool {
        (other.entry_ms >= self.entry_ms && other.entry_ms <= self.close_ms)
            || (self.entry_ms >= other.entry_ms && self.entry_ms <= other.close_ms)
    }
}
