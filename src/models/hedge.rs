use serde::{Deserialize, Serialize};
use std::fmt;

use super::Direction;

/// Hedge classification by actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HedgeType {
    /// Both legs belong to the same actor.
    #[serde(rename = "self")]
    SelfHedge,
    /// Legs belong to different actors.
    #[serde(rename = "cross-actor")]
    CrossActor,
}

impl HedgeType {
    pub fn classify(actor_a: &str, actor_b: &str) -> Self {
        if actor_a == actor_b {
            HedgeType::SelfHedge
        } else {
            HedgeType::CrossActor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HedgeType::SelfHedge => "self",
            HedgeType::CrossActor => "cross-actor",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "self" => Some(HedgeType::SelfHedge),
            "cross-actor" => Some(HedgeType::CrossActor),
            _ => None,
        }
    }
}

impl fmt::Display for HedgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a hedge pair, snapshotted at match time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeLeg {
    pub trade_id: String,
    pub direction: Direction,
    /// `YYYY-MM-DD HH:MM:SS`
    pub entry_time: String,
    pub close_time: String,
    /// Raw entry timestamp (ms since epoch), kept for ordering.
    pub entry_timestamp_ms: f64,
    pub entry_price: f64,
    pub close_price: f64,
    pub net_profit: f64,
    pub actor_id: String,
    pub account_id: String,
    pub quantity: f64,
}

/// An accepted hedge pair. Never mutated after assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgePair {
    pub id: u64,
    #[serde(rename = "type")]
    pub hedge_type: HedgeType,
    pub instrument: String,
    pub trade1: TradeLeg,
    pub trade2: TradeLeg,
    pub entry_price_diff: f64,
    pub confidence: f64,
    pub net_profit: f64,
}
