use chrono::{DateTime, Local, Utc};

use super::matcher::Candidate;
use crate::errors::DetectError;
use crate::models::{HedgePair, HedgeType, Trade, TradeLeg};

/// Calendar format for leg timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Clock used to render leg timestamps. `Local` follows the host's zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampZone {
    #[default]
    Local,
    Utc,
}

impl TimestampZone {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Some(TimestampZone::Local),
            "utc" => Some(TimestampZone::Utc),
            _ => None,
        }
    }
}

/// Render milliseconds since epoch as `YYYY-MM-DD HH:MM:SS`. Sub-second
/// precision is truncated.
pub fn format_timestamp(ms: f64, zone: TimestampZone) -> Result<String, DetectError> {
    if !ms.is_finite() {
        return Err(DetectError::TimestampOutOfRange(ms));
    }

    let utc: DateTime<Utc> = DateTime::from_timestamp_millis(ms.floor() as i64)
        .ok_or(DetectError::TimestampOutOfRange(ms))?;

    let rendered = match zone {
        TimestampZone::Utc => utc.format(TIMESTAMP_FORMAT).to_string(),
        TimestampZone::Local => utc.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string(),
    };
    Ok(rendered)
}

/// Run-local pair id counter. Ids start at 1 and increase by one per
/// accepted pair across all groups.
#[derive(Debug)]
pub struct PairSequence {
    next_id: u64,
}

impl PairSequence {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    fn advance(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.next_id - 1
    }
}

impl Default for PairSequence {
    fn default() -> Self {
        Self::new()
    }
}

fn snapshot_leg(trade: &Trade, zone: TimestampZone) -> Result<TradeLeg, DetectError> {
    Ok(TradeLeg {
        trade_id: trade.trade_id.clone(),
        direction: trade.direction,
        entry_time: format_timestamp(trade.entry_ms, zone)?,
        close_time: format_timestamp(trade.close_ms, zone)?,
        entry_timestamp_ms: trade.entry_ms,
        entry_price: trade.entry_price,
        close_price: trade.close_price,
        net_profit: trade.net_profit,
        actor_id: trade.actor_id.clone(),
        account_id: trade.account_id.clone(),
        quantity: trade.quantity,
    })
}

/// Build the output record for a scored, accepted candidate and assign it
/// the next id.
pub fn assemble_pair(
    sequence: &mut PairSequence,
    candidate: &Candidate<'_>,
    confidence: f64,
    zone: TimestampZone,
) -> Result<HedgePair, DetectError> {
    let trade1 = snapshot_leg(candidate.first, zone)?;
    let trade2 = snapshot_leg(candidate.second, zone)?;

    Ok(HedgePair {
        id: sequence.advance(),
        hedge_type: HedgeType::classify(&trade1.actor_id, &trade2.actor_id),
        instrument: candidate.first.canonical_instrument.clone(),
        net_profit: trade1.net_profit + trade2.net_profit,
        entry_price_diff: candidate.price_diff,
        confidence,
        trade1,
        trade2,
    })
}
