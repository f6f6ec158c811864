use chrono::{NaiveDateTime, Timelike};

use super::{percentage, tally};
use crate::detection::assembler::TIMESTAMP_FORMAT;
use crate::models::{ActorCount, HedgePair, HourCount, InstrumentShare, NotablePatterns, TradeLeg};

/// An actor is "frequent" from this many pair appearances.
pub const FREQUENT_ACTOR_MIN_PAIRS: usize = 3;
/// Hours at or above this share of the busiest hour are peaks.
pub const PEAK_HOUR_RATIO: f64 = 0.8;

/// Hour of day of a leg's formatted entry time.
pub(crate) fn entry_hour(leg: &TradeLeg) -> Option<u32> {
    NaiveDateTime::parse_from_str(&leg.entry_time, TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.hour())
}

/// Actors appearing in at least [`FREQUENT_ACTOR_MIN_PAIRS`] pairs, most
/// active first. A self-hedge counts once for its actor.
pub fn frequent_actors(pairs: &[HedgePair]) -> Vec<ActorCount> {
    let appearances = pairs.iter().flat_map(|p| {
        let first = p.trade1.actor_id.as_str();
        let second = (p.trade2.actor_id != p.trade1.actor_id).then_some(p.trade2.actor_id.as_str());
        std::iter::once(first).chain(second)
    });

    let mut actors: Vec<ActorCount> = tally(appearances)
        .into_iter()
        .filter(|(_, count)| *count >= FREQUENT_ACTOR_MIN_PAIRS)
        .map(|(actor, count)| ActorCount {
            actor_id: actor.to_string(),
            count,
        })
        .collect();
    actors.sort_by(|a, b| b.count.cmp(&a.count));
    actors
}

/// Leg-1 entry hours whose pair count reaches [`PEAK_HOUR_RATIO`] of the
/// busiest hour.
pub fn peak_hours(pairs: &[HedgePair]) -> Vec<HourCount> {
    let hours = tally(pairs.iter().filter_map(|p| entry_hour(&p.trade1)));
    let Some(max) = hours.iter().map(|(_, count)| *count).max() else {
        return Vec::new();
    };
    let cutoff = max as f64 * PEAK_HOUR_RATIO;

    let mut peaks: Vec<HourCount> = hours
        .into_iter()
        .filter(|(_, count)| *count as f64 >= cutoff)
        .map(|(hour, count)| HourCount {
            hour,
            count,
            percentage: percentage(count, pairs.len()),
        })
        .collect();
    peaks.sort_by(|a, b| b.count.cmp(&a.count));
    peaks
}

/// Pair count per canonical instrument, largest first.
pub fn instrument_distribution(pairs: &[HedgePair]) -> Vec<InstrumentShare> {
    let mut shares: Vec<InstrumentShare> = tally(pairs.iter().map(|p| p.instrument.as_str()))
        .into_iter()
        .map(|(instrument, count)| InstrumentShare {
            instrument: instrument.to_string(),
            count,
            percentage: percentage(count, pairs.len()),
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

pub fn find_patterns(pairs: &[HedgePair]) -> NotablePatterns {
    NotablePatterns {
        frequent_actors: frequent_actors(pairs),
        peak_hours: peak_hours(pairs),
        instrument_distribution: instrument_distribution(pairs),
    }
}
