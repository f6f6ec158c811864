use std::collections::BTreeMap;

use crate::models::Trade;

/// A pair that passed every hard filter, in discovery order.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub first: &'a Trade,
    pub second: &'a Trade,
    pub price_diff: f64,
}

/// Why a pair was rejected. Filters run in this order and stop at the first
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    SameDirection,
    PriceApart,
    NoOverlap,
}

/// Per-run filter counters, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub comparisons: usize,
    pub same_direction: usize,
    pub price_apart: usize,
    pub no_overlap: usize,
    pub candidates: usize,
}

impl MatchStats {
    fn record(&mut self, outcome: Result<f64, Rejection>) {
        self.comparisons += 1;
        match outcome {
            Ok(_) => self.candidates += 1,
            Err(Rejection::SameDirection) => self.same_direction += 1,
            Err(Rejection::PriceApart) => self.price_apart += 1,
            Err(Rejection::NoOverlap) => self.no_overlap += 1,
        }
    }
}

/// Partition trades by canonical instrument. Keys iterate in ascending order;
/// trades keep their input order within a group.
pub fn group_by_instrument(trades: &[Trade]) -> BTreeMap<&str, Vec<&Trade>> {
    let mut groups: BTreeMap<&str, Vec<&Trade>> = BTreeMap::new();
    for trade in trades {
        groups
            .entry(trade.canonical_instrument.as_str())
            .or_default()
            .push(trade);
    }
    groups
}

/// Apply the hard filters to one pair and return the absolute entry-price
/// difference if it is admissible.
///
/// 1. Opposite directions (one LONG, one SHORT).
/// 2. `|entry_a - entry_b| <= price_threshold`, inclusive.
/// 3. Closed `[entry, close]` intervals intersect.
pub fn check_pair(a: &Trade, b: &Trade, price_threshold: f64) -> Result<f64, Rejection> {
    if a.direction == b.direction {
        return Err(Rejection::SameDirection);
    }

    let price_diff = (a.entry_price - b.entry_price).abs();
    if !(price_diff <= price_threshold) {
        return Err(Rejection::PriceApart);
    }

    if !a.overlaps(b) {
        return Err(Rejection::NoOverlap);
    }

    Ok(price_diff)
}

/// Enumerate every unordered pair `{A, B}` with A before B in the group and
/// keep the admissible ones. Quadratic in the group size.
pub fn match_group<'a>(
    group: &[&'a Trade],
    price_threshold: f64,
    stats: &mut MatchStats,
) -> Vec<Candidate<'a>> {
    let mut candidates = Vec::new();

    for (i, &first) in group.iter().enumerate() {
        for &second in &group[i + 1..] {
            let outcome = check_pair(first, second, price_threshold);
            stats.record(outcome);
            if let Ok(price_diff) = outcome {
                candidates.push(Candidate {
                    first,
                    second,
                    price_diff,
                });
            }
        }
    }

    candidates
}
