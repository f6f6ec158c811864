use super::patterns::entry_hour;
use super::tally;
use crate::models::{ConfidenceBin, Distributions, HedgePair, RelationshipCount};

const CONFIDENCE_EDGES: [f64; 6] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];
const CONFIDENCE_LABELS: [&str; 5] = ["0.0-0.2", "0.2-0.4", "0.4-0.6", "0.6-0.8", "0.8-1.0"];

/// Five equal-width confidence bins, lower edge inclusive. A score of exactly
/// 1.0 lands in the last bin.
pub fn confidence_bins(pairs: &[HedgePair]) -> Vec<ConfidenceBin> {
    let mut counts = [0usize; 5];
    for pair in pairs {
        let slot = (0..CONFIDENCE_LABELS.len())
            .find(|&i| pair.confidence >= CONFIDENCE_EDGES[i] && pair.confidence < CONFIDENCE_EDGES[i + 1])
            .or((pair.confidence == 1.0).then_some(CONFIDENCE_LABELS.len() - 1));
        if let Some(i) = slot {
            counts[i] += 1;
        }
    }

    CONFIDENCE_LABELS
        .iter()
        .zip(counts)
        .map(|(label, count)| ConfidenceBin {
            label: (*label).to_string(),
            count,
        })
        .collect()
}

/// Pair count for each hour of day (0-23) of the leg-1 entry time.
pub fn hourly_counts(pairs: &[HedgePair]) -> Vec<usize> {
    let mut hours = vec![0usize; 24];
    for hour in pairs.iter().filter_map(|p| entry_hour(&p.trade1)) {
        hours[hour as usize] += 1;
    }
    hours
}

fn relationships<'a, F>(pairs: &'a [HedgePair], key: F) -> Vec<RelationshipCount>
where
    F: Fn(&'a HedgePair) -> (&'a str, &'a str),
{
    let mut rows: Vec<RelationshipCount> = tally(pairs.iter().map(key))
        .into_iter()
        .map(|((first, second), count)| RelationshipCount {
            first: first.to_string(),
            second: second.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Pairs per ordered (leg 1 actor, leg 2 actor).
pub fn actor_pairs(pairs: &[HedgePair]) -> Vec<RelationshipCount> {
    relationships(pairs, |p| (p.trade1.actor_id.as_str(), p.trade2.actor_id.as_str()))
}

/// Pairs per ordered (leg 1 account, leg 2 account).
pub fn account_pairs(pairs: &[HedgePair]) -> Vec<RelationshipCount> {
    relationships(pairs, |p| (p.trade1.account_id.as_str(), p.trade2.account_id.as_str()))
}

pub fn build_distributions(pairs: &[HedgePair]) -> Distributions {
    Distributions {
        confidence: confidence_bins(pairs),
        hourly: hourly_counts(pairs),
        actor_pairs: actor_pairs(pairs),
        account_pairs: account_pairs(pairs),
    }
}
