use std::collections::HashSet;

use super::percentage;
use crate::ingestion::enrich::{COL_ACCOUNT, COL_ACTOR};
use crate::ingestion::TradeTable;
use crate::models::{HedgePair, HedgeType, SummaryStats};

/// Distinct actors and accounts in the full, unfiltered trade table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Population {
    pub actors: usize,
    pub accounts: usize,
}

impl Population {
    /// Counted over every raw row, including rows later excluded from matching.
    pub fn from_table(table: &TradeTable) -> Self {
        Self {
            actors: table.distinct_count(COL_ACTOR),
            accounts: table.distinct_count(COL_ACCOUNT),
        }
    }
}

/// Summary counts over the accepted pairs.
///
/// Zero pairs yield all-zero stats. Percentages use the population's distinct
/// actors/accounts as denominators and fall back to zero for an empty population.
pub fn summarize(pairs: &[HedgePair], population: Population) -> SummaryStats {
    if pairs.is_empty() {
        return SummaryStats::default();
    }

    let self_hedges = pairs
        .iter()
        .filter(|p| p.hedge_type == HedgeType::SelfHedge)
        .count();

    let avg_confidence = pairs.iter().map(|p| p.confidence).sum::<f64>() / pairs.len() as f64;

    let mut actors: HashSet<&str> = HashSet::new();
    let mut accounts: HashSet<&str> = HashSet::new();
    for pair in pairs {
        actors.insert(&pair.trade1.actor_id);
        actors.insert(&pair.trade2.actor_id);
        accounts.insert(&pair.trade1.account_id);
        accounts.insert(&pair.trade2.account_id);
    }

    SummaryStats {
        total_hedges: pairs.len(),
        self_hedges,
        cross_actor_hedges: pairs.len() - self_hedges,
        avg_confidence,
        actors_involved: actors.len(),
        accounts_involved: accounts.len(),
        actors_percentage: percentage(actors.len(), population.actors),
        accounts_percentage: percentage(accounts.len(), population.accounts),
    }
}
