use serde::{Deserialize, Serialize};

use super::HedgePair;

/// Summary counts over the accepted pairs relative to the full trade population.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_hedges: usize,
    pub self_hedges: usize,
    pub cross_actor_hedges: usize,
    pub avg_confidence: f64,
    pub actors_involved: usize,
    pub accounts_involved: usize,
    pub actors_percentage: f64,
    pub accounts_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorCount {
    pub actor_id: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentShare {
    pub instrument: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotablePatterns {
    pub frequent_actors: Vec<ActorCount>,
    pub peak_hours: Vec<HourCount>,
    pub instrument_distribution: Vec<InstrumentShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBin {
    pub label: String,
    pub count: usize,
}

/// Count of pairs between an ordered (leg 1, leg 2) combination of ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipCount {
    pub first: String,
    pub second: String,
    pub count: usize,
}

/// Chart-oriented breakdowns of the pair list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distributions {
    pub confidence: Vec<ConfidenceBin>,
    /// Pair count per leg-1 entry hour, index = hour of day.
    pub hourly: Vec<usize>,
    pub actor_pairs: Vec<RelationshipCount>,
    pub account_pairs: Vec<RelationshipCount>,
}

/// Everything a single detection run produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub hedge_pairs: Vec<HedgePair>,
    pub summary_stats: SummaryStats,
    pub notable_patterns: NotablePatterns,
    pub distributions: Distributions,
}
