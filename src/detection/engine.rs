use std::time::Instant;

use metrics::{counter, histogram};

use super::assembler::{assemble_pair, PairSequence, TimestampZone};
use super::matcher::{group_by_instrument, match_group, MatchStats};
use super::scorer::confidence_score;
use crate::analytics::{build_distributions, find_patterns, summarize, Population};
use crate::errors::DetectError;
use crate::ingestion::{enrich_table, TradeTable};
use crate::models::{AnalysisReport, HedgePair, Trade};

/// Scalar inputs of a detection run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    /// Maximum entry-price distance, in price units. Must be positive.
    pub price_threshold: f64,
    /// Minimum confidence for a pair to be kept, in `[0, 1]`.
    pub confidence_threshold: f64,
    pub include_close_price: bool,
    pub timestamp_zone: TimestampZone,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            price_threshold: 5.0,
            confidence_threshold: 0.7,
            include_close_price: true,
            timestamp_zone: TimestampZone::Local,
        }
    }
}

impl DetectionParams {
    pub fn validate(&self) -> Result<(), DetectError> {
        if !self.price_threshold.is_finite() || self.price_threshold <= 0.0 {
            return Err(DetectError::InvalidParameter(format!(
                "price_threshold must be a positive number, got {}",
                self.price_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(DetectError::InvalidParameter(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        Ok(())
    }
}

/// Match, score and assemble pairs over already-enriched trades.
///
/// Groups are visited in ascending instrument order and pairs in discovery
/// order within a group, so ids are deterministic for a given input.
pub fn find_hedge_pairs(
    trades: &[Trade],
    params: &DetectionParams,
) -> Result<Vec<HedgePair>, DetectError> {
    params.validate()?;

    let groups = group_by_instrument(trades);
    let mut sequence = PairSequence::new();
    let mut stats = MatchStats::default();
    let mut pairs = Vec::new();
    let mut below_threshold = 0usize;

    for (instrument, group) in &groups {
        let candidates = match_group(group, params.price_threshold, &mut stats);

        for candidate in &candidates {
            let confidence = confidence_score(
                candidate.first,
                candidate.second,
                candidate.price_diff,
                params.price_threshold,
                params.include_close_price,
            );
            if confidence < params.confidence_threshold {
                below_threshold += 1;
                continue;
            }
            pairs.push(assemble_pair(
                &mut sequence,
                candidate,
                confidence,
                params.timestamp_zone,
            )?);
        }

        tracing::debug!(
            instrument = %instrument,
            trades = group.len(),
            candidates = candidates.len(),
            "Instrument group matched"
        );
    }

    tracing::info!(
        trades = trades.len(),
        groups = groups.len(),
        comparisons = stats.comparisons,
        same_direction = stats.same_direction,
        price_apart = stats.price_apart,
        no_overlap = stats.no_overlap,
        below_threshold,
        pairs = pairs.len(),
        "Hedge matching complete"
    );

    Ok(pairs)
}

/// Validate and enrich a raw table, then find its hedge pairs.
pub fn detect(table: &TradeTable, params: &DetectionParams) -> Result<Vec<HedgePair>, DetectError> {
    params.validate()?;
    let enriched = enrich_table(table)?;

    tracing::info!(
        rows = table.len(),
        eligible = enriched.trades.len(),
        excluded = enriched.excluded,
        "Trade table enriched"
    );

    find_hedge_pairs(&enriched.trades, params)
}

/// Full run: pairs, summary stats, notable patterns and distributions.
pub fn analyze(table: &TradeTable, params: &DetectionParams) -> Result<AnalysisReport, DetectError> {
    let start = Instant::now();
    counter!("analyses_total").increment(1);

    let hedge_pairs = match detect(table, params) {
        Ok(pairs) => pairs,
        Err(e) => {
            counter!("analyses_failed").increment(1);
            tracing::warn!(error = %e, "Hedge analysis failed");
            return Err(e);
        }
    };

    let population = Population::from_table(table);
    let report = AnalysisReport {
        summary_stats: summarize(&hedge_pairs, population),
        notable_patterns: find_patterns(&hedge_pairs),
        distributions: build_distributions(&hedge_pairs),
        hedge_pairs,
    };

    counter!("hedge_pairs_detected").increment(report.hedge_pairs.len() as u64);
    histogram!("analysis_latency_seconds").record(start.elapsed().as_secs_f64());

    Ok(report)
}
