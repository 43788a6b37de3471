use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::ranker::rank_insights;
use super::rules::{evaluate_rules, InsightCandidate};
use super::stats::{insight_stats_from_trades, InsightStats};
use crate::{trades::*, types::*, TradeLogError, TradeLogResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightInput {
    /// Precomputed statistics; derived from `trades` when absent
    pub stats: Option<InsightStats>,
    #[serde(default)]
    pub trades: Vec<ExecutedTrade>,
    #[serde(default)]
    pub open_positions: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsSource {
    Supplied,
    DerivedFromTrades,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightOutput {
    pub insights: Vec<InsightCandidate>,
    /// Candidates produced before ranking and deduplication
    pub candidate_count: u32,
    pub stats_source: StatsSource,
    pub stats: InsightStats,
}

/// Evaluate the rule table and return the ranked top insights.
pub fn generate_insights(
    input: &InsightInput,
) -> TradeLogResult<ComputationOutput<InsightOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let (stats, stats_source) = match &input.stats {
        Some(stats) => {
            if !input.trades.is_empty() {
                warnings.push("Both stats and trades supplied; trades were ignored".into());
            }
            (stats.clone(), StatsSource::Supplied)
        }
        None => (
            insight_stats_from_trades(&input.trades, input.open_positions),
            StatsSource::DerivedFromTrades,
        ),
    };

    if stats.win_rate > rust_decimal::Decimal::ONE {
        return Err(TradeLogError::InvalidInput {
            field: "stats.win_rate".into(),
            reason: "Win rate is a fraction between 0 and 1.".into(),
        });
    }
    if stats.total_trades == 0 {
        warnings.push("No closed trades; no insights generated".into());
    }

    let candidates = evaluate_rules(&stats);
    let candidate_count = candidates.len() as u32;
    let insights = rank_insights(candidates);

    tracing::debug!(candidate_count, selected = insights.len(), "insights ranked");

    let output = InsightOutput {
        insights,
        candidate_count,
        stats_source,
        stats,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "ranking": "category weight (issue 1000, optimization 500, positive 0) then severity",
        "buckets": "2 issues, 2 optimizations, 1 positive, then backfill",
        "morning": "entry before 12:00",
        "fee_drag": "fees / gross profit",
    });

    Ok(with_metadata(
        "Heuristic Trade Insights",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
