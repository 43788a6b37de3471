use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::attribution::{tag_attribution, TagAttribution};
use super::session::{session_metrics, SessionMetrics};
use crate::{trades::*, types::*, TradeLogResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagImpactInput {
    pub trades: Vec<ExecutedTrade>,
    /// Broker-exact net P&L for the session, preferred over the trade sum
    pub broker_net_pnl: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagImpactOutput {
    pub attribution: TagAttribution,
    pub session: SessionMetrics,
}

/// Per-tag cost/profit tables plus the session metrics they feed into.
///
/// An empty trade list is valid and produces zeroed tables.
pub fn analyze_tag_impact(
    input: &TagImpactInput,
) -> TradeLogResult<ComputationOutput<TagImpactOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let attribution = tag_attribution(&input.trades);
    let session = session_metrics(
        &input.trades,
        input.broker_net_pnl,
        attribution.total_mistake_cost,
    );

    if session.duplicate_keys > 0 {
        warnings.push(format!(
            "{} trade(s) repeat an earlier identity key; tag amounts count them once",
            session.duplicate_keys
        ));
    }
    let untagged = input
        .trades
        .iter()
        .filter(|t| t.mistakes.is_empty() && t.good_practices.is_empty())
        .count();
    if untagged > 0 {
        warnings.push(format!(
            "{untagged} of {} trade(s) carry no tags",
            input.trades.len()
        ));
    }

    tracing::debug!(
        trades = input.trades.len(),
        mistake_tags = attribution.mistakes.len(),
        good_practice_tags = attribution.good_practices.len(),
        "tag impact computed"
    );

    let output = TagImpactOutput {
        attribution,
        session,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "identity_key": "symbol + entry timestamp + exit timestamp",
        "mistake_cost": "sum of |pnl| over distinct losing trades carrying the tag",
        "good_practice_profit": "sum of pnl over distinct winning trades carrying the tag",
        "drawdown": "peak-to-trough on cumulative P&L in exit order",
        "potential_pnl": "actual net P&L + total mistake cost (additive by convention)",
    });

    Ok(with_metadata(
        "Behavioral Tag Attribution",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
