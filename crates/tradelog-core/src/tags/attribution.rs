use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::{trades::*, types::*};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Attribution for one behavioral tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRow {
    pub tag: String,
    /// Every time the tag appears, duplicates included
    pub occurrences: u32,
    /// Distinct trades (by identity key) carrying the tag
    pub trade_count: u32,
    /// Cost for mistake tags (sum of |pnl| over losing trades), profit for
    /// good-practice tags (sum of pnl over winning trades). Each trade counts once.
    pub amount: Money,
    /// amount / total for the tag family; zero when the total is zero
    pub share_of_total: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagAttribution {
    pub mistakes: Vec<TagRow>,
    pub good_practices: Vec<TagRow>,
    /// Cost from poor decisions: each losing trade with any mistake tag, once
    pub total_mistake_cost: Money,
    pub total_good_practice_profit: Money,
    /// Mistake tag with the highest cost (ties: more occurrences)
    pub top_drag: Option<TagRow>,
    /// Good-practice tag with the highest profit (ties: more occurrences)
    pub top_edge: Option<TagRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Attribute realized losses to mistake tags and realized profits to
/// good-practice tags, deduplicating trades by identity key.
pub fn tag_attribution(trades: &[ExecutedTrade]) -> TagAttribution {
    let (mistakes, total_mistake_cost) =
        attribute(trades, |t| &t.mistakes, |t| loss_magnitude(t.pnl));
    let (good_practices, total_good_practice_profit) =
        attribute(trades, |t| &t.good_practices, |t| t.pnl.max(Decimal::ZERO));

    let top_drag = leader(&mistakes);
    let top_edge = leader(&good_practices);

    TagAttribution {
        mistakes,
        good_practices,
        total_mistake_cost,
        total_good_practice_profit,
        top_drag,
        top_edge,
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Bucket<'a> {
    occurrences: u32,
    trades: HashSet<TradeKey<'a>>,
    amount: Money,
}

fn loss_magnitude(pnl: Money) -> Money {
    if pnl < Decimal::ZERO {
        pnl.abs()
    } else {
        Decimal::ZERO
    }
}

/// One pass over the trades for a tag family. Returns the sorted table and
/// the family total, where each trade contributes at most once.
fn attribute<'a>(
    trades: &'a [ExecutedTrade],
    tags_of: impl Fn(&'a ExecutedTrade) -> &'a Vec<String>,
    contribution: impl Fn(&ExecutedTrade) -> Money,
) -> (Vec<TagRow>, Money) {
    let mut buckets: BTreeMap<&'a str, Bucket<'a>> = BTreeMap::new();
    let mut counted: HashSet<TradeKey<'a>> = HashSet::new();
    let mut total = Decimal::ZERO;

    for trade in trades {
        let key = trade.key();
        let amount = contribution(trade);
        let mut tagged = false;

        for tag in tags_of(trade)
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
        {
            tagged = true;
            let bucket = buckets.entry(tag).or_default();
            bucket.occurrences += 1;
            if bucket.trades.insert(key) {
                bucket.amount += amount;
            }
        }

        if tagged && counted.insert(key) {
            total += amount;
        }
    }

    let mut rows: Vec<TagRow> = buckets
        .into_iter()
        .map(|(tag, b)| TagRow {
            tag: tag.to_string(),
            occurrences: b.occurrences,
            trade_count: b.trades.len() as u32,
            amount: b.amount,
            share_of_total: if total > Decimal::ZERO {
                b.amount / total
            } else {
                Decimal::ZERO
            },
        })
        .collect();

    // BTreeMap order keeps ties alphabetical under the stable sort
    rows.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| b.occurrences.cmp(&a.occurrences))
    });

    (rows, total)
}

fn leader(rows: &[TagRow]) -> Option<TagRow> {
    rows.first().filter(|r| r.amount > Decimal::ZERO).cloned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
