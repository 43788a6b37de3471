use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{trades::*, types::*};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolResult {
    pub symbol: String,
    pub net_pnl: Money,
    #[serde(default)]
    pub trades: u32,
}

/// Trade count and net result for one slice of the session (a side, or a
/// part of the day).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SliceResult {
    pub trades: u32,
    pub net_pnl: Money,
}

/// Aggregate statistics the insight rules read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightStats {
    pub total_trades: u32,
    pub net_pnl: Money,
    pub gross_profit: Money,
    /// Positive magnitude
    pub gross_loss: Money,
    pub profit_factor: ProfitFactor,
    /// 0-1
    pub win_rate: Rate,
    #[serde(default)]
    pub average_win: Money,
    /// Positive magnitude
    #[serde(default)]
    pub average_loss: Money,
    #[serde(default)]
    pub fee_total: Money,
    #[serde(default)]
    pub symbols: Vec<SymbolResult>,
    #[serde(default)]
    pub long: SliceResult,
    #[serde(default)]
    pub short: SliceResult,
    /// Entries before noon
    #[serde(default)]
    pub morning: SliceResult,
    #[serde(default)]
    pub afternoon: SliceResult,
    #[serde(default)]
    pub max_loss_streak: u32,
    pub avg_hold_winners_minutes: Option<Decimal>,
    pub avg_hold_losers_minutes: Option<Decimal>,
    #[serde(default)]
    pub open_positions: u32,
}

impl InsightStats {
    /// Fees as a fraction of gross profit; none without gross profit.
    pub fn fee_drag(&self) -> Option<Rate> {
        if self.gross_profit > Decimal::ZERO {
            Some(self.fee_total / self.gross_profit)
        } else {
            None
        }
    }

    /// Average win / average loss; none without losses.
    pub fn payoff_ratio(&self) -> Option<Rate> {
        if self.average_loss > Decimal::ZERO {
            Some(self.average_win / self.average_loss)
        } else {
            None
        }
    }

    pub fn best_symbol(&self) -> Option<&SymbolResult> {
        self.symbols.iter().max_by(|a, b| a.net_pnl.cmp(&b.net_pnl))
    }

    pub fn worst_symbol(&self) -> Option<&SymbolResult> {
        self.symbols.iter().min_by(|a, b| a.net_pnl.cmp(&b.net_pnl))
    }

    /// The symbol with the largest share of the total absolute result, and
    /// that share. Needs at least two symbols.
    pub fn concentration(&self) -> Option<(&SymbolResult, Rate)> {
        if self.symbols.len() < 2 {
            return None;
        }
        let total: Money = self.symbols.iter().map(|s| s.net_pnl.abs()).sum();
        if total.is_zero() {
            return None;
        }
        self.symbols
            .iter()
            .max_by(|a, b| a.net_pnl.abs().cmp(&b.net_pnl.abs()))
            .map(|s| (s, s.net_pnl.abs() / total))
    }

    /// Average losing hold / average winning hold, when both are known.
    pub fn hold_ratio(&self) -> Option<Rate> {
        match (self.avg_hold_winners_minutes, self.avg_hold_losers_minutes) {
            (Some(w), Some(l)) if w > Decimal::ZERO => Some(l / w),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Derivation from trades
// ---------------------------------------------------------------------------

/// Derive every statistic from closed trades. Morning means an entry before
/// 12:00; loss streaks follow exit order and a break-even trade ends a streak.
pub fn insight_stats_from_trades(trades: &[ExecutedTrade], open_positions: u32) -> InsightStats {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();

    let winners: Vec<&ExecutedTrade> = trades.iter().filter(|t| t.is_winner()).collect();
    let losers: Vec<&ExecutedTrade> = trades.iter().filter(|t| t.is_loser()).collect();

    let gross_profit: Money = winners.iter().map(|t| t.pnl).sum();
    let gross_loss: Money = losers.iter().map(|t| t.pnl).sum::<Decimal>().abs();
    let total_trades = trades.len() as u32;

    let win_rate = if total_trades > 0 {
        Decimal::from(winners.len() as u32) / Decimal::from(total_trades)
    } else {
        Decimal::ZERO
    };

    let mut by_symbol: BTreeMap<&str, SymbolResult> = BTreeMap::new();
    let mut long = SliceResult::default();
    let mut short = SliceResult::default();
    let mut morning = SliceResult::default();
    let mut afternoon = SliceResult::default();

    for trade in trades {
        let entry = by_symbol.entry(trade.symbol.as_str()).or_insert_with(|| SymbolResult {
            symbol: trade.symbol.clone(),
            net_pnl: Decimal::ZERO,
            trades: 0,
        });
        entry.net_pnl += trade.pnl;
        entry.trades += 1;

        let side = match trade.direction {
            Direction::Long => &mut long,
            Direction::Short => &mut short,
        };
        side.trades += 1;
        side.net_pnl += trade.pnl;

        let part = if trade.entry_at.time() < noon {
            &mut morning
        } else {
            &mut afternoon
        };
        part.trades += 1;
        part.net_pnl += trade.pnl;
    }

    let mut symbols: Vec<SymbolResult> = by_symbol.into_values().collect();
    symbols.sort_by(|a, b| b.net_pnl.cmp(&a.net_pnl));

    InsightStats {
        total_trades,
        net_pnl: trades.iter().map(|t| t.pnl).sum(),
        gross_profit,
        gross_loss,
        profit_factor: ProfitFactor::from_gross(gross_profit, gross_loss),
        win_rate,
        average_win: average(gross_profit, winners.len()),
        average_loss: average(gross_loss, losers.len()),
        fee_total: trades.iter().map(|t| t.fees).sum(),
        symbols,
        long,
        short,
        morning,
        afternoon,
        max_loss_streak: max_loss_streak(trades),
        avg_hold_winners_minutes: average_hold(&winners),
        avg_hold_losers_minutes: average_hold(&losers),
        open_positions,
    }
}

fn average(total: Money, count: usize) -> Money {
    if count > 0 {
        total / Decimal::from(count as u64)
    } else {
        Decimal::ZERO
    }
}

fn average_hold(trades: &[&ExecutedTrade]) -> Option<Decimal> {
    if trades.is_empty() {
        return None;
    }
    let total: i64 = trades.iter().map(|t| t.held_minutes()).sum();
    Some(Decimal::from(total) / Decimal::from(trades.len() as u64))
}

fn max_loss_streak(trades: &[ExecutedTrade]) -> u32 {
    let mut ordered: Vec<&ExecutedTrade> = trades.iter().collect();
    ordered.sort_by_key(|t| (t.exit_at, t.entry_at));

    let mut current = 0u32;
    let mut longest = 0u32;
    for trade in ordered {
        if trade.is_loser() {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
