use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::stats::InsightStats;
use crate::types::*;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Issue,
    Optimization,
    Positive,
}

impl InsightCategory {
    /// Ranking weight; large enough that category always beats severity.
    pub fn weight(&self) -> u32 {
        match self {
            InsightCategory::Issue => 1000,
            InsightCategory::Optimization => 500,
            InsightCategory::Positive => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightCandidate {
    pub rule: String,
    pub text: String,
    pub severity: u8,
    pub category: InsightCategory,
}

impl InsightCandidate {
    pub fn rank_key(&self) -> (u32, u8) {
        (self.category.weight(), self.severity)
    }
}

/// One heuristic: when `applies` holds, `render` produces the insight text.
pub struct Rule {
    pub id: &'static str,
    pub category: InsightCategory,
    pub severity: u8,
    pub applies: fn(&InsightStats) -> bool,
    pub render: fn(&InsightStats) -> String,
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

pub static RULES: &[Rule] = &[
    // -- Issues -------------------------------------------------------------
    Rule {
        id: "losses_exceed_profits",
        category: InsightCategory::Issue,
        severity: 10,
        applies: |s| s.total_trades > 0 && s.profit_factor.is_below(dec!(1)),
        render: |s| {
            format!(
                "Losses exceeded profits: profit factor {} across {} trades.",
                s.profit_factor, s.total_trades
            )
        },
    },
    Rule {
        id: "fee_drag_severe",
        category: InsightCategory::Issue,
        severity: 9,
        applies: |s| s.fee_drag().is_some_and(|d| d >= dec!(0.18)),
        render: |s| {
            format!(
                "Fees of {} consumed {}% of gross profit.",
                money(s.fee_total),
                pct(s.fee_drag().unwrap_or_default())
            )
        },
    },
    Rule {
        id: "payoff_inverted",
        category: InsightCategory::Issue,
        severity: 8,
        applies: |s| {
            s.average_loss > Decimal::ZERO && s.average_win < s.average_loss
        },
        render: |s| {
            format!(
                "Average loss ({}) is larger than average win ({}); reward-to-risk is below 1.",
                money(s.average_loss),
                money(s.average_win)
            )
        },
    },
    Rule {
        id: "low_hit_rate_no_payoff",
        category: InsightCategory::Issue,
        severity: 7,
        applies: |s| {
            s.total_trades > 0
                && s.win_rate < dec!(0.40)
                && s.payoff_ratio().is_some_and(|r| r < dec!(1.5))
        },
        render: |s| {
            format!(
                "A {}% win rate needs bigger winners; payoff ratio is only {}.",
                pct(s.win_rate),
                s.payoff_ratio().unwrap_or_default().round_dp(2)
            )
        },
    },
    Rule {
        id: "loss_streak",
        category: InsightCategory::Issue,
        severity: 7,
        applies: |s| s.max_loss_streak >= 3,
        render: |s| {
            format!(
                "{} consecutive losses in a row; consider a stop-after-losses rule.",
                s.max_loss_streak
            )
        },
    },
    Rule {
        id: "losers_held_longer",
        category: InsightCategory::Issue,
        severity: 7,
        applies: |s| s.hold_ratio().is_some_and(|r| r >= dec!(1.5)),
        render: |s| {
            format!(
                "Losing trades were held {} min on average versus {} min for winners.",
                minutes(s.avg_hold_losers_minutes),
                minutes(s.avg_hold_winners_minutes)
            )
        },
    },
    Rule {
        id: "thin_edge",
        category: InsightCategory::Issue,
        severity: 6,
        applies: |s| {
            s.profit_factor
                .value()
                .is_some_and(|pf| pf >= dec!(1) && pf < dec!(1.15))
        },
        render: |s| {
            format!(
                "Thin edge: profit factor {} leaves little room for slippage and fees.",
                s.profit_factor
            )
        },
    },
    Rule {
        id: "fee_drag",
        category: InsightCategory::Issue,
        severity: 6,
        applies: |s| {
            s.fee_drag()
                .is_some_and(|d| d >= dec!(0.10) && d < dec!(0.18))
        },
        render: |s| {
            format!(
                "Fees took {}% of gross profit; review commissions and trade frequency.",
                pct(s.fee_drag().unwrap_or_default())
            )
        },
    },
    Rule {
        id: "symbol_concentration",
        category: InsightCategory::Issue,
        severity: 6,
        applies: |s| s.concentration().is_some_and(|(_, share)| share >= dec!(0.65)),
        render: |s| match s.concentration() {
            Some((sym, share)) => format!(
                "{} accounts for {}% of your total absolute result; concentration risk.",
                sym.symbol,
                pct(share)
            ),
            None => String::new(),
        },
    },
    // -- Optimizations ------------------------------------------------------
    Rule {
        id: "side_bleed",
        category: InsightCategory::Optimization,
        severity: 6,
        applies: |s| {
            (s.long.net_pnl > Decimal::ZERO && s.short.net_pnl < Decimal::ZERO)
                || (s.short.net_pnl > Decimal::ZERO && s.long.net_pnl < Decimal::ZERO)
        },
        render: |s| {
            let (losing, lost, winning, made) = if s.short.net_pnl < Decimal::ZERO {
                ("Short", s.short.net_pnl, "longs", s.long.net_pnl)
            } else {
                ("Long", s.long.net_pnl, "shorts", s.short.net_pnl)
            };
            format!(
                "{losing} trades lost {} while {winning} made {}; lean into the side that works.",
                money(lost.abs()),
                money(made)
            )
        },
    },
    Rule {
        id: "afternoon_giveback",
        category: InsightCategory::Optimization,
        severity: 6,
        applies: |s| s.morning.net_pnl > Decimal::ZERO && s.afternoon.net_pnl < Decimal::ZERO,
        render: |s| {
            format!(
                "Afternoon trading gave back {} of the {} made before noon.",
                money(s.afternoon.net_pnl.abs()),
                money(s.morning.net_pnl)
            )
        },
    },
    Rule {
        id: "worst_symbol",
        category: InsightCategory::Optimization,
        severity: 6,
        applies: |s| s.worst_symbol().is_some_and(|w| w.net_pnl < Decimal::ZERO),
        render: |s| match s.worst_symbol() {
            Some(w) => format!(
                "{} was your weakest symbol at {}; review those setups.",
                w.symbol,
                money(w.net_pnl)
            ),
            None => String::new(),
        },
    },
    Rule {
        id: "morning_drag",
        category: InsightCategory::Optimization,
        severity: 5,
        applies: |s| s.morning.net_pnl < Decimal::ZERO && s.afternoon.net_pnl > Decimal::ZERO,
        render: |s| {
            format!(
                "Morning trades lost {} while afternoon trades made {}; let the open settle first.",
                money(s.morning.net_pnl.abs()),
                money(s.afternoon.net_pnl)
            )
        },
    },
    Rule {
        id: "marginal_profit_factor",
        category: InsightCategory::Optimization,
        severity: 5,
        applies: |s| {
            s.profit_factor
                .value()
                .is_some_and(|pf| pf >= dec!(1) && pf < dec!(1.3))
        },
        render: |s| {
            format!(
                "Profit factor {} is positive but marginal; cutting the weakest setups would widen it.",
                s.profit_factor
            )
        },
    },
    Rule {
        id: "open_exposure",
        category: InsightCategory::Optimization,
        severity: 4,
        applies: |s| s.open_positions > 0,
        render: |s| {
            format!(
                "{} open position(s) carry risk not reflected in realized results.",
                s.open_positions
            )
        },
    },
    Rule {
        id: "one_sided",
        category: InsightCategory::Optimization,
        severity: 3,
        applies: |s| one_sided_share(s).is_some_and(|(_, share)| share >= dec!(0.8)),
        render: |s| match one_sided_share(s) {
            Some((side, share)) => format!(
                "{}% of trades were {side}; results hinge on one direction.",
                pct(share)
            ),
            None => String::new(),
        },
    },
    // -- Positives ----------------------------------------------------------
    Rule {
        id: "net_positive",
        category: InsightCategory::Positive,
        severity: 8,
        applies: |s| s.net_pnl > Decimal::ZERO,
        render: |s| format!("Net profitable: {} realized.", money(s.net_pnl)),
    },
    Rule {
        id: "strong_profit_factor",
        category: InsightCategory::Positive,
        severity: 7,
        applies: |s| s.gross_profit > Decimal::ZERO && s.profit_factor.is_at_least(dec!(2)),
        render: |s| format!("Strong profit factor of {}.", s.profit_factor),
    },
    Rule {
        id: "high_hit_rate",
        category: InsightCategory::Positive,
        severity: 6,
        applies: |s| s.total_trades >= 5 && s.win_rate >= dec!(0.60),
        render: |s| {
            format!(
                "{}% of {} trades were winners.",
                pct(s.win_rate),
                s.total_trades
            )
        },
    },
    Rule {
        id: "best_symbol",
        category: InsightCategory::Positive,
        severity: 6,
        applies: |s| s.best_symbol().is_some_and(|b| b.net_pnl > Decimal::ZERO),
        render: |s| match s.best_symbol() {
            Some(b) => format!("{} was your best symbol with {}.", b.symbol, money(b.net_pnl)),
            None => String::new(),
        },
    },
    Rule {
        id: "winners_run",
        category: InsightCategory::Positive,
        severity: 5,
        applies: |s| {
            matches!(
                (s.avg_hold_winners_minutes, s.avg_hold_losers_minutes),
                (Some(w), Some(l)) if l > Decimal::ZERO && w >= l * dec!(2)
            )
        },
        render: |s| {
            format!(
                "Winners were held {} min versus {} min for losers; profits are allowed to run.",
                minutes(s.avg_hold_winners_minutes),
                minutes(s.avg_hold_losers_minutes)
            )
        },
    },
    Rule {
        id: "strong_payoff",
        category: InsightCategory::Positive,
        severity: 5,
        applies: |s| s.payoff_ratio().is_some_and(|r| r >= dec!(2)),
        render: |s| {
            format!(
                "Average win is {}x the average loss.",
                s.payoff_ratio().unwrap_or_default().round_dp(2)
            )
        },
    },
    Rule {
        id: "fee_efficient",
        category: InsightCategory::Positive,
        severity: 3,
        applies: |s| {
            s.fee_total > Decimal::ZERO && s.fee_drag().is_some_and(|d| d < dec!(0.05))
        },
        render: |s| {
            format!(
                "Costs are under control: fees were {}% of gross profit.",
                pct(s.fee_drag().unwrap_or_default())
            )
        },
    },
];

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Run every rule once against the statistics, in table order.
pub fn evaluate_rules(stats: &InsightStats) -> Vec<InsightCandidate> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(stats))
        .map(|rule| InsightCandidate {
            rule: rule.id.to_string(),
            text: (rule.render)(stats),
            severity: rule.severity,
            category: rule.category,
        })
        .filter(|c| !c.text.is_empty())
        .collect()
}

fn money(v: Money) -> String {
    let v = v.round_dp(2);
    if v < Decimal::ZERO {
        format!("-${:.2}", v.abs())
    } else {
        format!("${v:.2}")
    }
}

fn pct(rate: Rate) -> String {
    (rate * dec!(100)).round_dp(1).normalize().to_string()
}

fn minutes(v: Option<Decimal>) -> String {
    v.unwrap_or_default().round_dp(0).to_string()
}

fn one_sided_share(s: &InsightStats) -> Option<(&'static str, Rate)> {
    let total = s.long.trades + s.short.trades;
    if s.total_trades < 5 || total == 0 {
        return None;
    }
    let (side, count) = if s.long.trades >= s.short.trades {
        ("long", s.long.trades)
    } else {
        ("short", s.short.trades)
    };
    Some((side, Decimal::from(count) / Decimal::from(total)))
}
