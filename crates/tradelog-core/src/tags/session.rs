use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{trades::*, types::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetPnlSource {
    /// Broker-exact figure supplied by the caller
    Broker,
    /// Sum of trade P&L
    TradeSum,
}

/// Session quality metrics over the whole trade collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    /// winners / total x 100
    pub hit_rate_pct: Rate,
    pub gross_profit: Money,
    /// Positive magnitude
    pub gross_loss: Money,
    pub profit_factor: ProfitFactor,
    pub average_win: Money,
    pub average_loss: Money,
    pub largest_win: Money,
    pub largest_loss: Money,
    /// Largest peak-to-trough decline of the realized equity curve
    pub max_drawdown: Money,
    pub total_fees: Money,
    pub actual_net_pnl: Money,
    pub net_pnl_source: NetPnlSource,
    /// actual_net_pnl + cost from poor decisions
    pub potential_pnl: Money,
    /// Trades whose identity key repeats an earlier trade
    pub duplicate_keys: u32,
}

/// Compute session metrics. `total_mistake_cost` is the deduplicated cost
/// from [`super::attribution::tag_attribution`].
pub fn session_metrics(
    trades: &[ExecutedTrade],
    broker_net_pnl: Option<Money>,
    total_mistake_cost: Money,
) -> SessionMetrics {
    let total_trades = trades.len() as u32;
    let winning_trades = trades.iter().filter(|t| t.is_winner()).count() as u32;
    let losing_trades = trades.iter().filter(|t| t.is_loser()).count() as u32;

    let gross_profit: Money = trades.iter().filter(|t| t.is_winner()).map(|t| t.pnl).sum();
    let gross_loss: Money = trades
        .iter()
        .filter(|t| t.is_loser())
        .map(|t| t.pnl)
        .sum::<Decimal>()
        .abs();

    let hit_rate_pct = if total_trades > 0 {
        Decimal::from(winning_trades) / Decimal::from(total_trades) * dec!(100)
    } else {
        Decimal::ZERO
    };

    let average_win = if winning_trades > 0 {
        gross_profit / Decimal::from(winning_trades)
    } else {
        Decimal::ZERO
    };
    let average_loss = if losing_trades > 0 {
        gross_loss / Decimal::from(losing_trades)
    } else {
        Decimal::ZERO
    };

    let largest_win = trades
        .iter()
        .map(|t| t.pnl)
        .filter(|p| *p > Decimal::ZERO)
        .max()
        .unwrap_or(Decimal::ZERO);
    let largest_loss = trades
        .iter()
        .map(|t| t.pnl)
        .filter(|p| *p < Decimal::ZERO)
        .map(|p| p.abs())
        .max()
        .unwrap_or(Decimal::ZERO);

    let (actual_net_pnl, net_pnl_source) = match broker_net_pnl {
        Some(net) => (net.round_dp(2), NetPnlSource::Broker),
        None => (trades.iter().map(|t| t.pnl).sum(), NetPnlSource::TradeSum),
    };

    let mut seen = HashSet::with_capacity(trades.len());
    let duplicate_keys = trades.iter().filter(|t| !seen.insert(t.key())).count() as u32;

    SessionMetrics {
        total_trades,
        winning_trades,
        losing_trades,
        hit_rate_pct,
        gross_profit,
        gross_loss,
        profit_factor: ProfitFactor::from_gross(gross_profit, gross_loss),
        average_win,
        average_loss,
        largest_win,
        largest_loss,
        max_drawdown: max_drawdown(trades),
        total_fees: trades.iter().map(|t| t.fees).sum(),
        actual_net_pnl,
        net_pnl_source,
        potential_pnl: actual_net_pnl + total_mistake_cost,
        duplicate_keys,
    }
}

/// Peak-to-trough drawdown of cumulative P&L, walking trades in exit order
/// (entry order breaks ties). The curve starts flat at zero.
pub fn max_drawdown(trades: &[ExecutedTrade]) -> Money {
    let mut ordered: Vec<&ExecutedTrade> = trades.iter().collect();
    ordered.sort_by_key(|t| (t.exit_at, t.entry_at));

    let mut cumulative = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    let mut max_dd = Decimal::ZERO;

    for trade in ordered {
        cumulative += trade.pnl;
        if cumulative > peak {
            peak = cumulative;
        }
        let drawdown = peak - cumulative;
        if drawdown > max_dd {
            max_dd = drawdown;
        }
    }
    max_dd
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 14)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn closed(exit: (u32, u32), pnl: Decimal) -> ExecutedTrade {
        ExecutedTrade {
            symbol: "NQ".into(),
            entry_at: at(9, 30),
            exit_at: at(exit.0, exit.1),
            direction: Direction::Short,
            quantity: dec!(1),
            pnl,
            fees: dec!(2.5),
            mistakes: vec![],
            good_practices: vec![],
            holding_minutes: None,
        }
    }

    #[test]
    fn test_basic_session() {
        let trades = vec![
            closed((10, 0), dec!(300)),
            closed((10, 30), dec!(-100)),
            closed((11, 0), dec!(200)),
            closed((11, 30), dec!(-50)),
        ];
        let m = session_metrics(&trades, None, dec!(100));
        assert_eq!(m.total_trades, 4);
        assert_eq!(m.hit_rate_pct, dec!(50));
        assert_eq!(m.gross_profit, dec!(500));
        assert_eq!(m.gross_loss, dec!(150));
        assert_eq!(m.average_win, dec!(250));
        assert_eq!(m.average_loss, dec!(75));
        assert_eq!(m.largest_loss, dec!(100));
        assert_eq!(m.actual_net_pnl, dec!(350));
        assert_eq!(m.net_pnl_source, NetPnlSource::TradeSum);
        assert_eq!(m.potential_pnl, dec!(450));
        assert_eq!(m.total_fees, dec!(10));
        assert_eq!(m.duplicate_keys, 0);
    }

    #[test]
    fn test_broker_net_preferred_and_rounded() {
        let trades = vec![closed((10, 0), dec!(100))];
        let m = session_metrics(&trades, Some(dec!(97.456)), dec!(20));
        assert_eq!(m.actual_net_pnl, dec!(97.46));
        assert_eq!(m.net_pnl_source, NetPnlSource::Broker);
        assert_eq!(m.potential_pnl, dec!(117.46));
    }

    #[test]
    fn test_profit_factor_sentinels() {
        let wins = vec![closed((10, 0), dec!(100))];
        assert_eq!(session_metrics(&wins, None, Decimal::ZERO).profit_factor, ProfitFactor::Infinite);

        let flat = vec![closed((10, 0), Decimal::ZERO)];
        assert_eq!(
            session_metrics(&flat, None, Decimal::ZERO).profit_factor,
            ProfitFactor::Finite(Decimal::ZERO)
        );
    }

    #[test]
    fn test_drawdown_uses_exit_order() {
        // Out of order on purpose: by exit time the curve is 20, -10, 0, -5
        let trades = vec![
            closed((11, 0), dec!(10)),
            closed((10, 0), dec!(20)),
            closed((11, 30), dec!(-5)),
            closed((10, 30), dec!(-30)),
        ];
        assert_eq!(max_drawdown(&trades), dec!(30));
    }

    #[test]
    fn test_drawdown_zero_for_rising_curve() {
        let trades = vec![
            closed((10, 0), dec!(10)),
            closed((10, 30), Decimal::ZERO),
            closed((11, 0), dec!(5)),
        ];
        assert_eq!(max_drawdown(&trades), Decimal::ZERO);
        assert_eq!(max_drawdown(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_drawdown_from_opening_loss() {
        let trades = vec![closed((10, 0), dec!(-40)), closed((10, 30), dec!(15))];
        assert_eq!(max_drawdown(&trades), dec!(40));
    }

    #[test]
    fn test_duplicate_keys_counted() {
        let trades = vec![closed((10, 0), dec!(-10)), closed((10, 0), dec!(-10))];
        assert_eq!(session_metrics(&trades, None, Decimal::ZERO).duplicate_keys, 1);
    }

    #[test]
    fn test_empty_session() {
        let m = session_metrics(&[], None, Decimal::ZERO);
        assert_eq!(m.hit_rate_pct, Decimal::ZERO);
        assert_eq!(m.max_drawdown, Decimal::ZERO);
        assert_eq!(m.actual_net_pnl, Decimal::ZERO);
    }
}
