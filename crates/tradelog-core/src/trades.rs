use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::*;

// ---------------------------------------------------------------------------
// Planned trades
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Signed distance from `from` to `to` in the direction that profits.
    pub fn favourable_move(&self, from: Money, to: Money) -> Money {
        match self {
            Direction::Long => to - from,
            Direction::Short => from - to,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    #[default]
    Equity,
    EquityOption,
    Future,
    Forex,
    Crypto,
}

/// Instrument metadata attached to a planned trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentMeta {
    #[serde(default)]
    pub asset_class: AssetClass,
    /// Point value / lot size. 100 for equity options, 50 for ES, 1 for shares.
    #[serde(default = "default_multiplier")]
    pub multiplier: Decimal,
}

fn default_multiplier() -> Decimal {
    Decimal::ONE
}

impl Default for InstrumentMeta {
    fn default() -> Self {
        Self {
            asset_class: AssetClass::default(),
            multiplier: Decimal::ONE,
        }
    }
}

/// A trade as drawn up in the planning form, before execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedTrade {
    pub symbol: String,
    pub direction: Direction,
    #[serde(default)]
    pub entry_price: Money,
    pub stop_price: Option<Money>,
    pub target_price: Option<Money>,
    #[serde(default)]
    pub quantity: Decimal,
    pub instrument: Option<InstrumentMeta>,
}

// ---------------------------------------------------------------------------
// Executed trades
// ---------------------------------------------------------------------------

/// A closed round-trip produced by the import pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutedTrade {
    pub symbol: String,
    pub entry_at: NaiveDateTime,
    pub exit_at: NaiveDateTime,
    pub direction: Direction,
    pub quantity: Decimal,
    /// Realized profit or loss, signed.
    pub pnl: Money,
    #[serde(default)]
    pub fees: Money,
    #[serde(default)]
    pub mistakes: Vec<String>,
    #[serde(default)]
    pub good_practices: Vec<String>,
    pub holding_minutes: Option<i64>,
}

impl ExecutedTrade {
    pub fn key(&self) -> TradeKey<'_> {
        TradeKey {
            symbol: &self.symbol,
            entry_at: self.entry_at,
            exit_at: self.exit_at,
        }
    }

    pub fn is_winner(&self) -> bool {
        self.pnl > Decimal::ZERO
    }

    pub fn is_loser(&self) -> bool {
        self.pnl < Decimal::ZERO
    }

    /// Minutes held: the recorded value when present, otherwise exit - entry.
    pub fn held_minutes(&self) -> i64 {
        self.holding_minutes
            .unwrap_or_else(|| (self.exit_at - self.entry_at).num_minutes())
    }
}

/// Identity of a closed trade: symbol plus entry and exit timestamps
/// (which carry the entry/exit dates and times).
///
/// Two records with equal keys are the same trade, however many tag buckets
/// reference them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TradeKey<'a> {
    pub symbol: &'a str,
    pub entry_at: NaiveDateTime,
    pub exit_at: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// Day snapshots
// ---------------------------------------------------------------------------

/// Per-day statistics, derived once and treated as authoritative for the day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySnapshot {
    pub date: NaiveDate,
    pub trade_count: u32,
    pub net_pnl: Money,
    #[serde(default)]
    pub gross_profit: Money,
    /// Positive magnitude.
    #[serde(default)]
    pub gross_loss: Money,
    #[serde(default)]
    pub win_count: u32,
    #[serde(default)]
    pub loss_count: u32,
    /// 0-1
    #[serde(default)]
    pub win_rate: Rate,
    #[serde(default)]
    pub profit_factor: ProfitFactor,
    #[serde(default)]
    pub best_trade: Money,
    #[serde(default)]
    pub worst_trade: Money,
}

impl DaySnapshot {
    /// Build the snapshot for `date` from the trades that exited on it.
    pub fn from_trades(date: NaiveDate, trades: &[ExecutedTrade]) -> Self {
        let day: Vec<&ExecutedTrade> = trades
            .iter()
            .filter(|t| t.exit_at.date() == date)
            .collect();

        let gross_profit: Money = day.iter().filter(|t| t.is_winner()).map(|t| t.pnl).sum();
        let gross_loss: Money = day
            .iter()
            .filter(|t| t.is_loser())
            .map(|t| t.pnl)
            .sum::<Decimal>()
            .abs();
        let win_count = day.iter().filter(|t| t.is_winner()).count() as u32;
        let loss_count = day.iter().filter(|t| t.is_loser()).count() as u32;
        let trade_count = day.len() as u32;

        let win_rate = if trade_count > 0 {
            Decimal::from(win_count) / Decimal::from(trade_count)
        } else {
            Decimal::ZERO
        };

        Self {
            date,
            trade_count,
            net_pnl: day.iter().map(|t| t.pnl).sum(),
            gross_profit,
            gross_loss,
            win_count,
            loss_count,
            win_rate,
            profit_factor: ProfitFactor::from_gross(gross_profit, gross_loss),
            best_trade: day.iter().map(|t| t.pnl).max().unwrap_or(Decimal::ZERO),
            worst_trade: day.iter().map(|t| t.pnl).min().unwrap_or(Decimal::ZERO),
        }
    }

    pub fn has_trades(&self) -> bool {
        self.trade_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn trade(exit_day: u32, pnl: Decimal) -> ExecutedTrade {
        ExecutedTrade {
            symbol: "AAPL".into(),
            entry_at: at(exit_day, 9, 45),
            exit_at: at(exit_day, 10, 30),
            direction: Direction::Long,
            quantity: dec!(100),
            pnl,
            fees: Decimal::ZERO,
            mistakes: vec![],
            good_practices: vec![],
            holding_minutes: None,
        }
    }

    #[test]
    fn test_favourable_move_by_direction() {
        assert_eq!(Direction::Long.favourable_move(dec!(100), dec!(110)), dec!(10));
        assert_eq!(Direction::Short.favourable_move(dec!(100), dec!(110)), dec!(-10));
    }

    #[test]
    fn test_key_equality_ignores_pnl_and_tags() {
        let a = trade(4, dec!(-500));
        let mut b = trade(4, dec!(-500));
        b.mistakes.push("FOMO".into());
        assert_eq!(a.key(), b.key());

        let c = trade(5, dec!(-500));
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn test_held_minutes_falls_back_to_timestamps() {
        let mut t = trade(4, dec!(10));
        assert_eq!(t.held_minutes(), 45);
        t.holding_minutes = Some(12);
        assert_eq!(t.held_minutes(), 12);
    }

    #[test]
    fn test_snapshot_from_trades() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let trades = vec![
            trade(4, dec!(300)),
            trade(4, dec!(-100)),
            trade(4, dec!(50)),
            trade(5, dec!(999)),
        ];
        let snap = DaySnapshot::from_trades(date, &trades);
        assert_eq!(snap.trade_count, 3);
        assert_eq!(snap.net_pnl, dec!(250));
        assert_eq!(snap.gross_profit, dec!(350));
        assert_eq!(snap.gross_loss, dec!(100));
        assert_eq!(snap.win_count, 2);
        assert_eq!(snap.loss_count, 1);
        assert_eq!(snap.profit_factor, ProfitFactor::Finite(dec!(3.5)));
        assert_eq!(snap.best_trade, dec!(300));
        assert_eq!(snap.worst_trade, dec!(-100));
    }

    #[test]
    fn test_snapshot_without_trades_is_zeroed() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let snap = DaySnapshot::from_trades(date, &[]);
        assert!(!snap.has_trades());
        assert_eq!(snap.win_rate, Decimal::ZERO);
        assert_eq!(snap.profit_factor, ProfitFactor::Finite(Decimal::ZERO));
    }
}
