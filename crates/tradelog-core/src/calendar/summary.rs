use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Instant;

use super::matrix::month_bounds;
use crate::{trades::*, types::*, TradeLogError, TradeLogResult};

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// The span of days a summary covers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Period {
    Month { year: i32, month: u32 },
    Months { months: Vec<YearMonth> },
    Range { start: NaiveDate, end: NaiveDate },
}

/// Month-level statistics computed by the backend from individual trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub total_trades: u32,
    pub net_pnl: Money,
    /// 0-1, trade level
    pub win_rate: Rate,
    pub profit_factor: ProfitFactor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSummaryInput {
    pub period: Period,
    pub days: Vec<DaySnapshot>,
    #[serde(default)]
    pub month_summaries: Vec<MonthSummary>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Which formula the headline win rate and profit factor follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatBasis {
    /// Counted over individual trades
    TradeLevel,
    /// Counted over trading days
    DayLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeLevelSource {
    BackendMonth,
    Snapshots,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineStats {
    pub total_trades: u32,
    pub net_pnl: Money,
    pub win_rate: Rate,
    pub profit_factor: ProfitFactor,
    pub basis: StatBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLevelStats {
    pub trading_days: u32,
    pub winning_days: u32,
    pub losing_days: u32,
    /// winning days / trading days
    pub win_rate: Rate,
    /// sum of positive day P&L / sum of |negative day P&L|
    pub profit_factor: ProfitFactor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeLevelStats {
    pub total_trades: u32,
    pub win_rate: Rate,
    pub profit_factor: ProfitFactor,
    pub source: TradeLevelSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayExtreme {
    pub date: NaiveDate,
    pub net_pnl: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub headline: HeadlineStats,
    pub day_level: DayLevelStats,
    /// None when the snapshots carry no win/loss counts to rebuild it from
    pub trade_level: Option<TradeLevelStats>,
    pub best_day: Option<DayExtreme>,
    pub worst_day: Option<DayExtreme>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Summarize the snapshots that fall inside the period.
///
/// A single calendar month with a matching backend record takes the
/// record's totals, win rate and profit factor verbatim (trade level). Any
/// other period is re-derived from the day sequence (day level). Both views
/// are returned so callers never compare one with the other by accident.
pub fn summarize_period(input: &PeriodSummaryInput) -> TradeLogResult<PeriodSummary> {
    let span = PeriodSpan::resolve(&input.period)?;

    let mut days: Vec<&DaySnapshot> = input
        .days
        .iter()
        .filter(|d| span.contains(d.date))
        .collect();
    days.sort_by_key(|d| d.date);

    let day_level = day_level_stats(&days);
    let (best_day, worst_day) = day_extremes(&days);

    let backend = span.single_month.and_then(|ym| {
        input
            .month_summaries
            .iter()
            .find(|m| m.year == ym.year && m.month == ym.month)
    });

    let (headline, trade_level) = match backend {
        Some(month) => (
            HeadlineStats {
                total_trades: month.total_trades,
                net_pnl: month.net_pnl,
                win_rate: month.win_rate,
                profit_factor: month.profit_factor,
                basis: StatBasis::TradeLevel,
            },
            Some(TradeLevelStats {
                total_trades: month.total_trades,
                win_rate: month.win_rate,
                profit_factor: month.profit_factor,
                source: TradeLevelSource::BackendMonth,
            }),
        ),
        None => (
            HeadlineStats {
                total_trades: days.iter().map(|d| d.trade_count).sum(),
                net_pnl: days.iter().map(|d| d.net_pnl).sum(),
                win_rate: day_level.win_rate,
                profit_factor: day_level.profit_factor,
                basis: StatBasis::DayLevel,
            },
            trade_level_from_snapshots(&days),
        ),
    };

    Ok(PeriodSummary {
        start: span.start,
        end: span.end,
        headline,
        day_level,
        trade_level,
        best_day,
        worst_day,
    })
}

/// [`summarize_period`] wrapped in the standard envelope.
pub fn analyze_period(
    input: &PeriodSummaryInput,
) -> TradeLogResult<ComputationOutput<PeriodSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let summary = summarize_period(input)?;

    let span = PeriodSpan::resolve(&input.period)?;
    let outside = input.days.iter().filter(|d| !span.contains(d.date)).count();
    if outside > 0 {
        warnings.push(format!("{outside} snapshot(s) outside the period were ignored"));
    }
    if summary.headline.basis == StatBasis::DayLevel && summary.trade_level.is_some() {
        warnings.push(
            "Headline win rate and profit factor are day level; see trade_level for the per-trade figures"
                .into(),
        );
    }

    tracing::debug!(
        start = %summary.start,
        end = %summary.end,
        basis = ?summary.headline.basis,
        "period summarized"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "single_month": "backend month record used verbatim when supplied",
        "other_periods": "re-derived from day snapshots",
        "day_win_rate": "days with net > 0 / days with trades",
        "day_profit_factor": "sum of winning day net / sum of |losing day net|",
        "best_worst_day": "max / min net over days with trades; earliest wins ties",
    });

    Ok(with_metadata(
        "Calendar Period Summary",
        &assumptions,
        warnings,
        elapsed,
        summary,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

struct PeriodSpan {
    start: NaiveDate,
    end: NaiveDate,
    /// Set for `Months`, where the span may have gaps
    months: Option<BTreeSet<YearMonth>>,
    single_month: Option<YearMonth>,
}

impl PeriodSpan {
    fn resolve(period: &Period) -> TradeLogResult<Self> {
        match period {
            Period::Month { year, month } => {
                let (start, end) = month_bounds(*year, *month)?;
                Ok(Self {
                    start,
                    end,
                    months: None,
                    single_month: Some(YearMonth {
                        year: *year,
                        month: *month,
                    }),
                })
            }
            Period::Months { months } => {
                let set: BTreeSet<YearMonth> = months.iter().copied().collect();
                let (Some(first), Some(last)) = (set.first(), set.last()) else {
                    return Err(TradeLogError::InvalidInput {
                        field: "period.months".into(),
                        reason: "At least one month is required.".into(),
                    });
                };
                for ym in &set {
                    month_bounds(ym.year, ym.month)?;
                }
                let (start, _) = month_bounds(first.year, first.month)?;
                let (_, end) = month_bounds(last.year, last.month)?;
                let single_month = if set.len() == 1 { Some(*first) } else { None };
                Ok(Self {
                    start,
                    end,
                    months: Some(set),
                    single_month,
                })
            }
            Period::Range { start, end } => {
                if start > end {
                    return Err(TradeLogError::InvalidInput {
                        field: "period.start".into(),
                        reason: format!("Range start {start} is after end {end}."),
                    });
                }
                let ym = YearMonth::of(*start);
                let (first, last) = month_bounds(ym.year, ym.month)?;
                let single_month = (*start == first && *end == last).then_some(ym);
                Ok(Self {
                    start: *start,
                    end: *end,
                    months: None,
                    single_month,
                })
            }
        }
    }

    fn contains(&self, date: NaiveDate) -> bool {
        if date < self.start || date > self.end {
            return false;
        }
        match &self.months {
            Some(set) => set.contains(&YearMonth::of(date)),
            None => true,
        }
    }
}

fn day_level_stats(days: &[&DaySnapshot]) -> DayLevelStats {
    let trading: Vec<&&DaySnapshot> = days.iter().filter(|d| d.has_trades()).collect();
    let trading_days = trading.len() as u32;
    let winning_days = trading.iter().filter(|d| d.net_pnl > Decimal::ZERO).count() as u32;
    let losing_days = trading.iter().filter(|d| d.net_pnl < Decimal::ZERO).count() as u32;

    let win_rate = if trading_days > 0 {
        Decimal::from(winning_days) / Decimal::from(trading_days)
    } else {
        Decimal::ZERO
    };

    let gains: Money = days
        .iter()
        .map(|d| d.net_pnl)
        .filter(|p| *p > Decimal::ZERO)
        .sum();
    let losses: Money = days
        .iter()
        .map(|d| d.net_pnl)
        .filter(|p| *p < Decimal::ZERO)
        .sum::<Decimal>()
        .abs();

    DayLevelStats {
        trading_days,
        winning_days,
        losing_days,
        win_rate,
        profit_factor: ProfitFactor::from_gross(gains, losses),
    }
}

fn trade_level_from_snapshots(days: &[&DaySnapshot]) -> Option<TradeLevelStats> {
    let total_trades: u32 = days.iter().map(|d| d.trade_count).sum();
    let wins: u32 = days.iter().map(|d| d.win_count).sum();
    let losses: u32 = days.iter().map(|d| d.loss_count).sum();
    if total_trades == 0 || wins + losses == 0 {
        return None;
    }
    let gross_profit: Money = days.iter().map(|d| d.gross_profit).sum();
    let gross_loss: Money = days.iter().map(|d| d.gross_loss.abs()).sum();
    Some(TradeLevelStats {
        total_trades,
        win_rate: Decimal::from(wins) / Decimal::from(total_trades),
        profit_factor: ProfitFactor::from_gross(gross_profit, gross_loss),
        source: TradeLevelSource::Snapshots,
    })
}

/// Best and worst day among days with trades. Earliest day wins ties.
fn day_extremes(days: &[&DaySnapshot]) -> (Option<DayExtreme>, Option<DayExtreme>) {
    let mut best: Option<&DaySnapshot> = None;
    let mut worst: Option<&DaySnapshot> = None;
    for day in days.iter().copied().filter(|d| d.has_trades()) {
        if best.map_or(true, |b| day.net_pnl > b.net_pnl) {
            best = Some(day);
        }
        if worst.map_or(true, |w| day.net_pnl < w.net_pnl) {
            worst = Some(day);
        }
    }
    let extreme = |d: &DaySnapshot| DayExtreme {
        date: d.date,
        net_pnl: d.net_pnl,
    };
    (best.map(extreme), worst.map(extreme))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
