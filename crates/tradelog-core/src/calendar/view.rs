use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::matrix::month_matrix;
use super::shading::{shade_for_pnl, HeatShade};
use super::summary::MonthSummary;
use crate::{trades::*, types::*, TradeLogResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCell {
    pub date: NaiveDate,
    /// None when no snapshot exists for the day
    pub net_pnl: Option<Money>,
    pub trade_count: u32,
    pub shade: HeatShade,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekRow {
    /// Seven cells, Monday first; None outside the month
    pub cells: Vec<Option<DayCell>>,
    pub net_pnl: Money,
    pub trade_count: u32,
}

/// A month laid out for display, with heat shades and weekly totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<WeekRow>,
    pub summary: Option<MonthSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthViewInput {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub days: Vec<DaySnapshot>,
    pub month_summary: Option<MonthSummary>,
}

/// Join day snapshots onto the month grid. Snapshots outside the month are
/// ignored; when a date appears twice the later snapshot wins.
pub fn build_month_view(
    year: i32,
    month: u32,
    days: &[DaySnapshot],
    month_summary: Option<&MonthSummary>,
) -> TradeLogResult<MonthView> {
    let matrix = month_matrix(year, month)?;
    let by_date: HashMap<NaiveDate, &DaySnapshot> = days.iter().map(|d| (d.date, d)).collect();

    let weeks = matrix
        .weeks
        .iter()
        .map(|week| {
            let cells: Vec<Option<DayCell>> = week
                .iter()
                .map(|slot| {
                    slot.map(|date| {
                        let snap = by_date.get(&date);
                        let net_pnl = snap.map(|s| s.net_pnl);
                        DayCell {
                            date,
                            net_pnl,
                            trade_count: snap.map_or(0, |s| s.trade_count),
                            shade: shade_for_pnl(net_pnl),
                        }
                    })
                })
                .collect();
            let net_pnl = cells
                .iter()
                .flatten()
                .filter_map(|c| c.net_pnl)
                .sum::<Decimal>();
            let trade_count = cells.iter().flatten().map(|c| c.trade_count).sum();
            WeekRow {
                cells,
                net_pnl,
                trade_count,
            }
        })
        .collect();

    let summary = month_summary
        .filter(|s| s.year == year && s.month == month)
        .cloned();
    if month_summary.is_some() && summary.is_none() {
        tracing::debug!(year, month, "month summary for a different month dropped");
    }

    Ok(MonthView {
        year,
        month,
        weeks,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snap(day: u32, trades: u32, net: Decimal) -> DaySnapshot {
        let date = NaiveDate::from_ymd_opt(2024, 2, day).unwrap();
        DaySnapshot {
            date,
            trade_count: trades,
            net_pnl: net,
            gross_profit: Decimal::ZERO,
            gross_loss: Decimal::ZERO,
            win_count: 0,
            loss_count: 0,
            win_rate: Decimal::ZERO,
            profit_factor: ProfitFactor::default(),
            best_trade: Decimal::ZERO,
            worst_trade: Decimal::ZERO,
        }
    }

    #[test]
    fn test_view_shades_and_week_totals() {
        // Feb 2024 starts on a Thursday
        let days = vec![
            snap(1, 2, dec!(600)),
            snap(2, 1, dec!(-12000)),
            snap(5, 3, dec!(100)),
        ];
        let view = build_month_view(2024, 2, &days, None).unwrap();
        assert_eq!(view.weeks.len(), 5);

        let first = &view.weeks[0];
        assert!(first.cells[0].is_none());
        let thu = first.cells[3].as_ref().unwrap();
        assert_eq!(thu.shade, HeatShade::Profit2);
        let fri = first.cells[4].as_ref().unwrap();
        assert_eq!(fri.shade, HeatShade::Loss5);
        let sat = first.cells[5].as_ref().unwrap();
        assert_eq!(sat.net_pnl, None);
        assert_eq!(sat.shade, HeatShade::Neutral);
        assert_eq!(first.net_pnl, dec!(-11400));
        assert_eq!(first.trade_count, 3);

        assert_eq!(view.weeks[1].net_pnl, dec!(100));
        assert_eq!(view.weeks[1].cells[0].as_ref().unwrap().shade, HeatShade::Profit1);
    }

    #[test]
    fn test_view_ignores_other_months() {
        let mut other = snap(1, 1, dec!(50));
        other.date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let view = build_month_view(2024, 2, &[other], None).unwrap();
        assert!(view
            .weeks
            .iter()
            .all(|w| w.net_pnl.is_zero() && w.trade_count == 0));
    }

    #[test]
    fn test_view_keeps_matching_summary_only() {
        let summary = MonthSummary {
            year: 2024,
            month: 2,
            total_trades: 6,
            net_pnl: dec!(700),
            win_rate: dec!(0.5),
            profit_factor: ProfitFactor::Finite(dec!(1.4)),
        };
        let view = build_month_view(2024, 2, &[], Some(&summary)).unwrap();
        assert_eq!(view.summary, Some(summary.clone()));

        let view = build_month_view(2024, 3, &[], Some(&summary)).unwrap();
        assert!(view.summary.is_none());
    }

    #[test]
    fn test_view_rejects_bad_month() {
        assert!(build_month_view(2024, 0, &[], None).is_err());
    }
}
