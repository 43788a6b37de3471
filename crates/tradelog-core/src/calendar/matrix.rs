use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{TradeLogError, TradeLogResult};

/// One calendar row, Monday first.
pub type Week = [Option<NaiveDate>; 7];

/// Week-major grid for a month. Cells outside the month are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthMatrix {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Week>,
}

impl MonthMatrix {
    /// All in-month dates, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.weeks.iter().flat_map(|w| w.iter().flatten().copied())
    }
}

/// First and last day of a month.
pub fn month_bounds(year: i32, month: u32) -> TradeLogResult<(NaiveDate, NaiveDate)> {
    if !(1..=12).contains(&month) {
        return Err(TradeLogError::InvalidInput {
            field: "month".into(),
            reason: format!("Month must be between 1 and 12, got {month}."),
        });
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| TradeLogError::DateError(format!("{year}-{month:02} is out of range")))?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(|| {
        TradeLogError::DateError(format!("{next_year}-{next_month:02} is out of range"))
    })?;
    Ok((first, next_first - Duration::days(1)))
}

/// Build the Monday-first grid for `month` (1-12) of `year`, padded with
/// leading and trailing `None` to whole weeks.
pub fn month_matrix(year: i32, month: u32) -> TradeLogResult<MonthMatrix> {
    let (first, last) = month_bounds(year, month)?;
    let offset = first.weekday().num_days_from_monday() as usize;

    let mut cells: Vec<Option<NaiveDate>> = vec![None; offset];
    cells.extend(first.iter_days().take_while(|d| *d <= last).map(Some));
    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    let weeks = cells
        .chunks(7)
        .map(|chunk| {
            let mut week: Week = [None; 7];
            week.copy_from_slice(chunk);
            week
        })
        .collect();

    Ok(MonthMatrix { year, month, weeks })
}
