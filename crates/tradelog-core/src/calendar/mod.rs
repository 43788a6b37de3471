pub mod matrix;
pub mod shading;
pub mod summary;
pub mod view;

pub use matrix::{month_bounds, month_matrix, MonthMatrix, Week};
pub use shading::{shade_for_pnl, HeatShade};
pub use summary::{
    analyze_period, summarize_period, DayExtreme, DayLevelStats, HeadlineStats, MonthSummary,
    Period, PeriodSummary, PeriodSummaryInput, StatBasis, TradeLevelSource, TradeLevelStats,
    YearMonth,
};
pub use view::{build_month_view, DayCell, MonthView, MonthViewInput, WeekRow};
