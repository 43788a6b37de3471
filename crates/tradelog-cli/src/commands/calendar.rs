use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use tradelog_core::calendar::{self, MonthViewInput, PeriodSummaryInput};

use crate::input;

/// Arguments for a period summary
#[derive(Args)]
pub struct PeriodSummaryArgs {
    /// Path to JSON input file ({"period": {...}, "days": [...], "month_summaries": [...]})
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the month grid
#[derive(Args)]
pub struct MonthMatrixArgs {
    /// Calendar year
    #[arg(long)]
    pub year: i32,

    /// Month number, 1-12
    #[arg(long)]
    pub month: u32,
}

/// Arguments for the shaded month view
#[derive(Args)]
pub struct MonthViewArgs {
    /// Path to JSON input file ({"year": .., "month": .., "days": [...]})
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a single heat shade
#[derive(Args)]
pub struct ShadeArgs {
    /// Day net P&L; omit for a day without data
    #[arg(long, allow_hyphen_values = true)]
    pub pnl: Option<Decimal>,
}

pub fn run_period_summary(args: PeriodSummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let summary_input: PeriodSummaryInput = input::load(&args.input, "a period summary")?;
    let result = calendar::analyze_period(&summary_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_month_matrix(args: MonthMatrixArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let matrix = calendar::month_matrix(args.year, args.month)?;
    Ok(json!({ "result": matrix }))
}

pub fn run_month_view(args: MonthViewArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let view_input: MonthViewInput = input::load(&args.input, "a month view")?;
    let view = calendar::build_month_view(
        view_input.year,
        view_input.month,
        &view_input.days,
        view_input.month_summary.as_ref(),
    )?;
    Ok(json!({ "result": view }))
}

pub fn run_shade(args: ShadeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let shade = calendar::shade_for_pnl(args.pnl);
    Ok(json!({
        "result": {
            "shade": shade,
            "class_name": shade.class_name(),
            "intensity": shade.intensity(),
        }
    }))
}
