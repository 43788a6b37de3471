use clap::Args;
use serde_json::Value;

use tradelog_core::insights::{self, InsightInput};

use crate::input;

/// Arguments for insight ranking
#[derive(Args)]
pub struct InsightsArgs {
    /// Path to JSON input file ({"stats": {...}} or {"trades": [...]})
    #[arg(long)]
    pub input: Option<String>,

    /// Open positions to report alongside realized results
    #[arg(long)]
    pub open_positions: Option<u32>,
}

pub fn run_insights(args: InsightsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut insight_input: InsightInput = input::load(&args.input, "insights")?;
    if let Some(open) = args.open_positions {
        insight_input.open_positions = open;
        if let Some(stats) = insight_input.stats.as_mut() {
            stats.open_positions = open;
        }
    }
    let result = insights::generate_insights(&insight_input)?;
    Ok(serde_json::to_value(result)?)
}
