use clap::Args;
use serde_json::Value;

use tradelog_core::risk::{self, TradePlanInput};

use crate::input;

/// Arguments for trade plan risk grading
#[derive(Args)]
pub struct RiskPlanArgs {
    /// Path to JSON input file ({"trades": [...]})
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_risk_plan(args: RiskPlanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let plan: TradePlanInput = input::load(&args.input, "risk grading")?;
    let result = risk::analyze_trade_plan(&plan)?;
    Ok(serde_json::to_value(result)?)
}
