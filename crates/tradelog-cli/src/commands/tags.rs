use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use tradelog_core::tags::{self, TagImpactInput};

use crate::input;

/// Arguments for tag impact analysis
#[derive(Args)]
pub struct TagImpactArgs {
    /// Path to JSON input file ({"trades": [...], "broker_net_pnl": "..."})
    #[arg(long)]
    pub input: Option<String>,

    /// Broker-reported net P&L; overrides any value in the input
    #[arg(long, allow_hyphen_values = true)]
    pub broker_net_pnl: Option<Decimal>,
}

pub fn run_tag_impact(args: TagImpactArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut impact_input: TagImpactInput = input::load(&args.input, "tag impact")?;
    if args.broker_net_pnl.is_some() {
        impact_input.broker_net_pnl = args.broker_net_pnl;
    }
    let result = tags::analyze_tag_impact(&impact_input)?;
    Ok(serde_json::to_value(result)?)
}
