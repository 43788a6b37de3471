mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::calendar::{MonthMatrixArgs, MonthViewArgs, PeriodSummaryArgs, ShadeArgs};
use commands::insights::InsightsArgs;
use commands::risk::RiskPlanArgs;
use commands::tags::TagImpactArgs;

/// Trade journal performance analytics
#[derive(Parser)]
#[command(
    name = "tlj",
    version,
    about = "Trade journal performance analytics",
    long_about = "A CLI for analysing a trade journal with decimal precision. Grades planned \
                  trades by risk, attributes P&L to behavioral tags, ranks coaching insights \
                  and summarizes calendar periods."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug detail to stderr (TRADELOG_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a trade plan by stop distance and reward-to-risk
    RiskPlan(RiskPlanArgs),
    /// Attribute losses and profits to mistake and good-practice tags
    TagImpact(TagImpactArgs),
    /// Rank coaching insights from session statistics or trades
    Insights(InsightsArgs),
    /// Summarize a month, a set of months or a date range
    PeriodSummary(PeriodSummaryArgs),
    /// Print the Monday-first calendar grid of a month
    MonthMatrix(MonthMatrixArgs),
    /// Lay out day snapshots on a month grid with heat shades
    MonthView(MonthViewArgs),
    /// Heat shade for a single day's net P&L
    Shade(ShadeArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("TRADELOG_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::RiskPlan(args) => commands::risk::run_risk_plan(args),
        Commands::TagImpact(args) => commands::tags::run_tag_impact(args),
        Commands::Insights(args) => commands::insights::run_insights(args),
        Commands::PeriodSummary(args) => commands::calendar::run_period_summary(args),
        Commands::MonthMatrix(args) => commands::calendar::run_month_matrix(args),
        Commands::MonthView(args) => commands::calendar::run_month_view(args),
        Commands::Shade(args) => commands::calendar::run_shade(args),
        Commands::Version => {
            println!("tlj {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
