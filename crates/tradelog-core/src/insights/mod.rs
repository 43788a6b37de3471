pub mod advisor;
pub mod ranker;
pub mod rules;
pub mod stats;

pub use advisor::{generate_insights, InsightInput, InsightOutput};
pub use ranker::rank_insights;
pub use rules::{evaluate_rules, InsightCandidate, InsightCategory, RULES};
pub use stats::{insight_stats_from_trades, InsightStats};
